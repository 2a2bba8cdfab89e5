//! Markup fragment model and parser for rendered command results.

pub mod dom;
pub mod parser;

pub use dom::{Attribute, ElementData, Fragment, Node, NodeId, NodeKind, TagName};
pub use parser::parse_fragment;
