//! Foundation types for the wicket terminal widget.
//!
//! This crate holds the types shared by every other wicket crate: the error
//! enum, platform-agnostic input events, and widget configuration. It has
//! no dependency on the interpreter or UI layers.

pub mod config;
pub mod error;
pub mod input;

pub use config::WidgetConfig;
pub use error::{Result, WicketError};
pub use input::InputEvent;
