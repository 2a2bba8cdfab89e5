//! UI layer for the wicket terminal widget.
//!
//! Holds everything between the interpreter core and the host display:
//! the input session state machine, the markup fragment model used for
//! rendered results, the script execution boundary, and the surface
//! abstraction the host implements.

pub mod markup;
pub mod script;
pub mod session;
pub mod surface;

pub use script::{NullScriptHost, ScopeHandle, ScriptHost};
pub use session::{InputCell, InputSession, SessionAction, SessionState};
pub use surface::{MemorySurface, RenderedBody, RenderedEntry, Surface};
