//! The embeddable terminal widget.
//!
//! This crate assembles the interpreter core, input session, and rendering
//! layers into a single facade a host application drives: configure a
//! `Surface`, `attach()`, feed `InputEvent`s, and call `poll()` once per
//! frame.

mod meta;
mod renderer;
mod session;

/// Shared handle meta-commands use to request session effects.
pub use meta::SessionControl;
/// Register the session-bound commands (clear, exit, history).
pub use meta::register_meta_commands;
/// Content-type-dispatched projection of history entries.
pub use renderer::Renderer;
/// The terminal widget facade.
pub use session::TerminalWidget;
/// What the host should do after pumping the widget.
pub use session::WidgetAction;
