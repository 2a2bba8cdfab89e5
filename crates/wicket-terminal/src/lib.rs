//! Interpreter core for the wicket terminal widget.
//!
//! A registry-based dispatch system: commands implement the `Command` trait
//! and are registered by name (plus optional aliases). The dispatcher
//! tokenizes a submitted line, resolves the name, executes the command, and
//! normalizes every failure into a plain-text result -- dispatch never
//! errors outward. Executed commands are recorded in a chronological
//! history store that the input session replays.

mod builtins;
mod contract;
mod history;
mod registry;

/// Register all built-in leaf commands (echo, time, none, json).
pub use builtins::register_builtins;
/// A single executable command trait.
pub use contract::Command;
/// Outcome of one command dispatch.
pub use contract::CommandResult;
/// How a command delivered its result (immediate or deferred).
pub use contract::Completion;
/// The content kind of a result body.
pub use contract::ContentType;
/// Type-appropriate result body.
pub use contract::Payload;
/// A polled deferred completion.
pub use contract::PendingExecution;
/// A history record: submitted tokens plus their result.
pub use history::CalledCommand;
/// Chronological store of executed commands.
pub use history::HistoryStore;
/// Default cap on retained history entries.
pub use history::MAX_HISTORY;
/// Registry of available commands with dispatch.
pub use registry::CommandRegistry;
/// Outcome of one dispatch: finished or in-flight.
pub use registry::Dispatch;
/// An in-flight dispatch polled to completion.
pub use registry::PendingDispatch;
/// Whitespace-only tokenization of a submitted line.
pub use registry::tokenize;
