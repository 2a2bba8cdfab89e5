//! Command contract: the interface every executable command implements.
//!
//! Commands return their outcome as an explicit value. A command either
//! completes immediately (`Completion::Ready`) or hands back a deferred
//! completion that the session polls (`Completion::Pending`). There is no
//! per-dispatch instance state: `execute` takes `&self` and everything it
//! produces travels in the returned `CommandResult`.

use std::fmt;

use wicket_types::error::Result;

/// The content kind of a command result body.
///
/// Producers must not emit any other tag; the renderer branches on exactly
/// these four kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// Literal text.
    Text,
    /// Markup fragment source, rendered into an isolated scope.
    Markup,
    /// Structured JSON, stringified at render time.
    Json,
    /// Opaque binary payload, stringified at render time.
    Blob,
}

impl ContentType {
    /// Wire tag for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Text => "text/plain",
            ContentType::Markup => "markup",
            ContentType::Json => "structured-json",
            ContentType::Blob => "binary-blob",
        }
    }
}

/// A command result body with its type-appropriate payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Markup(String),
    Json(serde_json::Value),
    Blob(Vec<u8>),
}

impl Payload {
    /// The content kind of this payload.
    pub fn content_type(&self) -> ContentType {
        match self {
            Payload::Text(_) => ContentType::Text,
            Payload::Markup(_) => ContentType::Markup,
            Payload::Json(_) => ContentType::Json,
            Payload::Blob(_) => ContentType::Blob,
        }
    }
}

/// Outcome of one command dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResult {
    /// When set, the entry must influence no stored or rendered history.
    pub skip_history: bool,
    /// `None` only for commands that intentionally produce no visible
    /// output (e.g. a side-effect-only meta-command).
    pub payload: Option<Payload>,
}

impl CommandResult {
    /// A plain-text result.
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            skip_history: false,
            payload: Some(Payload::Text(body.into())),
        }
    }

    /// A markup result (fragment source).
    pub fn markup(source: impl Into<String>) -> Self {
        Self {
            skip_history: false,
            payload: Some(Payload::Markup(source.into())),
        }
    }

    /// A structured-json result.
    pub fn json(value: serde_json::Value) -> Self {
        Self {
            skip_history: false,
            payload: Some(Payload::Json(value)),
        }
    }

    /// A binary-blob result.
    pub fn blob(bytes: Vec<u8>) -> Self {
        Self {
            skip_history: false,
            payload: Some(Payload::Blob(bytes)),
        }
    }

    /// A result with no visible output.
    pub fn none() -> Self {
        Self {
            skip_history: false,
            payload: None,
        }
    }

    /// Mark this result as excluded from history.
    pub fn skipped(mut self) -> Self {
        self.skip_history = true;
        self
    }

    /// Content kind of the payload, if any.
    pub fn content_type(&self) -> Option<ContentType> {
        self.payload.as_ref().map(Payload::content_type)
    }
}

/// A deferred command completion.
///
/// The session polls this once per tick; `poll` returns `Some` exactly once,
/// when the work has finished. There is no cancellation: a pending execution
/// runs to completion or failure.
pub struct PendingExecution {
    poll_fn: Box<dyn FnMut() -> Option<Result<CommandResult>>>,
}

impl PendingExecution {
    pub fn new(poll_fn: impl FnMut() -> Option<Result<CommandResult>> + 'static) -> Self {
        Self {
            poll_fn: Box::new(poll_fn),
        }
    }

    /// Advance the deferred work. `None` means still pending.
    pub fn poll(&mut self) -> Option<Result<CommandResult>> {
        (self.poll_fn)()
    }
}

impl fmt::Debug for PendingExecution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PendingExecution")
    }
}

/// How a command delivered its result.
#[derive(Debug)]
pub enum Completion {
    /// The result is available immediately.
    Ready(CommandResult),
    /// The result arrives later; poll until it resolves.
    Pending(PendingExecution),
}

/// A single executable command.
pub trait Command {
    /// The registration name (what the user types, case-normalized at
    /// lookup).
    fn name(&self) -> &str;

    /// One-line description for `help`.
    fn description(&self) -> &str;

    /// Usage string (e.g. "echo [text...]").
    fn usage(&self) -> &str;

    /// Execute with the given argument tokens.
    ///
    /// Must terminate the in-flight call by producing a completion or an
    /// error; the dispatcher normalizes errors into transcript text.
    fn execute(&self, args: &[&str]) -> Result<Completion>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_tags() {
        assert_eq!(ContentType::Text.as_str(), "text/plain");
        assert_eq!(ContentType::Markup.as_str(), "markup");
        assert_eq!(ContentType::Json.as_str(), "structured-json");
        assert_eq!(ContentType::Blob.as_str(), "binary-blob");
    }

    #[test]
    fn text_result_has_text_payload() {
        let r = CommandResult::text("hi");
        assert_eq!(r.content_type(), Some(ContentType::Text));
        assert!(!r.skip_history);
        assert_eq!(r.payload, Some(Payload::Text("hi".to_string())));
    }

    #[test]
    fn none_result_has_no_payload() {
        let r = CommandResult::none();
        assert_eq!(r.payload, None);
        assert_eq!(r.content_type(), None);
    }

    #[test]
    fn skipped_sets_flag_only() {
        let r = CommandResult::text("").skipped();
        assert!(r.skip_history);
        assert_eq!(r.payload, Some(Payload::Text(String::new())));
    }

    #[test]
    fn json_payload_content_type() {
        let r = CommandResult::json(serde_json::json!({"a": 1}));
        assert_eq!(r.content_type(), Some(ContentType::Json));
    }

    #[test]
    fn blob_payload_content_type() {
        let r = CommandResult::blob(vec![1, 2, 3]);
        assert_eq!(r.content_type(), Some(ContentType::Blob));
    }

    #[test]
    fn pending_execution_polls_to_completion() {
        let mut ticks = 0;
        let mut pending = PendingExecution::new(move || {
            ticks += 1;
            if ticks < 3 {
                None
            } else {
                Some(Ok(CommandResult::text("done")))
            }
        });
        assert!(pending.poll().is_none());
        assert!(pending.poll().is_none());
        let result = pending.poll().unwrap().unwrap();
        assert_eq!(result, CommandResult::text("done"));
    }
}
