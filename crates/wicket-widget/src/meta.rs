//! Session-bound meta-commands.
//!
//! Commands like `clear` and `exit` mutate session state instead of
//! producing transcript content. They receive an explicit handle to the
//! owning session at registration time; the facade applies the requested
//! effect after the dispatch completes. Their results carry
//! `skip_history` so they never appear in the store or the transcript.

use std::cell::RefCell;
use std::rc::Rc;

use wicket_terminal::{
    Command, CommandRegistry, CommandResult, Completion, HistoryStore,
};
use wicket_types::error::Result;

/// Effects a meta-command may request from the owning session.
#[derive(Debug, Default, Clone, Copy)]
struct ControlFlags {
    clear: bool,
    exit: bool,
}

/// Shared handle between the facade and its meta-commands.
#[derive(Clone, Default)]
pub struct SessionControl {
    flags: Rc<RefCell<ControlFlags>>,
}

impl SessionControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request truncation of history and transcript.
    pub fn request_clear(&self) {
        self.flags.borrow_mut().clear = true;
    }

    /// Request session detach.
    pub fn request_exit(&self) {
        self.flags.borrow_mut().exit = true;
    }

    /// Consume a pending clear request.
    pub fn take_clear(&self) -> bool {
        std::mem::take(&mut self.flags.borrow_mut().clear)
    }

    /// Consume a pending exit request.
    pub fn take_exit(&self) -> bool {
        std::mem::take(&mut self.flags.borrow_mut().exit)
    }
}

/// Register the session-bound commands (clear, exit, history).
pub fn register_meta_commands(
    reg: &mut CommandRegistry,
    control: &SessionControl,
    history: &Rc<RefCell<HistoryStore>>,
) {
    reg.register(Box::new(ClearCmd {
        control: control.clone(),
    }));
    reg.register(Box::new(ExitCmd {
        control: control.clone(),
    }));
    reg.register(Box::new(HistoryCmd {
        history: Rc::clone(history),
    }));
}

// ---------------------------------------------------------------------------
// clear
// ---------------------------------------------------------------------------

struct ClearCmd {
    control: SessionControl,
}

impl Command for ClearCmd {
    fn name(&self) -> &str {
        "clear"
    }
    fn description(&self) -> &str {
        "Clear history and transcript"
    }
    fn usage(&self) -> &str {
        "clear"
    }
    fn execute(&self, _args: &[&str]) -> Result<Completion> {
        self.control.request_clear();
        Ok(Completion::Ready(CommandResult::none().skipped()))
    }
}

// ---------------------------------------------------------------------------
// exit
// ---------------------------------------------------------------------------

struct ExitCmd {
    control: SessionControl,
}

impl Command for ExitCmd {
    fn name(&self) -> &str {
        "exit"
    }
    fn description(&self) -> &str {
        "Detach the terminal"
    }
    fn usage(&self) -> &str {
        "exit"
    }
    fn execute(&self, _args: &[&str]) -> Result<Completion> {
        self.control.request_exit();
        Ok(Completion::Ready(CommandResult::none().skipped()))
    }
}

// ---------------------------------------------------------------------------
// history
// ---------------------------------------------------------------------------

struct HistoryCmd {
    history: Rc<RefCell<HistoryStore>>,
}

impl Command for HistoryCmd {
    fn name(&self) -> &str {
        "history"
    }
    fn description(&self) -> &str {
        "List executed commands"
    }
    fn usage(&self) -> &str {
        "history"
    }
    fn execute(&self, _args: &[&str]) -> Result<Completion> {
        let history = self.history.borrow();
        if history.is_empty() {
            return Ok(Completion::Ready(CommandResult::text("(no history)")));
        }
        let mut out = String::new();
        for (i, entry) in history.entries().iter().enumerate() {
            out.push_str(&format!("  {:4}  {}\n", i + 1, entry.line()));
        }
        Ok(Completion::Ready(CommandResult::text(
            out.trim_end().to_string(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wicket_terminal::{CalledCommand, Dispatch, Payload, tokenize};

    fn setup() -> (CommandRegistry, SessionControl, Rc<RefCell<HistoryStore>>) {
        let mut reg = CommandRegistry::new();
        let control = SessionControl::new();
        let history = Rc::new(RefCell::new(HistoryStore::new()));
        register_meta_commands(&mut reg, &control, &history);
        (reg, control, history)
    }

    fn done(d: Dispatch) -> CommandResult {
        match d {
            Dispatch::Done(r) => r,
            Dispatch::Pending(_) => panic!("expected finished dispatch"),
        }
    }

    #[test]
    fn clear_requests_flag_and_skips_history() {
        let (reg, control, _history) = setup();
        let r = done(reg.dispatch(&tokenize("clear")));
        assert!(r.skip_history);
        assert_eq!(r.payload, None);
        assert!(control.take_clear());
        assert!(!control.take_clear());
        assert!(!control.take_exit());
    }

    #[test]
    fn exit_requests_flag_and_skips_history() {
        let (reg, control, _history) = setup();
        let r = done(reg.dispatch(&tokenize("exit")));
        assert!(r.skip_history);
        assert!(control.take_exit());
        assert!(!control.take_clear());
    }

    #[test]
    fn history_lists_stored_lines() {
        let (reg, _control, history) = setup();
        history.borrow_mut().record(CalledCommand::new(
            vec!["echo".to_string(), "a".to_string()],
            Some(CommandResult::text("a")),
        ));
        let r = done(reg.dispatch(&tokenize("history")));
        match r.payload {
            Some(Payload::Text(t)) => {
                assert!(t.contains("1"));
                assert!(t.contains("echo a"));
            },
            other => panic!("expected text payload, got {other:?}"),
        }
    }

    #[test]
    fn history_empty_store() {
        let (reg, _control, _history) = setup();
        let r = done(reg.dispatch(&tokenize("history")));
        assert_eq!(r.payload, Some(Payload::Text("(no history)".to_string())));
    }
}
