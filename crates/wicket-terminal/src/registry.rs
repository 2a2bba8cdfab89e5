//! Command registry and dispatch.
//!
//! Names are stored lower-cased and looked up case-insensitively; an alias
//! table maps extra invocation strings onto existing entries. Absence of a
//! key is the sole "unknown command" signal -- there is no prefix matching.
//!
//! Dispatch never errors outward: lookup failures, command errors, and even
//! panics inside a command are normalized into plain-text results, so
//! callers need no fallback handling of their own.

use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::contract::{Command, CommandResult, Completion, PendingExecution};

/// Registry of available commands with dispatch.
pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn Command>>,
    aliases: HashMap<String, String>,
}

/// Outcome of one dispatch: either a finished result or an in-flight
/// execution the session polls to completion.
#[derive(Debug)]
pub enum Dispatch {
    Done(CommandResult),
    Pending(PendingDispatch),
}

/// An in-flight dispatch. Polling applies the same error normalization as
/// the synchronous path, so the eventual result is always a value.
#[derive(Debug)]
pub struct PendingDispatch {
    name: String,
    inner: PendingExecution,
}

impl PendingDispatch {
    /// Advance the execution. `None` means still pending.
    pub fn poll(&mut self) -> Option<CommandResult> {
        let polled = catch_unwind(AssertUnwindSafe(|| self.inner.poll()));
        match polled {
            Ok(None) => None,
            Ok(Some(Ok(result))) => Some(result),
            Ok(Some(Err(e))) => Some(CommandResult::text(format!(
                "unknown error: {}\n{e}",
                self.name
            ))),
            Err(_) => Some(CommandResult::text(format!("unknown error: {}", self.name))),
        }
    }

    /// Name of the command being executed.
    pub fn command_name(&self) -> &str {
        &self.name
    }
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
            aliases: HashMap::new(),
        }
    }

    /// Register a command under its declared name (stored lower-cased).
    /// Replaces any existing command with the same name.
    pub fn register(&mut self, cmd: Box<dyn Command>) {
        self.commands.insert(cmd.name().to_ascii_lowercase(), cmd);
    }

    /// Map an extra invocation string onto an existing entry.
    pub fn register_alias(&mut self, alias: &str, target: &str) {
        self.aliases
            .insert(alias.to_ascii_lowercase(), target.to_ascii_lowercase());
    }

    /// Whether a name (or alias) resolves to a command.
    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Resolve a name through the alias table to a registered command.
    fn resolve(&self, name: &str) -> Option<&dyn Command> {
        let key = name.to_ascii_lowercase();
        let key = self.aliases.get(&key).unwrap_or(&key);
        self.commands.get(key).map(Box::as_ref)
    }

    /// Sorted (name, description) pairs of all registered commands.
    pub fn list_commands(&self) -> Vec<(&str, &str)> {
        let mut cmds: Vec<(&str, &str)> = self
            .commands
            .values()
            .map(|c| (c.name(), c.description()))
            .collect();
        cmds.sort_by_key(|(name, _)| *name);
        cmds
    }

    /// Dispatch a tokenized command line.
    ///
    /// 1. A sole empty token short-circuits to an empty plain-text result
    ///    (no lookup, excluded from history).
    /// 2. Unknown names produce `command not found: <name>`.
    /// 3. Command errors produce `unknown error: <name>\n<message>`; a
    ///    panic inside a command produces `unknown error: <name>`.
    pub fn dispatch(&self, tokens: &[String]) -> Dispatch {
        if tokens.is_empty() || (tokens.len() == 1 && tokens[0].is_empty()) {
            return Dispatch::Done(CommandResult::text("").skipped());
        }

        let name = tokens[0].as_str();
        let args: Vec<&str> = tokens[1..].iter().map(String::as_str).collect();

        // `help` needs registry access, so it is intercepted here rather
        // than registered as an ordinary command.
        if name.eq_ignore_ascii_case("help") {
            return Dispatch::Done(self.execute_help(&args));
        }

        let Some(cmd) = self.resolve(name) else {
            log::debug!("dispatch: command not found: {name}");
            return Dispatch::Done(CommandResult::text(format!("command not found: {name}")));
        };

        match catch_unwind(AssertUnwindSafe(|| cmd.execute(&args))) {
            Ok(Ok(Completion::Ready(result))) => Dispatch::Done(result),
            Ok(Ok(Completion::Pending(inner))) => Dispatch::Pending(PendingDispatch {
                name: name.to_string(),
                inner,
            }),
            Ok(Err(e)) => {
                log::warn!("command {name} failed: {e}");
                Dispatch::Done(CommandResult::text(format!("unknown error: {name}\n{e}")))
            },
            Err(_) => {
                log::error!("command {name} panicked");
                Dispatch::Done(CommandResult::text(format!("unknown error: {name}")))
            },
        }
    }

    /// Built-in help: one line per command, or details for a single name.
    fn execute_help(&self, args: &[&str]) -> CommandResult {
        if let Some(&name) = args.first() {
            return match self.resolve(name) {
                Some(cmd) => CommandResult::text(format!(
                    "{}\n  {}\n  Usage: {}",
                    cmd.name(),
                    cmd.description(),
                    cmd.usage()
                )),
                None => CommandResult::text(format!("command not found: {name}")),
            };
        }
        let cmds = self.list_commands();
        let mut out = format!("Commands ({}):\n", cmds.len() + 1);
        out.push_str("  help         List available commands\n");
        for (name, desc) in &cmds {
            out.push_str(&format!("  {name:12} {desc}\n"));
        }
        out.push_str("\nType 'help <command>' for details.");
        CommandResult::text(out)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a raw line into whitespace-delimited tokens.
///
/// An empty line yields the single-empty-token list the dispatcher
/// short-circuits on. No quoting or escaping: whitespace split only.
pub fn tokenize(line: &str) -> Vec<String> {
    if line.is_empty() {
        return vec![String::new()];
    }
    line.split_whitespace().map(str::to_string).collect()
}
