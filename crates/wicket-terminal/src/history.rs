//! Chronological store of executed commands.
//!
//! Entries are append-only and submission-ordered; navigation is a pure
//! read over a clamped cursor, with the empty-line sentinel at the upper
//! bound standing in for the live buffer.

use crate::contract::CommandResult;

/// Default cap on retained entries.
pub const MAX_HISTORY: usize = 100;

/// One executed (command, result) pair. Immutable after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct CalledCommand {
    /// The submitted tokens, in order.
    pub command: Vec<String>,
    /// The dispatch outcome, if it has resolved.
    pub result: Option<CommandResult>,
}

impl CalledCommand {
    pub fn new(command: Vec<String>, result: Option<CommandResult>) -> Self {
        Self { command, result }
    }

    /// The visible command line: tokens joined by single spaces.
    pub fn line(&self) -> String {
        self.command.join(" ")
    }
}

/// Ordered list of executed commands.
pub struct HistoryStore {
    entries: Vec<CalledCommand>,
    max_entries: usize,
}

impl HistoryStore {
    /// Create a store with the default cap.
    pub fn new() -> Self {
        Self::with_max(MAX_HISTORY)
    }

    /// Create a store retaining at most `max_entries` entries.
    pub fn with_max(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Append an entry unless its result is marked `skip_history`, in which
    /// case it is dropped entirely. Returns whether the entry was stored.
    pub fn record(&mut self, entry: CalledCommand) -> bool {
        if entry
            .result
            .as_ref()
            .is_some_and(|r| r.skip_history)
        {
            return false;
        }
        self.entries.push(entry);
        if self.entries.len() > self.max_entries {
            self.entries.remove(0);
        }
        true
    }

    /// Empty the store. Invoked only by the clear meta-command path.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All stored entries, submission-ordered.
    pub fn entries(&self) -> &[CalledCommand] {
        &self.entries
    }

    /// The command line at cursor `h`, clamped into `[0, len]`.
    ///
    /// `h >= len` is the live-buffer sentinel and yields the empty line.
    pub fn line_at(&self, h: usize) -> String {
        match self.entries.get(h) {
            Some(entry) => entry.line(),
            None => String::new(),
        }
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(line: &str) -> CalledCommand {
        CalledCommand::new(
            line.split_whitespace().map(str::to_string).collect(),
            Some(CommandResult::text("ok")),
        )
    }

    #[test]
    fn record_appends_in_order() {
        let mut store = HistoryStore::new();
        assert!(store.record(entry("echo a")));
        assert!(store.record(entry("echo b")));
        assert_eq!(store.len(), 2);
        assert_eq!(store.line_at(0), "echo a");
        assert_eq!(store.line_at(1), "echo b");
    }

    #[test]
    fn skip_history_entries_are_dropped() {
        let mut store = HistoryStore::new();
        let skipped = CalledCommand::new(
            vec!["clear".to_string()],
            Some(CommandResult::none().skipped()),
        );
        assert!(!store.record(skipped));
        assert!(store.is_empty());
    }

    #[test]
    fn entry_without_result_is_stored() {
        let mut store = HistoryStore::new();
        assert!(store.record(CalledCommand::new(vec!["x".to_string()], None)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn line_at_upper_bound_is_empty_sentinel() {
        let mut store = HistoryStore::new();
        store.record(entry("echo a"));
        assert_eq!(store.line_at(1), "");
        assert_eq!(store.line_at(999), "");
    }

    #[test]
    fn clear_empties_store() {
        let mut store = HistoryStore::new();
        store.record(entry("echo a"));
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.line_at(0), "");
    }

    #[test]
    fn cap_drops_oldest() {
        let mut store = HistoryStore::with_max(2);
        store.record(entry("one"));
        store.record(entry("two"));
        store.record(entry("three"));
        assert_eq!(store.len(), 2);
        assert_eq!(store.line_at(0), "two");
        assert_eq!(store.line_at(1), "three");
    }

    #[test]
    fn line_joins_tokens_with_single_spaces() {
        let e = CalledCommand::new(
            vec!["echo".to_string(), "a".to_string(), "b".to_string()],
            None,
        );
        assert_eq!(e.line(), "echo a b");
    }

    proptest! {
        #[test]
        fn line_at_never_panics(h in 0usize..1000, n in 0usize..20) {
            let mut store = HistoryStore::new();
            for i in 0..n {
                store.record(entry(&format!("cmd{i}")));
            }
            let line = store.line_at(h);
            if h < n {
                prop_assert_eq!(line, format!("cmd{}", h));
            } else {
                prop_assert_eq!(line, "");
            }
        }
    }
}
