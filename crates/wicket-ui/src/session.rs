//! Input session state machine.
//!
//! Owns the live text buffer, caret/selection state, and the history
//! cursor. UI events are inputs to explicit state transitions, so the whole
//! machine is testable without any display surface. The session is in one
//! of two states: live editing (`h == history_len`) or browsing history at
//! index `h`.

use wicket_terminal::HistoryStore;
use wicket_types::input::InputEvent;

/// One visual unit of the rendered input line.
///
/// The buffer is re-derived into one cell per character plus a trailing
/// sentinel space on every edit; caret highlighting is a per-cell flag.
/// O(n) per keystroke, acceptable at single-line scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputCell {
    pub ch: char,
    pub active: bool,
}

/// What the session asks its owner to do after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Nothing changed.
    None,
    /// The visible input line changed; re-render it.
    Redraw,
    /// The buffer was submitted as these tokens.
    Submit(Vec<String>),
}

/// Which state the machine is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Editing the live buffer.
    Live,
    /// Replaying `history[h]` into the buffer.
    Browsing { h: usize },
}

/// The input session: buffer, selection, and history cursor.
pub struct InputSession {
    buffer: String,
    selection_start: usize,
    selection_end: usize,
    focused: bool,
    composing: bool,
    /// History cursor in `[0, history_len]`; `== history_len` means live.
    h: usize,
}

impl InputSession {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            selection_start: 0,
            selection_end: 0,
            focused: false,
            composing: false,
            h: 0,
        }
    }

    /// Current raw buffer contents.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Current selection as char offsets, `start <= end`.
    pub fn selection(&self) -> (usize, usize) {
        (self.selection_start, self.selection_end)
    }

    /// Current state relative to a history of `history_len` entries.
    pub fn state(&self, history_len: usize) -> SessionState {
        if self.h >= history_len {
            SessionState::Live
        } else {
            SessionState::Browsing { h: self.h }
        }
    }

    /// History cursor value.
    pub fn history_cursor(&self) -> usize {
        self.h
    }

    /// Reset the cursor to the live position. Called by the owner
    /// immediately after any successful submission, and after the history
    /// store is cleared.
    pub fn reset_history_cursor(&mut self, history_len: usize) {
        self.h = history_len;
    }

    /// Apply one input event. History navigation reads `history` directly;
    /// nothing here goes through the dispatcher.
    pub fn handle_event(&mut self, event: &InputEvent, history: &HistoryStore) -> SessionAction {
        match event {
            InputEvent::TextInput(ch) => {
                self.insert(*ch);
                SessionAction::Redraw
            },
            InputEvent::Backspace => {
                if self.backspace() {
                    SessionAction::Redraw
                } else {
                    SessionAction::None
                }
            },
            InputEvent::CaretSet { start, end } => {
                self.set_selection(*start, *end);
                SessionAction::Redraw
            },
            InputEvent::Focus => {
                self.focused = true;
                SessionAction::Redraw
            },
            InputEvent::Blur => {
                self.focused = false;
                SessionAction::Redraw
            },
            InputEvent::Click => {
                self.focused = true;
                let len = self.char_len();
                self.selection_start = len;
                self.selection_end = len;
                SessionAction::Redraw
            },
            InputEvent::CompositionStart => {
                self.composing = true;
                SessionAction::None
            },
            InputEvent::CompositionEnd => {
                self.composing = false;
                SessionAction::None
            },
            InputEvent::HistoryPrev if !self.composing => {
                self.h = self.h.min(history.len()).saturating_sub(1);
                self.load_line(history.line_at(self.h));
                SessionAction::Redraw
            },
            InputEvent::HistoryNext if !self.composing => {
                self.h = (self.h + 1).min(history.len());
                self.load_line(history.line_at(self.h));
                SessionAction::Redraw
            },
            InputEvent::Submit if !self.composing => {
                SessionAction::Submit(self.take_command())
            },
            // Navigation and submission are suppressed mid-composition.
            InputEvent::HistoryPrev | InputEvent::HistoryNext | InputEvent::Submit => {
                SessionAction::None
            },
        }
    }

    /// Extract the current buffer as a token list.
    ///
    /// An empty buffer yields the single-empty-token command; a non-empty
    /// buffer is whitespace-split and the visible input clears immediately,
    /// before any result comes back.
    fn take_command(&mut self) -> Vec<String> {
        if self.buffer.is_empty() {
            return vec![String::new()];
        }
        let tokens = wicket_terminal::tokenize(&self.buffer);
        self.load_line(String::new());
        tokens
    }

    /// Replace the buffer and move the caret to end-of-buffer.
    fn load_line(&mut self, line: String) {
        self.buffer = line;
        let len = self.char_len();
        self.selection_start = len;
        self.selection_end = len;
    }

    /// Per-character display cells, including the trailing sentinel space.
    ///
    /// Active cells cover `[start, end]` inclusive of one trailing
    /// position; a blurred input has no active cells.
    pub fn display_cells(&self) -> Vec<InputCell> {
        let len = self.char_len();
        self.buffer
            .chars()
            .chain(std::iter::once(' '))
            .enumerate()
            .map(|(i, ch)| InputCell {
                ch,
                active: self.focused
                    && i >= self.selection_start
                    && i <= self.selection_end.min(len),
            })
            .collect()
    }

    fn char_len(&self) -> usize {
        self.buffer.chars().count()
    }

    /// Insert a character at the caret position.
    fn insert(&mut self, ch: char) {
        let byte_pos = self
            .buffer
            .char_indices()
            .nth(self.selection_start)
            .map(|(i, _)| i)
            .unwrap_or(self.buffer.len());
        self.buffer.insert(byte_pos, ch);
        self.selection_start += 1;
        self.selection_end = self.selection_start;
    }

    /// Delete the character before the caret. Returns whether anything
    /// changed.
    fn backspace(&mut self) -> bool {
        if self.selection_start == 0 {
            return false;
        }
        self.selection_start -= 1;
        self.selection_end = self.selection_start;
        let byte_pos = self
            .buffer
            .char_indices()
            .nth(self.selection_start)
            .map(|(i, _)| i)
            .unwrap_or(self.buffer.len());
        if byte_pos < self.buffer.len() {
            let ch_len = self.buffer[byte_pos..]
                .chars()
                .next()
                .map_or(0, |c| c.len_utf8());
            self.buffer.drain(byte_pos..byte_pos + ch_len);
        }
        true
    }

    fn set_selection(&mut self, start: usize, end: usize) {
        let len = self.char_len();
        let start = start.min(len);
        let end = end.min(len);
        if start <= end {
            self.selection_start = start;
            self.selection_end = end;
        } else {
            self.selection_start = end;
            self.selection_end = start;
        }
    }
}

impl Default for InputSession {
    fn default() -> Self {
        Self::new()
    }
}
