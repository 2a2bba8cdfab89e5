//! Platform-agnostic input event types.
//!
//! Every host surface maps its native input (keyboard, IME, pointer) to
//! these events. The session state machine never sees raw platform input.

/// An input event delivered to the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Character typed (keyboard or completed IME sequence).
    TextInput(char),
    /// Delete the character before the caret.
    Backspace,
    /// Caret / selection moved to the given char offsets.
    CaretSet { start: usize, end: usize },
    /// Navigate one step back in history (ArrowUp).
    HistoryPrev,
    /// Navigate one step forward in history (ArrowDown).
    HistoryNext,
    /// Submit the current buffer (Enter).
    Submit,
    /// An IME composition started; editing events are provisional.
    CompositionStart,
    /// The IME composition ended.
    CompositionEnd,
    /// The input gained focus.
    Focus,
    /// The input lost focus.
    Blur,
    /// Pointer click inside the input area.
    Click,
}
