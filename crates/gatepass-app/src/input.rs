//! Terminal-agnostic keyboard input.

/// Keyboard input abstraction.
///
/// Decouples screen logic from terminal libraries (crossterm, termion, etc.)
/// so the same state machine runs under the TUI and under scripted tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Printable character.
    Char(char),
    /// Character typed with Ctrl held (`Ctrl('c')` is the global quit).
    Ctrl(char),
    /// Enter/Return key.
    Enter,
    /// Backspace key (delete character before cursor).
    Backspace,
    /// Tab key (cycle form fields).
    Tab,
    /// Escape key (leave a sub-screen or input mode).
    Esc,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Up arrow key.
    Up,
    /// Down arrow key.
    Down,
}
