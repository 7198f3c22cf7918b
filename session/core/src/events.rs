//! Session Events
//!
//! Everything the controller can react to. Terminal surfaces translate
//! their native input into [`Key`]s; the runtime feeds timer ticks,
//! command completions and clipboard results back in as events.
//!
//! # Design Philosophy
//!
//! Surfaces report what happened, not what it means. Whether `j` moves
//! the selection or types a letter into the input field is decided by the
//! controller from session state.

use serde::{Deserialize, Serialize};

use crate::block::BlockId;
use crate::execution::CommandOutcome;
use crate::progress::ProgressTick;

/// A single keystroke, independent of any terminal library
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// A printable character
    Char(char),
    /// A character typed with the control modifier
    Ctrl(char),
    /// Arrow up
    Up,
    /// Arrow down
    Down,
    /// Arrow left
    Left,
    /// Arrow right
    Right,
    /// Home
    Home,
    /// End
    End,
    /// Page up
    PageUp,
    /// Page down
    PageDown,
    /// Enter / return
    Enter,
    /// Escape
    Esc,
    /// Backspace
    Backspace,
    /// Forward delete
    Delete,
    /// Tab
    Tab,
}

impl Key {
    /// Protocol name of the key (`"j"`, `"ctrl+l"`, `"enter"`, ...)
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Char(' ') => "space".to_string(),
            Self::Char(c) => c.to_string(),
            Self::Ctrl(c) => format!("ctrl+{}", c.to_ascii_lowercase()),
            Self::Up => "up".to_string(),
            Self::Down => "down".to_string(),
            Self::Left => "left".to_string(),
            Self::Right => "right".to_string(),
            Self::Home => "home".to_string(),
            Self::End => "end".to_string(),
            Self::PageUp => "pgup".to_string(),
            Self::PageDown => "pgdown".to_string(),
            Self::Enter => "enter".to_string(),
            Self::Esc => "esc".to_string(),
            Self::Backspace => "backspace".to_string(),
            Self::Delete => "delete".to_string(),
            Self::Tab => "tab".to_string(),
        }
    }
}

/// Result of a clipboard write, as reported by the surface
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClipboardResult {
    /// The text is on the clipboard
    Copied,
    /// The write failed with this reason
    Failed(String),
}

/// Events consumed by the controller
#[derive(Clone, Debug)]
pub enum SessionEvent {
    /// User pressed a key
    Key(Key),

    /// Terminal resized
    Resize {
        /// New width in cells
        width: u16,
        /// New height in cells
        height: u16,
    },

    /// A scheduled progress tick fired
    Tick(ProgressTick),

    /// A shell command finished
    CommandCompleted {
        /// Block the command ran in
        block_id: BlockId,
        /// Captured output and status
        outcome: CommandOutcome,
    },

    /// The clipboard write requested for a block finished
    ClipboardWritten {
        /// Block whose text was copied
        block_id: BlockId,
        /// Whether the write succeeded
        result: ClipboardResult,
    },
}

impl SessionEvent {
    /// Short name for logging
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Key(_) => "key",
            Self::Resize { .. } => "resize",
            Self::Tick(_) => "tick",
            Self::CommandCompleted { .. } => "command_completed",
            Self::ClipboardWritten { .. } => "clipboard_written",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(Key::Char('j').name(), "j");
        assert_eq!(Key::Char(' ').name(), "space");
        assert_eq!(Key::Ctrl('L').name(), "ctrl+l");
        assert_eq!(Key::Enter.name(), "enter");
        assert_eq!(Key::Down.name(), "down");
    }

    #[test]
    fn test_event_kind() {
        assert_eq!(SessionEvent::Key(Key::Esc).kind(), "key");
        assert_eq!(
            SessionEvent::Resize {
                width: 80,
                height: 24
            }
            .kind(),
            "resize"
        );
    }
}
