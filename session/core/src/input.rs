//! Input Field
//!
//! Single-line text field used in input mode. Keys arrive already routed
//! by the controller; `Esc` and `Enter` never reach the field.

use crate::events::Key;

/// Placeholder shown while the field is empty
pub const INPUT_PLACEHOLDER: &str = "Enter command or text...";

/// Editable single-line buffer with a cursor
#[derive(Clone, Debug)]
pub struct InputField {
    chars: Vec<char>,
    /// Cursor position in characters
    cursor: usize,
    limit: usize,
}

impl InputField {
    /// Create an empty field accepting at most `limit` characters
    pub fn new(limit: usize) -> Self {
        Self {
            chars: Vec::new(),
            cursor: 0,
            limit,
        }
    }

    /// Current text
    pub fn value(&self) -> String {
        self.chars.iter().collect()
    }

    /// Cursor position in characters
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the field is empty
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Empty the field
    pub fn clear(&mut self) {
        self.chars.clear();
        self.cursor = 0;
    }

    /// Take the text out, leaving the field empty
    pub fn take(&mut self) -> String {
        let value = self.value();
        self.clear();
        value
    }

    /// Apply an editing key; unknown keys are ignored
    pub fn handle_key(&mut self, key: Key) {
        match key {
            Key::Char(c) => self.insert(c),
            Key::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.chars.remove(self.cursor);
                }
            }
            Key::Delete => {
                if self.cursor < self.chars.len() {
                    self.chars.remove(self.cursor);
                }
            }
            Key::Left => self.cursor = self.cursor.saturating_sub(1),
            Key::Right => self.cursor = (self.cursor + 1).min(self.chars.len()),
            Key::Home | Key::Ctrl('a') => self.cursor = 0,
            Key::End | Key::Ctrl('e') => self.cursor = self.chars.len(),
            Key::Ctrl('u') => {
                self.chars.drain(..self.cursor);
                self.cursor = 0;
            }
            _ => {}
        }
    }

    fn insert(&mut self, c: char) {
        if self.chars.len() >= self.limit || c.is_control() {
            return;
        }
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
    }
}
