//! Spinner
//!
//! Braille spinner advanced once per frame while anything is loading.

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Frame counter for the loading spinner
#[derive(Clone, Copy, Debug, Default)]
pub struct Spinner {
    frame: usize,
}

impl Spinner {
    /// Move to the next frame
    pub fn advance(&mut self) {
        self.frame = (self.frame + 1) % FRAMES.len();
    }

    /// Glyph for the current frame
    pub fn glyph(&self) -> &'static str {
        FRAMES[self.frame]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_wraps() {
        let mut spinner = Spinner::default();
        assert_eq!(spinner.glyph(), "⠋");
        for _ in 0..FRAMES.len() {
            spinner.advance();
        }
        assert_eq!(spinner.glyph(), "⠋");
        spinner.advance();
        assert_eq!(spinner.glyph(), "⠙");
    }
}
