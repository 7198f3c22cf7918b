//! System Clipboard
//!
//! arboard-backed implementation of the engine's [`Clipboard`] trait.
//! The handle is opened on first use and kept, since on X11 the copied
//! text is only served while the handle lives.

use session_core::{Clipboard, ClipboardError};

/// The desktop clipboard
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    /// A clipboard that connects on the first copy
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for SystemClipboard {
    fn copy(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.inner.is_none() {
            let opened = arboard::Clipboard::new()
                .map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            self.inner = Some(opened);
        }
        let Some(clipboard) = self.inner.as_mut() else {
            return Err(ClipboardError::Unavailable("no clipboard handle".to_string()));
        };

        clipboard
            .set_text(text)
            .map_err(|e| ClipboardError::WriteFailed(e.to_string()))?;
        tracing::debug!(bytes = text.len(), "Copied to clipboard");
        Ok(())
    }
}
