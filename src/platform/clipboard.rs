// IssueTag - platform/clipboard.rs
//
// System clipboard access behind a small trait so conversion and watch
// logic can be exercised without a desktop session.

use crate::util::error::ClipboardError;

/// Text clipboard operations used by the app layer.
pub trait ClipboardAccess {
    /// Current clipboard text. Non-text or empty content reads as `None`.
    fn get_text(&mut self) -> Result<Option<String>, ClipboardError>;

    /// Replace the clipboard content with `text`.
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The real system clipboard (via `arboard`).
///
/// On Linux the clipboard content is served by this process, so it stays
/// available only while the `Clipboard` handle (or a clipboard manager) lives.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    pub fn open() -> Result<Self, ClipboardError> {
        let inner = arboard::Clipboard::new().map_err(ClipboardError::Unavailable)?;
        Ok(Self { inner })
    }
}

impl ClipboardAccess for SystemClipboard {
    fn get_text(&mut self) -> Result<Option<String>, ClipboardError> {
        match self.inner.get_text() {
            Ok(text) if text.is_empty() => Ok(None),
            Ok(text) => Ok(Some(text)),
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(e) => Err(ClipboardError::Read(e)),
        }
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.inner
            .set_text(text.to_string())
            .map_err(ClipboardError::Write)?;
        tracing::debug!(bytes = text.len(), "Clipboard updated");
        Ok(())
    }
}

/// In-process clipboard for tests and embedders without a desktop session.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    pub content: Option<String>,
    /// Number of successful `set_text` calls.
    pub writes: usize,
}

impl MemoryClipboard {
    pub fn with_text(text: &str) -> Self {
        Self {
            content: Some(text.to_string()),
            writes: 0,
        }
    }
}

impl ClipboardAccess for MemoryClipboard {
    fn get_text(&mut self) -> Result<Option<String>, ClipboardError> {
        Ok(self.content.clone().filter(|t| !t.is_empty()))
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.content = Some(text.to_string());
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clipboard_round_trip() {
        let mut clipboard = MemoryClipboard::default();
        assert_eq!(clipboard.get_text().unwrap(), None);

        clipboard.set_text("hello").unwrap();
        assert_eq!(clipboard.get_text().unwrap().as_deref(), Some("hello"));
        assert_eq!(clipboard.writes, 1);

        clipboard.set_text("").unwrap();
        assert_eq!(clipboard.get_text().unwrap(), None);
    }
}
