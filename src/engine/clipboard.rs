use arboard::Clipboard;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("clipboard write failed: {0}")]
    Write(String),
}

pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// System clipboard, opened on first use and kept open for the owner's
/// lifetime so the contents survive on platforms that require it.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardSink for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.inner.is_none() {
            let opened =
                Clipboard::new().map_err(|err| ClipboardError::Unavailable(err.to_string()))?;
            self.inner = Some(opened);
        }

        let Some(clipboard) = self.inner.as_mut() else {
            return Err(ClipboardError::Unavailable("clipboard not opened".into()));
        };

        clipboard
            .set_text(text)
            .map_err(|err| ClipboardError::Write(err.to_string()))
    }
}
