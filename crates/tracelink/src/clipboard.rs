//! Copying shareable links to the system clipboard.

use clipboard_rs::{Clipboard, ClipboardContext};
use tracing::debug;

use crate::error::{Error, Result};

/// Confirmation printed after a successful copy.
pub const COPIED_MESSAGE: &str = "Link copied";

/// Somewhere a link can be copied to.
pub trait CopyTarget {
    /// Replace the target's text with `text`.
    ///
    /// # Errors
    ///
    /// Returns an error if the target cannot be written.
    fn copy_text(&mut self, text: &str) -> Result<()>;
}

/// The desktop clipboard, via `clipboard-rs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl CopyTarget for SystemClipboard {
    fn copy_text(&mut self, text: &str) -> Result<()> {
        let ctx = ClipboardContext::new().map_err(|e| Error::clipboard(e.to_string()))?;
        ctx.set_text(text.to_string())
            .map_err(|e| Error::clipboard(e.to_string()))?;
        debug!(len = text.len(), "Copied text to clipboard");
        Ok(())
    }
}

/// Keeps copied text in memory. Used where no desktop session exists.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    /// An empty clipboard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The last copied text.
    #[must_use]
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl CopyTarget for MemoryClipboard {
    fn copy_text(&mut self, text: &str) -> Result<()> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}
