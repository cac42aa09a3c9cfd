//! Clipboard access for the copy actions (content refs, ids, resolved
//! documents, deltas).

use anyhow::{Context, Result, bail};
use arboard::Clipboard;

/// Larger payloads are refused rather than handed to the OS clipboard
const MAX_CLIPBOARD_BYTES: usize = 10 * 1024 * 1024;

/// Destination for copied text; the TUI takes one so tests can record copies
pub trait ClipboardProvider {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// The OS clipboard, opened on each copy
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardProvider for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let mut clipboard = Clipboard::new().context("Failed to initialize clipboard")?;
        clipboard.set_text(text).context("Failed to set clipboard contents")
    }
}

fn check_payload(text: &str) -> Result<()> {
    if text.is_empty() {
        bail!("Nothing to copy");
    }
    if text.len() > MAX_CLIPBOARD_BYTES {
        bail!("Text too large for clipboard ({} bytes, max {})", text.len(), MAX_CLIPBOARD_BYTES);
    }
    Ok(())
}

/// Validate `text` and hand it to `provider`
pub fn copy_with(provider: &mut dyn ClipboardProvider, text: &str) -> Result<()> {
    check_payload(text)?;
    provider.set_text(text)
}
