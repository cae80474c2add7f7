//! Seams to the host editor: the live clipboard device and the UI surfaces
//! the dispatcher talks to. The host owns all rendering; we only hand it
//! text and let it present menus and prompts, answering back through the
//! dispatcher's resolve calls.

use arboard::Clipboard;

use crate::error::{ClipError, ClipResult};
use crate::history::ClipSyntax;

/// The live clipboard. Reads may lag behind writes, which is why writes
/// that need to observe their own effect go through `write_and_confirm`.
pub trait ClipboardDevice {
    fn read(&mut self) -> ClipResult<String>;
    fn write(&mut self, text: &str) -> ClipResult<()>;
}

/// Host UI surfaces. Menu and prompt calls only *present* the UI; the host
/// reports the outcome later via `Dispatcher::resolve_choice` /
/// `Dispatcher::resolve_register_key`.
pub trait HostUi {
    fn status_message(&mut self, text: &str);
    fn show_popup(&mut self, markup: &str);
    fn update_panel(&mut self, content: &str);
    fn close_panels(&mut self);
    fn begin_choice_menu(&mut self, labels: &[String]);
    fn begin_key_prompt(&mut self, prompt: &str);
    /// Run the host's own paste command on the current view.
    fn run_native_paste(&mut self, indent: bool);
    /// Run the host's own copy command so the selection lands on the
    /// clipboard, where the dispatcher picks it up.
    fn run_native_copy(&mut self);
    /// Syntax metadata of the active view, recorded with each new clip.
    fn current_syntax(&self) -> ClipSyntax;
}

/// How many write/read-back rounds to attempt before giving up on the
/// device ever settling.
pub const WRITE_CONFIRM_ATTEMPTS: usize = 50;

/// Write `text` and poll until a read returns it. Some hosts apply
/// clipboard writes asynchronously, so a read issued right after a write
/// can still see the old value. Bounded so a device that never settles
/// yields `ClipboardUnready` instead of a stall.
pub fn write_and_confirm(device: &mut dyn ClipboardDevice, text: &str) -> ClipResult<()> {
    for _ in 0..WRITE_CONFIRM_ATTEMPTS {
        device.write(text)?;
        if device.read()? == text {
            return Ok(());
        }
    }
    Err(ClipError::ClipboardUnready)
}

/// System clipboard backed by `arboard`.
pub struct SystemClipboard {
    inner: Clipboard,
}

impl SystemClipboard {
    pub fn new() -> ClipResult<Self> {
        Clipboard::new()
            .map(|inner| Self { inner })
            .map_err(|e| ClipError::Clipboard(e.to_string()))
    }
}

impl ClipboardDevice for SystemClipboard {
    fn read(&mut self) -> ClipResult<String> {
        match self.inner.get_text() {
            Ok(text) => Ok(text),
            // an empty clipboard reads as an empty string
            Err(arboard::Error::ContentNotAvailable) => Ok(String::new()),
            Err(e) => Err(ClipError::Clipboard(e.to_string())),
        }
    }

    fn write(&mut self, text: &str) -> ClipResult<()> {
        self.inner
            .set_text(text.to_string())
            .map_err(|e| ClipError::Clipboard(e.to_string()))
    }
}
