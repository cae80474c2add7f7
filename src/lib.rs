//! clipman - clipboard history core for editor integration
//!
//! Maintains a bounded, navigable history of copy/cut events, a consumable
//! yank stack, and single-character-keyed registers. The host editor wires
//! its clipboard and UI in through the traits in [`host`] and drives the
//! [`dispatcher::Dispatcher`] with [`dispatcher::Command`]s.

pub mod config;
pub mod dispatcher;
pub mod display;
pub mod error;
pub mod history;
pub mod host;
pub mod modes;
pub mod register_file;
pub mod registers;

// Re-export public interface
pub use config::{DisplayMode, RcLoader, Settings};
pub use dispatcher::{Command, Dispatcher, RegisterMode};
pub use error::{ClipError, ClipResult};
pub use history::{ClipEntry, ClipHistory, ClipSyntax};
pub use host::{ClipboardDevice, HostUi, SystemClipboard};
pub use modes::ModeState;
pub use registers::{RegisterCategory, RegisterStore};
