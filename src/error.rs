use thiserror::Error;

/// Errors that can escape a dispatcher operation.
///
/// Empty-history and invalid-register-key conditions are not represented
/// here: they are reported to the host through a status message and the
/// operation simply aborts without touching any state.
#[derive(Debug, Error)]
pub enum ClipError {
    /// The clipboard device could not be accessed at all.
    #[error("could not access clipboard: {0}")]
    Clipboard(String),

    /// The clipboard device never reflected a value we wrote to it.
    #[error("clipboard did not settle after write")]
    ClipboardUnready,

    /// The register file exists but does not parse as a JSON object of
    /// string values.
    #[error("malformed register file: {0}")]
    ImportFormat(String),

    #[error("register file I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type ClipResult<T> = Result<T, ClipError>;
