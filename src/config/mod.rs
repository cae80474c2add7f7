/// Configuration subsystem - feature flags and limits
///
/// This module defines the settings the dispatcher reads and an rc-file
/// loader for hosts that configure through a flat `.clipmanrc` file.
pub mod rc;

// Re-export public interface
pub use rc::{DisplayMode, RcLoader, Settings};
