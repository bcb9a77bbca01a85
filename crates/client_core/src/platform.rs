//! Host side effects the export workflow depends on, kept behind a
//! trait so workflows stay host-agnostic and tests can substitute a
//! double. The desktop apps provide the real implementations.

use std::path::PathBuf;

use thiserror::Error;

/// Clipboard failures stay distinct from transport failures; the UI
/// reports them with a copy-specific message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlatformError {
    #[error("clipboard unavailable: {0}")]
    Clipboard(String),
    #[error("{0}")]
    Save(String),
}

pub trait Platform: Send + Sync {
    /// Persists the credential config under the fixed file name and
    /// reports where it landed.
    fn save_credential_config(&self, contents: &str) -> Result<PathBuf, PlatformError>;

    fn write_clipboard_text(&self, text: &str) -> Result<(), PlatformError>;
}
