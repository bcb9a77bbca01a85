//! Native implementation of the export side effects: the system
//! clipboard via arboard, and a fixed-name file in the user's
//! download directory (documented install location is the hub config
//! directory; the user moves the file there).

use std::path::PathBuf;

use arboard::Clipboard;
use client_core::{Platform, PlatformError};
use shared::protocol::CONFIG_FILE_NAME;
use tracing::info;

pub struct NativePlatform;

impl Platform for NativePlatform {
    fn save_credential_config(&self, contents: &str) -> Result<PathBuf, PlatformError> {
        let dir = dirs::download_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| {
                PlatformError::Save("could not resolve a download directory".to_string())
            })?;
        let path = dir.join(CONFIG_FILE_NAME);
        std::fs::write(&path, contents).map_err(|err| {
            PlatformError::Save(format!("could not write {}: {err}", path.display()))
        })?;
        info!(path = %path.display(), "credential config saved");
        Ok(path)
    }

    fn write_clipboard_text(&self, text: &str) -> Result<(), PlatformError> {
        let mut clipboard =
            Clipboard::new().map_err(|err| PlatformError::Clipboard(err.to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|err| PlatformError::Clipboard(err.to_string()))
    }
}
