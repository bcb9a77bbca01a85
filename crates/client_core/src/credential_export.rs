//! The "status + export" workflow: fetch credential readiness, then
//! save the config to disk or copy it to the clipboard.
//!
//! Download and copy are independent side effects with their own
//! in-flight flags and failure slots; a failed copy never disables a
//! subsequent download, and vice versa. Timing for the transient
//! "copied" acknowledgment is injected so tests run on simulated time.

use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use shared::protocol::CredentialStatus;
use tracing::debug;

use crate::{
    platform::Platform,
    transport::{ApiClient, TransportError},
};

/// How long the "copied" acknowledgment stays up before reverting.
pub const COPY_ACK_TTL: Duration = Duration::from_millis(2000);

#[async_trait]
pub trait CredentialApi: Send + Sync {
    async fn fetch_status(&self) -> Result<CredentialStatus, TransportError>;
    async fn fetch_config(&self) -> Result<String, TransportError>;
}

#[async_trait]
impl CredentialApi for ApiClient {
    async fn fetch_status(&self) -> Result<CredentialStatus, TransportError> {
        self.get_json(&["credentials", "info"]).await
    }

    async fn fetch_config(&self) -> Result<String, TransportError> {
        self.get_text(&["credentials", "config"]).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPhase {
    Loading,
    LoadFailed,
    Ready,
}

#[derive(Debug)]
pub struct CredentialExportPanel {
    phase: StatusPhase,
    status: Option<CredentialStatus>,
    load_error: Option<String>,
    download_in_flight: bool,
    copy_in_flight: bool,
    download_error: Option<String>,
    copy_error: Option<String>,
    saved_to: Option<PathBuf>,
    copied_at: Option<Instant>,
}

impl Default for CredentialExportPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialExportPanel {
    pub fn new() -> Self {
        Self {
            phase: StatusPhase::Loading,
            status: None,
            load_error: None,
            download_in_flight: false,
            copy_in_flight: false,
            download_error: None,
            copy_error: None,
            saved_to: None,
            copied_at: None,
        }
    }

    pub fn phase(&self) -> StatusPhase {
        self.phase
    }

    pub fn status(&self) -> Option<&CredentialStatus> {
        self.status.as_ref()
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn download_error(&self) -> Option<&str> {
        self.download_error.as_deref()
    }

    pub fn copy_error(&self) -> Option<&str> {
        self.copy_error.as_deref()
    }

    pub fn saved_to(&self) -> Option<&PathBuf> {
        self.saved_to.as_ref()
    }

    pub fn is_download_in_flight(&self) -> bool {
        self.download_in_flight
    }

    pub fn is_copy_in_flight(&self) -> bool {
        self.copy_in_flight
    }

    /// Client-side convenience gate only; the backend re-checks when
    /// the config endpoint is hit.
    pub fn is_ready(&self) -> bool {
        self.phase == StatusPhase::Ready
            && self.status.as_ref().is_some_and(CredentialStatus::is_ready)
    }

    pub fn can_download(&self) -> bool {
        self.is_ready() && !self.download_in_flight
    }

    pub fn can_copy(&self) -> bool {
        self.is_ready() && !self.copy_in_flight
    }

    /// Arms the status fetch: initial entry or manual retry after a
    /// failed load. No automatic retry, no polling.
    pub fn begin_load(&mut self) -> bool {
        match self.phase {
            StatusPhase::Loading => true,
            StatusPhase::LoadFailed => {
                self.phase = StatusPhase::Loading;
                self.load_error = None;
                true
            }
            StatusPhase::Ready => false,
        }
    }

    pub fn apply_load(&mut self, outcome: Result<CredentialStatus, TransportError>) {
        if self.phase != StatusPhase::Loading {
            return;
        }
        match outcome {
            Ok(status) => {
                debug!(
                    username = %status.username,
                    ready = status.is_ready(),
                    missing = status.missing_cookies.len(),
                    "credential status loaded"
                );
                self.status = Some(status);
                self.phase = StatusPhase::Ready;
                self.load_error = None;
            }
            Err(err) => {
                self.phase = StatusPhase::LoadFailed;
                self.load_error = Some(format!("Failed to load credential status: {err}"));
            }
        }
    }

    pub fn begin_download(&mut self) -> bool {
        if !self.can_download() {
            return false;
        }
        self.download_in_flight = true;
        self.download_error = None;
        true
    }

    pub fn apply_download(&mut self, outcome: Result<PathBuf, String>) {
        if !self.download_in_flight {
            return;
        }
        self.download_in_flight = false;
        match outcome {
            Ok(path) => {
                self.saved_to = Some(path);
            }
            Err(reason) => {
                self.download_error = Some(format!("Failed to save configuration: {reason}"));
            }
        }
    }

    pub fn begin_copy(&mut self) -> bool {
        if !self.can_copy() {
            return false;
        }
        self.copy_in_flight = true;
        self.copy_error = None;
        true
    }

    pub fn apply_copy(&mut self, outcome: Result<(), String>, now: Instant) {
        if !self.copy_in_flight {
            return;
        }
        self.copy_in_flight = false;
        match outcome {
            Ok(()) => {
                self.copied_at = Some(now);
            }
            Err(reason) => {
                self.copy_error = Some(format!("Failed to copy to clipboard: {reason}"));
            }
        }
    }

    /// Whether the transient "copied" acknowledgment is still showing
    /// at `now`. Reverts once [`COPY_ACK_TTL`] has fully elapsed.
    pub fn show_copied(&self, now: Instant) -> bool {
        self.copied_at
            .is_some_and(|at| now.saturating_duration_since(at) < COPY_ACK_TTL)
    }

    pub async fn load(&mut self, api: &dyn CredentialApi) {
        if !self.begin_load() {
            return;
        }
        let outcome = api.fetch_status().await;
        self.apply_load(outcome);
    }

    /// Fetch the config body and hand it to the platform for saving.
    /// Returns true when a download was actually issued.
    pub async fn download(&mut self, api: &dyn CredentialApi, platform: &dyn Platform) -> bool {
        if !self.begin_download() {
            return false;
        }
        let outcome = match api.fetch_config().await {
            Ok(contents) => platform
                .save_credential_config(&contents)
                .map_err(|err| err.to_string()),
            Err(err) => Err(err.to_string()),
        };
        self.apply_download(outcome);
        true
    }

    /// Fetch the config body and write it to the system clipboard.
    /// Returns true when a copy was actually issued.
    pub async fn copy(&mut self, api: &dyn CredentialApi, platform: &dyn Platform) -> bool {
        if !self.begin_copy() {
            return false;
        }
        let outcome = match api.fetch_config().await {
            Ok(contents) => platform
                .write_clipboard_text(&contents)
                .map_err(|err| err.to_string()),
            Err(err) => Err(err.to_string()),
        };
        self.apply_copy(outcome, Instant::now());
        true
    }
}

#[cfg(test)]
#[path = "tests/credential_export_tests.rs"]
mod tests;
