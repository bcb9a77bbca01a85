use std::{
    path::PathBuf,
    sync::Mutex,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use shared::protocol::CredentialStatus;

use super::*;
use crate::{
    platform::{Platform, PlatformError},
    transport::TransportError,
};

fn status(cookies_valid: bool, local_mode: Option<bool>) -> CredentialStatus {
    CredentialStatus {
        username: "ada".into(),
        hub_url: "https://hub.example.org".into(),
        cookies_valid,
        local_mode,
        missing_cookies: if cookies_valid {
            Vec::new()
        } else {
            vec!["session".into()]
        },
    }
}

fn ready_panel() -> CredentialExportPanel {
    let mut panel = CredentialExportPanel::new();
    panel.apply_load(Ok(status(true, None)));
    panel
}

struct ScriptedCredentialApi {
    status: Result<CredentialStatus, TransportError>,
    config: Result<String, TransportError>,
}

#[async_trait]
impl CredentialApi for ScriptedCredentialApi {
    async fn fetch_status(&self) -> Result<CredentialStatus, TransportError> {
        self.status.clone()
    }

    async fn fetch_config(&self) -> Result<String, TransportError> {
        self.config.clone()
    }
}

#[derive(Default)]
struct RecordingPlatform {
    saved: Mutex<Vec<String>>,
    copied: Mutex<Vec<String>>,
    clipboard_failure: Option<String>,
}

impl Platform for RecordingPlatform {
    fn save_credential_config(&self, contents: &str) -> Result<PathBuf, PlatformError> {
        self.saved.lock().expect("lock").push(contents.to_string());
        Ok(PathBuf::from("/downloads/remote-config.yaml"))
    }

    fn write_clipboard_text(&self, text: &str) -> Result<(), PlatformError> {
        if let Some(reason) = &self.clipboard_failure {
            return Err(PlatformError::Clipboard(reason.clone()));
        }
        self.copied.lock().expect("lock").push(text.to_string());
        Ok(())
    }
}

#[test]
fn exports_are_enabled_exactly_when_ready() {
    let cases = [
        (true, None, true),
        (true, Some(false), true),
        (false, Some(true), true),
        (false, Some(false), false),
        (false, None, false),
    ];
    for (cookies_valid, local_mode, expected) in cases {
        let mut panel = CredentialExportPanel::new();
        panel.apply_load(Ok(status(cookies_valid, local_mode)));
        assert_eq!(
            panel.is_ready(),
            expected,
            "cookies_valid={cookies_valid} local_mode={local_mode:?}"
        );
        assert_eq!(panel.can_download(), expected);
        assert_eq!(panel.can_copy(), expected);
        assert_eq!(panel.begin_download(), expected);
    }
}

#[test]
fn copy_acknowledgment_reverts_after_two_seconds_and_not_before() {
    let mut panel = ready_panel();
    let t0 = Instant::now();

    assert!(panel.begin_copy());
    panel.apply_copy(Ok(()), t0);

    assert!(panel.show_copied(t0));
    assert!(panel.show_copied(t0 + Duration::from_millis(1999)));
    assert!(!panel.show_copied(t0 + Duration::from_millis(2000)));
    assert!(!panel.show_copied(t0 + Duration::from_secs(60)));
}

#[test]
fn copy_failure_does_not_disable_download_and_vice_versa() {
    let mut panel = ready_panel();
    let now = Instant::now();

    assert!(panel.begin_copy());
    panel.apply_copy(Err("permission denied".into()), now);
    assert_eq!(
        panel.copy_error(),
        Some("Failed to copy to clipboard: permission denied")
    );
    assert!(panel.can_download(), "copy failure must not block download");

    assert!(panel.begin_download());
    panel.apply_download(Err("disk full".into()));
    assert_eq!(
        panel.download_error(),
        Some("Failed to save configuration: disk full")
    );
    assert!(panel.can_copy(), "download failure must not block copy");

    // The slots are independent: the copy error is still displayed.
    assert!(panel.copy_error().is_some());
}

#[test]
fn each_export_allows_at_most_one_in_flight_call() {
    let mut panel = ready_panel();

    assert!(panel.begin_download());
    assert!(!panel.begin_download());
    // The other action is unaffected by the in-flight download.
    assert!(panel.begin_copy());
    assert!(!panel.begin_copy());

    panel.apply_download(Ok(PathBuf::from("/downloads/remote-config.yaml")));
    assert!(panel.begin_download());
}

#[test]
fn load_failure_is_prefixed_and_retryable() {
    let mut panel = CredentialExportPanel::new();
    panel.apply_load(Err(TransportError::Status {
        status: 503,
        message: "Request failed: 503".into(),
    }));

    assert_eq!(panel.phase(), StatusPhase::LoadFailed);
    assert_eq!(
        panel.load_error(),
        Some("Failed to load credential status: Request failed: 503")
    );
    assert!(!panel.can_download());

    assert!(panel.begin_load());
    assert_eq!(panel.phase(), StatusPhase::Loading);
    assert_eq!(panel.load_error(), None);
}

#[tokio::test]
async fn download_fetches_config_and_saves_through_the_platform() {
    let api = ScriptedCredentialApi {
        status: Ok(status(true, None)),
        config: Ok("hub:\n  token: abc\n".into()),
    };
    let platform = RecordingPlatform::default();

    let mut panel = CredentialExportPanel::new();
    panel.load(&api).await;
    assert!(panel.download(&api, &platform).await);

    assert_eq!(
        panel.saved_to(),
        Some(&PathBuf::from("/downloads/remote-config.yaml"))
    );
    assert_eq!(
        platform.saved.lock().expect("lock").as_slice(),
        ["hub:\n  token: abc\n"]
    );
}

#[tokio::test]
async fn copy_surfaces_clipboard_failures_distinctly_from_load() {
    let api = ScriptedCredentialApi {
        status: Ok(status(false, Some(true))),
        config: Ok("hub:\n  token: abc\n".into()),
    };
    let platform = RecordingPlatform {
        clipboard_failure: Some("access denied by session".into()),
        ..RecordingPlatform::default()
    };

    let mut panel = CredentialExportPanel::new();
    panel.load(&api).await;
    assert!(panel.copy(&api, &platform).await);

    assert_eq!(
        panel.copy_error(),
        Some("Failed to copy to clipboard: clipboard unavailable: access denied by session")
    );
    assert_eq!(panel.load_error(), None);
    assert!(!panel.show_copied(Instant::now()));
}

#[tokio::test]
async fn export_config_fetch_failure_lands_in_the_action_slot() {
    let api = ScriptedCredentialApi {
        status: Ok(status(true, None)),
        config: Err(TransportError::Status {
            status: 401,
            message: "cookies expired".into(),
        }),
    };
    let platform = RecordingPlatform::default();

    let mut panel = CredentialExportPanel::new();
    panel.load(&api).await;
    assert!(panel.download(&api, &platform).await);

    assert_eq!(
        panel.download_error(),
        Some("Failed to save configuration: cookies expired")
    );
    assert!(platform.saved.lock().expect("lock").is_empty());
}

#[test]
fn late_settles_with_nothing_in_flight_are_discarded() {
    let mut panel = ready_panel();
    panel.apply_download(Ok(PathBuf::from("/tmp/elsewhere.yaml")));
    assert_eq!(panel.saved_to(), None);
    panel.apply_copy(Ok(()), Instant::now());
    assert!(!panel.show_copied(Instant::now()));
}
