//! Backend commands queued from UI to the backend worker.

use shared::protocol::AccessRequest;

/// Identifies the modal instance a command was issued for. Replies
/// carrying a token other than the currently open modal's are stale
/// and get discarded, so a call settling after the dialog closed can
/// never touch a disposed workflow.
pub type ModalToken = u64;

pub enum BackendCommand {
    LoadGroups {
        modal: ModalToken,
    },
    SubmitRequest {
        modal: ModalToken,
        request: AccessRequest,
    },
    LoadCredentialStatus {
        modal: ModalToken,
    },
    DownloadConfig {
        modal: ModalToken,
    },
    CopyConfig {
        modal: ModalToken,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::LoadGroups { .. } => "load_groups",
            BackendCommand::SubmitRequest { .. } => "submit_request",
            BackendCommand::LoadCredentialStatus { .. } => "load_credential_status",
            BackendCommand::DownloadConfig { .. } => "download_config",
            BackendCommand::CopyConfig { .. } => "copy_config",
        }
    }
}
