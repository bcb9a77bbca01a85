//! Events flowing back from the backend worker to the UI loop.

use std::path::PathBuf;

use client_core::TransportError;
use shared::protocol::{AccessRequestResult, CredentialStatus, GroupsSnapshot};

use crate::backend_bridge::commands::ModalToken;

pub enum UiEvent {
    BackendReady,
    /// The worker could not start (runtime build or bad server URL);
    /// the app stays up but both actions report this status.
    BackendFailed(String),
    GroupsLoaded {
        modal: ModalToken,
        outcome: Result<GroupsSnapshot, TransportError>,
    },
    RequestSettled {
        modal: ModalToken,
        outcome: Result<AccessRequestResult, TransportError>,
    },
    CredentialStatusLoaded {
        modal: ModalToken,
        outcome: Result<CredentialStatus, TransportError>,
    },
    ConfigSaved {
        modal: ModalToken,
        outcome: Result<PathBuf, String>,
    },
    ConfigCopied {
        modal: ModalToken,
        outcome: Result<(), String>,
    },
}

impl UiEvent {
    pub fn name(&self) -> &'static str {
        match self {
            UiEvent::BackendReady => "backend_ready",
            UiEvent::BackendFailed(_) => "backend_failed",
            UiEvent::GroupsLoaded { .. } => "groups_loaded",
            UiEvent::RequestSettled { .. } => "request_settled",
            UiEvent::CredentialStatusLoaded { .. } => "credential_status_loaded",
            UiEvent::ConfigSaved { .. } => "config_saved",
            UiEvent::ConfigCopied { .. } => "config_copied",
        }
    }

    /// Token this event is scoped to, if it is modal-scoped at all.
    pub fn modal(&self) -> Option<ModalToken> {
        match self {
            UiEvent::BackendReady | UiEvent::BackendFailed(_) => None,
            UiEvent::GroupsLoaded { modal, .. }
            | UiEvent::RequestSettled { modal, .. }
            | UiEvent::CredentialStatusLoaded { modal, .. }
            | UiEvent::ConfigSaved { modal, .. }
            | UiEvent::ConfigCopied { modal, .. } => Some(*modal),
        }
    }
}
