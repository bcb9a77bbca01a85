//! The "list + submit" workflow: fetch the groups snapshot, collect
//! the user's selection, submit one access request.
//!
//! `AccessRequestForm` is a small state machine. The UI calls a
//! guarded `begin_*` transition, performs the corresponding API call
//! on whatever executor it owns, then feeds the settled result back
//! through `apply_*`. The guards are what enforce the single
//! in-flight call per workflow instance.

use async_trait::async_trait;
use shared::protocol::{AccessRequest, AccessRequestResult, GroupsSnapshot, Permission};
use thiserror::Error;
use tracing::debug;

use crate::transport::{ApiClient, TransportError};

/// Backend surface the workflow needs. Implemented by [`ApiClient`];
/// tests substitute recording doubles.
#[async_trait]
pub trait AccessRequestApi: Send + Sync {
    async fn fetch_groups(&self) -> Result<GroupsSnapshot, TransportError>;
    async fn submit_request(
        &self,
        request: &AccessRequest,
    ) -> Result<AccessRequestResult, TransportError>;
}

#[async_trait]
impl AccessRequestApi for ApiClient {
    async fn fetch_groups(&self) -> Result<GroupsSnapshot, TransportError> {
        self.get_json(&["groups"]).await
    }

    async fn submit_request(
        &self,
        request: &AccessRequest,
    ) -> Result<AccessRequestResult, TransportError> {
        self.post_json(&["submit"], request).await
    }
}

/// Client-side validation. The two cases stay distinct because the
/// corrective action differs: one needs an admin to create groups,
/// the other needs the user to pick one.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No groups are available to request access to.")]
    NoGroupsAvailable,
    #[error("Please select a group.")]
    MissingSelection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPhase {
    Loading,
    LoadFailed,
    Ready,
    Submitting,
    /// Terminal: the workflow instance is single-shot per open, so a
    /// successful submit leaves only a close affordance.
    Succeeded,
}

#[derive(Debug)]
pub struct AccessRequestForm {
    phase: RequestPhase,
    groups: GroupsSnapshot,
    pub selected_group: String,
    pub permission: Permission,
    pub justification: String,
    error: Option<String>,
    result: Option<AccessRequestResult>,
}

impl Default for AccessRequestForm {
    fn default() -> Self {
        Self::new()
    }
}

impl AccessRequestForm {
    pub fn new() -> Self {
        Self {
            phase: RequestPhase::Loading,
            groups: GroupsSnapshot {
                available_groups: Vec::new(),
                my_groups: Vec::new(),
            },
            selected_group: String::new(),
            permission: Permission::ReadOnly,
            justification: String::new(),
            error: None,
            result: None,
        }
    }

    pub fn phase(&self) -> RequestPhase {
        self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn result(&self) -> Option<&AccessRequestResult> {
        self.result.as_ref()
    }

    pub fn available_groups(&self) -> &[String] {
        &self.groups.available_groups
    }

    pub fn my_groups(&self) -> &[String] {
        &self.groups.my_groups
    }

    /// True while a fetch or submit is outstanding; the triggering
    /// controls must stay disabled for the duration.
    pub fn is_in_flight(&self) -> bool {
        matches!(self.phase, RequestPhase::Loading | RequestPhase::Submitting)
    }

    pub fn can_submit(&self) -> bool {
        self.phase == RequestPhase::Ready
    }

    /// Arms the groups fetch. Only the initial entry and a manual
    /// retry after a failed load pass the guard; a loaded form never
    /// refetches within the same open.
    pub fn begin_load(&mut self) -> bool {
        match self.phase {
            RequestPhase::Loading => true,
            RequestPhase::LoadFailed => {
                self.phase = RequestPhase::Loading;
                self.error = None;
                true
            }
            _ => false,
        }
    }

    pub fn apply_load(&mut self, outcome: Result<GroupsSnapshot, TransportError>) {
        if self.phase != RequestPhase::Loading {
            return;
        }
        match outcome {
            Ok(snapshot) => {
                debug!(
                    available = snapshot.available_groups.len(),
                    member_of = snapshot.my_groups.len(),
                    "groups snapshot loaded"
                );
                // Default selection: first entry, server order.
                self.selected_group = snapshot
                    .available_groups
                    .first()
                    .cloned()
                    .unwrap_or_default();
                self.groups = snapshot;
                self.phase = RequestPhase::Ready;
                self.error = None;
            }
            Err(err) => {
                self.phase = RequestPhase::LoadFailed;
                self.error = Some(format!("Failed to load groups: {err}"));
            }
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.groups.available_groups.is_empty() {
            Err(ValidationError::NoGroupsAvailable)
        } else if self.selected_group.is_empty() {
            Err(ValidationError::MissingSelection)
        } else {
            Ok(())
        }
    }

    /// Arms the submit and hands back the request to send, or `None`
    /// when the form is not submittable (load pending, submit already
    /// in flight, terminal, or validation failed — the validation
    /// message lands in `error()`).
    pub fn begin_submit(&mut self) -> Option<AccessRequest> {
        if self.phase != RequestPhase::Ready {
            return None;
        }
        if let Err(err) = self.validate() {
            self.error = Some(err.to_string());
            return None;
        }
        self.error = None;
        self.phase = RequestPhase::Submitting;
        let justification = self.justification.trim();
        Some(AccessRequest {
            tenant_name: self.selected_group.clone(),
            permission: self.permission,
            justification: (!justification.is_empty()).then(|| justification.to_string()),
        })
    }

    pub fn apply_submit(&mut self, outcome: Result<AccessRequestResult, TransportError>) {
        if self.phase != RequestPhase::Submitting {
            return;
        }
        match outcome {
            Ok(result) => {
                self.phase = RequestPhase::Succeeded;
                self.error = None;
                self.result = Some(result);
            }
            Err(err) => {
                // Back to Ready with prior input retained so the user
                // can correct and resubmit immediately.
                self.phase = RequestPhase::Ready;
                self.error = Some(format!("Failed to submit request: {err}"));
            }
        }
    }

    /// Begin/apply pair for callers that can await in place (CLI,
    /// tests). The GUI drives the halves from its worker instead.
    pub async fn load(&mut self, api: &dyn AccessRequestApi) {
        if !self.begin_load() {
            return;
        }
        let outcome = api.fetch_groups().await;
        self.apply_load(outcome);
    }

    /// Returns true when a submit was actually issued.
    pub async fn submit(&mut self, api: &dyn AccessRequestApi) -> bool {
        let Some(request) = self.begin_submit() else {
            return false;
        };
        let outcome = api.submit_request(&request).await;
        self.apply_submit(outcome);
        true
    }
}

#[cfg(test)]
#[path = "tests/access_request_tests.rs"]
mod tests;
