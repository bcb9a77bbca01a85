use serde::{Deserialize, Serialize};

/// Path prefix every endpoint hangs under, relative to the hub base URL.
pub const API_PREFIX: &[&str] = &["api", "access-request"];

/// Fixed file name the credential config is saved under on export.
pub const CONFIG_FILE_NAME: &str = "remote-config.yaml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    #[default]
    ReadOnly,
    ReadWrite,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ReadOnly => "read_only",
            Permission::ReadWrite => "read_write",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Permission::ReadOnly => "Read only",
            Permission::ReadWrite => "Read / write",
        }
    }
}

/// Response of `GET .../groups`. Group order is the server's; clients
/// must not re-sort either sequence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupsSnapshot {
    pub available_groups: Vec<String>,
    pub my_groups: Vec<String>,
}

/// Body of `POST .../submit`. Constructed once at submit time and
/// consumed exactly once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessRequest {
    pub tenant_name: String,
    pub permission: Permission,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
}

/// Terminal, display-only outcome of a submitted access request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessRequestResult {
    pub status: String,
    pub message: String,
    pub tenant_name: String,
    pub permission: String,
}

/// Response of `GET .../credentials/info`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CredentialStatus {
    pub username: String,
    pub hub_url: String,
    pub cookies_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_mode: Option<bool>,
    #[serde(default)]
    pub missing_cookies: Vec<String>,
}

impl CredentialStatus {
    /// Export actions are gated on this client-side; the backend
    /// re-checks when the config endpoint is actually hit.
    pub fn is_ready(&self) -> bool {
        self.cookies_valid || self.local_mode == Some(true)
    }
}
