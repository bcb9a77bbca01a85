//! Client core for the tenant access-request service: a thin HTTP
//! transport plus the two modal workflows (request tenant access,
//! export credentials) as host-agnostic state machines.
//!
//! The UI layer owns rendering and scheduling; everything here is
//! plain state with guarded `begin_*`/`apply_*` transitions so that a
//! workflow can be driven from an async worker, a CLI, or a test
//! without any host framework in scope.

pub mod access_request;
pub mod credential_export;
pub mod platform;
pub mod transport;

pub use access_request::{AccessRequestApi, AccessRequestForm, RequestPhase, ValidationError};
pub use credential_export::{CredentialApi, CredentialExportPanel, StatusPhase, COPY_ACK_TTL};
pub use platform::{Platform, PlatformError};
pub use transport::{ApiClient, TransportError};
