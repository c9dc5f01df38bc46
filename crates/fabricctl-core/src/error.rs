// ── Core error types ──
//
// Errors surfaced by the loader, payload builder, reconciler and entity
// managers. The `From<fabricctl_api::Error>` impl folds transport and
// controller failures into the same taxonomy, so consumers never branch
// on reqwest details.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::range::RangeParseError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Configuration errors ─────────────────────────────────────────
    #[error("{kind} configuration not found: {key}")]
    ConfigNotFound {
        kind: String,
        key: String,
        path: Option<PathBuf>,
    },

    #[error("Invalid {entity} configuration: field '{field}' {reason}")]
    ConfigValidation {
        entity: String,
        field: String,
        reason: String,
    },

    #[error(transparent)]
    RangeParse(#[from] RangeParseError),

    #[error("Cannot build payload: field '{field}' {reason}")]
    PayloadBuild { field: String, reason: String },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    // ── Controller errors ────────────────────────────────────────────
    #[error("Controller rejected the request (HTTP {status}): {body}")]
    ControllerApi { status: u16, body: String },

    #[error("{entity} still has attachments: {message}")]
    DependencyConflict { entity: String, message: String },

    #[error("Could not detach {entity} from {}", failed_switches(.failures))]
    DetachFailed {
        entity: String,
        failures: Vec<DetachFailure>,
    },

    #[error("Cannot connect to controller at {url}: {reason}")]
    Connection { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("Controller request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Unexpected controller response: {message}")]
    Decode { message: String },

    // ── Aggregate ────────────────────────────────────────────────────
    #[error("{kind} sync finished with {} of {total} action(s) failed", .failures.len())]
    SyncFailed {
        kind: String,
        total: usize,
        failures: Vec<SyncFailure>,
    },
}

/// One switch a detach call failed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetachFailure {
    pub switch: String,
    pub cause: String,
}

/// One failed identity in a reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncFailure {
    pub identity: String,
    pub phase: String,
    pub cause: String,
}

impl fmt::Display for SyncFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.identity, self.phase, self.cause)
    }
}

fn failed_switches(failures: &[DetachFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{} ({})", f.switch, f.cause))
        .collect::<Vec<_>>()
        .join(", ")
}

impl CoreError {
    /// Shorthand for a missing required field.
    pub fn missing_field(entity: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ConfigValidation {
            entity: entity.into(),
            field: field.into(),
            reason: "is required".into(),
        }
    }

    /// Errors that a plain re-run may clear.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::DependencyConflict { .. }
                | Self::DetachFailed { .. }
                | Self::Timeout { .. }
                | Self::Connection { .. }
        ) || matches!(self, Self::ControllerApi { status, .. } if matches!(status, 502..=504))
    }

    /// Reclassify a delete rejection. The controller refuses to delete a
    /// VRF or network that is still attached; that case becomes a
    /// retryable [`CoreError::DependencyConflict`].
    pub fn from_delete_rejection(entity: &str, err: Self) -> Self {
        match err {
            Self::ControllerApi { status, body }
                if (400..500).contains(&status) && body.to_lowercase().contains("attach") =>
            {
                Self::DependencyConflict {
                    entity: entity.to_owned(),
                    message: body,
                }
            }
            other => other,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<fabricctl_api::Error> for CoreError {
    fn from(err: fabricctl_api::Error) -> Self {
        match err {
            fabricctl_api::Error::Authentication { message } => Self::Authentication { message },
            fabricctl_api::Error::InvalidApiKey => Self::Authentication {
                message: "Invalid API key".into(),
            },
            fabricctl_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    Self::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    Self::Connection {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    Self::ControllerApi {
                        status: e.status().map_or(0, |s| s.as_u16()),
                        body: e.to_string(),
                    }
                }
            }
            fabricctl_api::Error::InvalidUrl(e) => Self::Connection {
                url: String::new(),
                reason: format!("Invalid URL: {e}"),
            },
            fabricctl_api::Error::Timeout { timeout_secs } => Self::Timeout { timeout_secs },
            fabricctl_api::Error::Tls(msg) => Self::Connection {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            fabricctl_api::Error::Api { status, body } => Self::ControllerApi { status, body },
            fabricctl_api::Error::Deserialization { message, body: _ } => {
                Self::Decode { message }
            }
        }
    }
}
