//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with help
//! text and a stable exit code per failure class.

use miette::Diagnostic;
use thiserror::Error;

use fabricctl_config::ConfigError;
use fabricctl_core::CoreError;
use fabricctl_core::error::SyncFailure;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const VALIDATION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const PARTIAL: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to controller at {url}")]
    #[diagnostic(
        code(fabricctl::connection_failed),
        help(
            "{reason}\n\
             Check NDFC_MANAGEMENT_IP in your env file. Self-signed certs need --insecure (-k)."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(fabricctl::timeout),
        help("Raise NDFC_API_TIMEOUT or pass --timeout.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(fabricctl::auth_failed),
        help("Verify NDFC_API_KEY, or LOGIN_USERNAME and LOGIN_PASSWORD, in your env file.")
    )]
    AuthFailed { message: String },

    #[error("{key} is not set")]
    #[diagnostic(
        code(fabricctl::missing_secret),
        help("Add {key}=... to {checked}, or export it in the environment.")
    )]
    MissingSecret { key: String, checked: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("{kind} '{key}' is not declared")]
    #[diagnostic(
        code(fabricctl::not_found),
        help("Looked in {location}")
    )]
    NotFound {
        kind: String,
        key: String,
        location: String,
    },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(fabricctl::validation))]
    Validation { message: String },

    #[error(transparent)]
    #[diagnostic(code(fabricctl::config))]
    Config(ConfigError),

    // ── Controller ───────────────────────────────────────────────────
    #[error("Controller rejected the request (HTTP {status})")]
    #[diagnostic(code(fabricctl::api_error), help("{body}"))]
    Api { status: u16, body: String },

    #[error("{message}")]
    #[diagnostic(
        code(fabricctl::conflict),
        help("Detach the remaining attachments, then retry the delete.")
    )]
    Conflict { message: String },

    #[error("{kind}: {failed} of {total} action(s) failed")]
    #[diagnostic(
        code(fabricctl::partial_sync),
        help("{details}\nEvery other action was applied; re-run once the cause is fixed.")
    )]
    PartialSync {
        kind: String,
        failed: usize,
        total: usize,
        details: String,
    },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("'{action}' requires confirmation")]
    #[diagnostic(
        code(fabricctl::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::MissingSecret { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::VALIDATION,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::PartialSync { .. } => exit_code::PARTIAL,
            Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::Config(ConfigError::Validation { .. } | ConfigError::EnvFile { .. }) => {
                exit_code::VALIDATION
            }
            _ => exit_code::GENERAL,
        }
    }

    pub fn partial(kind: impl Into<String>, total: usize, failures: &[SyncFailure]) -> Self {
        Self::PartialSync {
            kind: kind.into(),
            failed: failures.len(),
            total,
            details: failures
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConfigNotFound { kind, key, path } => Self::NotFound {
                kind,
                key,
                location: path.map_or_else(
                    || "the project's network_configs/ tree".into(),
                    |p| p.display().to_string(),
                ),
            },
            err @ (CoreError::ConfigValidation { .. }
            | CoreError::RangeParse(_)
            | CoreError::PayloadBuild { .. }
            | CoreError::Yaml { .. }) => Self::Validation {
                message: err.to_string(),
            },
            CoreError::Io { path, source } => Self::Io(std::io::Error::new(
                source.kind(),
                format!("{}: {source}", path.display()),
            )),
            CoreError::ControllerApi { status, body } => Self::Api { status, body },
            err @ (CoreError::DependencyConflict { .. } | CoreError::DetachFailed { .. }) => {
                Self::Conflict {
                    message: err.to_string(),
                }
            }
            CoreError::Connection { url, reason } => Self::ConnectionFailed { url, reason },
            CoreError::Authentication { message } => Self::AuthFailed { message },
            CoreError::Timeout { timeout_secs } => Self::Timeout {
                seconds: timeout_secs,
            },
            CoreError::Decode { message } => Self::Api {
                status: 200,
                body: message,
            },
            CoreError::SyncFailed {
                kind,
                total,
                failures,
            } => Self::partial(kind, total, &failures),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::MissingSecret { key, source_desc } => Self::MissingSecret {
                key,
                checked: source_desc,
            },
            other => Self::Config(other),
        }
    }
}

impl From<fabricctl_api::Error> for CliError {
    fn from(err: fabricctl_api::Error) -> Self {
        CoreError::from(err).into()
    }
}
