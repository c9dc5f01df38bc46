//! Configuration for fabricctl.
//!
//! Two layers with different trust levels:
//!
//! - **Settings**: non-secret tool preferences. Built-in defaults, then
//!   `config.toml` in the platform config dir, then `FABRICCTL_*` env.
//! - **Secrets**: controller address and credentials, read from a
//!   dotenv-style file with process env taking precedence. Never from
//!   YAML, never logged.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use fabricctl_api::auth::DEFAULT_DOMAIN;
use fabricctl_api::{Credentials, TlsMode, TransportConfig};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Default `X-Nd-Username` for API-key auth.
pub const DEFAULT_API_USERNAME: &str = "admin";

const ENV_FILE_NAME: &str = ".env";
const FABRIC_BUILDER_FILE: &str = "network_configs/fabric_builder.yaml";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("{key} is not set (checked process env and {source_desc})")]
    MissingSecret { key: String, source_desc: String },

    #[error("{}:{line}: {reason}", path.display())]
    EnvFile {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("settings loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Settings ────────────────────────────────────────────────────────

/// Non-secret tool preferences.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Settings {
    /// Project tree holding `network_configs/` and `resources/`.
    pub project_root: Option<PathBuf>,

    /// Env file with controller secrets. Defaults to `{project_root}/.env`.
    pub env_file: Option<PathBuf>,

    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Controller request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Skip TLS verification. Controllers usually ship self-signed certs.
    #[serde(default = "default_insecure")]
    pub insecure: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project_root: None,
            env_file: None,
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            insecure: default_insecure(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_insecure() -> bool {
    true
}

/// Resolve the settings file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "fabricctl", "fabricctl").map_or_else(
        || PathBuf::from(".fabricctl").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Defaults, then the platform config file, then `FABRICCTL_*` env.
pub fn load_settings() -> Result<Settings, ConfigError> {
    load_settings_from(&config_path())
}

pub fn load_settings_from(path: &Path) -> Result<Settings, ConfigError> {
    let settings: Settings = Figment::new()
        .merge(Serialized::defaults(Settings::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("FABRICCTL_"))
        .extract()?;
    Ok(settings)
}

/// Write settings as TOML, creating the parent directory.
pub fn save_settings(settings: &Settings, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let text = toml::to_string_pretty(settings)?;
    std::fs::write(path, text).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ── Env file ────────────────────────────────────────────────────────

/// Parsed `KEY=VALUE` secrets file. Lookups consult the process env first.
#[derive(Debug, Clone, Default)]
pub struct EnvFile {
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
}

impl EnvFile {
    /// An empty file: every lookup falls through to the process env.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let values = parse_env(&text).map_err(|(line, reason)| ConfigError::EnvFile {
            path: path.to_path_buf(),
            line,
            reason,
        })?;
        debug!(path = %path.display(), keys = values.len(), "env file loaded");
        Ok(Self {
            path: Some(path.to_path_buf()),
            values,
        })
    }

    /// Load `path` if it exists, otherwise return an empty file.
    pub fn load_optional(path: &Path) -> Result<Self, ConfigError> {
        if path.is_file() {
            Self::load(path)
        } else {
            debug!(path = %path.display(), "no env file");
            Ok(Self::empty())
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Value from the file alone.
    pub fn file_value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Process env wins over the file. Blank values count as unset.
    pub fn get(&self, key: &str) -> Option<String> {
        self.get_with(key, |k| std::env::var(k).ok())
    }

    fn get_with(&self, key: &str, process: impl Fn(&str) -> Option<String>) -> Option<String> {
        process(key)
            .or_else(|| self.values.get(key).cloned())
            .filter(|v| !v.trim().is_empty())
    }

    fn describe(&self) -> String {
        self.path
            .as_ref()
            .map_or_else(|| "no env file".into(), |p| p.display().to_string())
    }
}

/// Parse dotenv-style text: `KEY=VALUE` lines, `#` comments, an optional
/// `export ` prefix, and single or double quoted values.
pub fn parse_env(text: &str) -> Result<BTreeMap<String, String>, (usize, String)> {
    let mut out = BTreeMap::new();
    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, value)) = line.split_once('=') else {
            return Err((line_no, format!("expected KEY=VALUE, got '{line}'")));
        };
        let key = key.trim();
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err((line_no, format!("invalid key '{key}'")));
        }
        out.insert(key.to_owned(), unquote(value.trim()));
    }
    Ok(out)
}

fn unquote(value: &str) -> String {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return value[1..value.len() - 1].to_owned();
        }
    }
    // Unquoted: a ` #` starts a trailing comment.
    value
        .split_once(" #")
        .map_or(value, |(v, _)| v)
        .trim_end()
        .to_owned()
}

// ── Environment ─────────────────────────────────────────────────────

/// Command-line overrides that take precedence over settings.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub project_root: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

/// The resolved project root plus its secrets file.
#[derive(Debug, Clone)]
pub struct Environment {
    pub project_root: PathBuf,
    pub env: EnvFile,
}

impl Environment {
    /// Root: flag, `FABRIC_PROJECT_ROOT`, settings, current directory.
    /// Env file: flag, settings (`FABRICCTL_ENV_FILE`), `{root}/.env`.
    pub fn resolve(overrides: &Overrides, settings: &Settings) -> Result<Self, ConfigError> {
        let explicit = overrides.env_file.as_ref().or(settings.env_file.as_ref());
        let env = match explicit {
            Some(path) => EnvFile::load(path)?,
            None => EnvFile::empty(),
        };

        let project_root = overrides
            .project_root
            .clone()
            .or_else(|| env.get("FABRIC_PROJECT_ROOT").map(PathBuf::from))
            .or_else(|| settings.project_root.clone())
            .map_or_else(current_dir, Ok)?;

        let env = if explicit.is_some() {
            env
        } else {
            EnvFile::load_optional(&project_root.join(ENV_FILE_NAME))?
        };
        Ok(Self { project_root, env })
    }

    pub fn secrets(&self) -> Result<Secrets, ConfigError> {
        Secrets::from_env(&self.env, &self.project_root)
    }
}

fn current_dir() -> Result<PathBuf, ConfigError> {
    std::env::current_dir().map_err(|source| ConfigError::Io {
        path: PathBuf::from("."),
        source,
    })
}

// ── Secrets ─────────────────────────────────────────────────────────

/// Controller address and credentials.
#[derive(Debug, Clone)]
pub struct Secrets {
    pub management_ip: String,
    pub api_key: Option<SecretString>,
    pub login_username: Option<String>,
    pub login_password: Option<SecretString>,
    /// `NDFC_API_TIMEOUT` in seconds, if set.
    pub api_timeout: Option<u64>,
    pub switch_password: Option<SecretString>,
    source_desc: String,
}

impl Secrets {
    pub fn from_env(env: &EnvFile, project_root: &Path) -> Result<Self, ConfigError> {
        Self::resolve_with(env, project_root, |k| std::env::var(k).ok())
    }

    fn resolve_with(
        env: &EnvFile,
        project_root: &Path,
        process: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let get = |key: &str| env.get_with(key, &process);
        let source_desc = env.describe();

        let management_ip = match get("NDFC_MANAGEMENT_IP") {
            Some(ip) => ip,
            None => fabric_builder_ip(project_root)?.ok_or_else(|| ConfigError::MissingSecret {
                key: "NDFC_MANAGEMENT_IP".into(),
                source_desc: format!("{source_desc} and {FABRIC_BUILDER_FILE}"),
            })?,
        };

        let api_timeout = get("NDFC_API_TIMEOUT")
            .map(|raw| {
                raw.trim().parse::<u64>().map_err(|_| ConfigError::Validation {
                    field: "NDFC_API_TIMEOUT".into(),
                    reason: format!("'{raw}' is not a number of seconds"),
                })
            })
            .transpose()?;

        Ok(Self {
            management_ip,
            api_key: get("NDFC_API_KEY").map(SecretString::from),
            login_username: get("LOGIN_USERNAME"),
            login_password: get("LOGIN_PASSWORD").map(SecretString::from),
            api_timeout,
            switch_password: get("SWITCH_PASSWORD").map(SecretString::from),
            source_desc,
        })
    }

    /// API key when present, otherwise a login. The API key is paired
    /// with `LOGIN_USERNAME` or `admin`.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        if let Some(key) = &self.api_key {
            return Ok(Credentials::ApiKey {
                key: key.clone(),
                username: self
                    .login_username
                    .clone()
                    .unwrap_or_else(|| DEFAULT_API_USERNAME.into()),
            });
        }
        match (&self.login_username, &self.login_password) {
            (Some(username), Some(password)) => Ok(Credentials::Login {
                username: username.clone(),
                password: password.clone(),
                domain: DEFAULT_DOMAIN.into(),
            }),
            _ => Err(self.missing("NDFC_API_KEY")),
        }
    }

    /// Device password used for switch discovery.
    pub fn switch_password(&self) -> Result<&SecretString, ConfigError> {
        self.switch_password
            .as_ref()
            .ok_or_else(|| self.missing("SWITCH_PASSWORD"))
    }

    fn missing(&self, key: &str) -> ConfigError {
        ConfigError::MissingSecret {
            key: key.into(),
            source_desc: self.source_desc.clone(),
        }
    }
}

#[derive(Deserialize)]
struct FabricBuilder {
    #[serde(rename = "Cisco")]
    cisco: Option<CiscoSection>,
}

#[derive(Deserialize)]
struct CiscoSection {
    #[serde(rename = "NDFC")]
    ndfc: Option<NdfcSection>,
}

#[derive(Deserialize)]
struct NdfcSection {
    ip: Option<String>,
}

/// `Cisco.NDFC.ip` from `network_configs/fabric_builder.yaml`, if any.
fn fabric_builder_ip(project_root: &Path) -> Result<Option<String>, ConfigError> {
    let path = project_root.join(FABRIC_BUILDER_FILE);
    if !path.is_file() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    let doc: FabricBuilder =
        serde_yaml::from_str(&text).map_err(|source| ConfigError::Yaml { path, source })?;
    Ok(doc
        .cisco
        .and_then(|c| c.ndfc)
        .and_then(|n| n.ip)
        .filter(|ip| !ip.trim().is_empty()))
}

// ── Controller connection ───────────────────────────────────────────

/// Everything `NdfcClient::connect` needs.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub base_url: String,
    pub credentials: Credentials,
    pub transport: TransportConfig,
}

/// Combine settings and secrets. `NDFC_API_TIMEOUT` beats `timeout`.
pub fn controller_config(settings: &Settings, secrets: &Secrets) -> Result<ControllerConfig, ConfigError> {
    let host = secrets.management_ip.trim();
    if host.is_empty() {
        return Err(ConfigError::Validation {
            field: "NDFC_MANAGEMENT_IP".into(),
            reason: "must not be empty".into(),
        });
    }
    let base_url = if host.contains("://") {
        host.to_owned()
    } else {
        format!("https://{host}")
    };
    let tls = if settings.insecure {
        TlsMode::DangerAcceptInvalid
    } else {
        TlsMode::System
    };
    Ok(ControllerConfig {
        base_url,
        credentials: secrets.credentials()?,
        transport: TransportConfig {
            tls,
            timeout: Duration::from_secs(secrets.api_timeout.unwrap_or(settings.timeout)),
        },
    })
}
