//! Per-invocation context: settings, project tree, secrets and client.
//!
//! Offline commands (payload rendering, vPC listing) only touch the
//! loader, so the controller connection is made on first use.

use std::time::Duration;

use secrecy::SecretString;
use tracing::debug;

use fabricctl_api::{NdfcClient, TlsMode};
use fabricctl_config::{Environment, Overrides, Secrets, Settings, controller_config};
use fabricctl_core::{ConfigLoader, ProjectLayout};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output::Printer;

pub struct Context {
    pub settings: Settings,
    pub environment: Environment,
    pub loader: ConfigLoader,
    pub printer: Printer,
    pub assume_yes: bool,
    insecure: bool,
    timeout: Option<u64>,
}

impl Context {
    pub fn new(global: &GlobalOpts, settings: Settings) -> Result<Self, CliError> {
        let overrides = Overrides {
            project_root: global.project_root.clone(),
            env_file: global.env_file.clone(),
        };
        let environment = Environment::resolve(&overrides, &settings)?;
        debug!(root = %environment.project_root.display(), "project root resolved");

        let loader = ConfigLoader::new(ProjectLayout::new(environment.project_root.clone()));
        let printer = Printer::new(
            resolve_output(global.output, &settings),
            resolve_color(global.color, &settings),
            global.quiet,
        );
        Ok(Self {
            loader,
            printer,
            assume_yes: global.yes,
            insecure: global.insecure,
            timeout: global.timeout,
            settings,
            environment,
        })
    }

    fn secrets(&self) -> Result<Secrets, CliError> {
        Ok(self.environment.secrets()?)
    }

    /// Authenticated controller client.
    pub async fn client(&self) -> Result<NdfcClient, CliError> {
        let secrets = self.secrets()?;
        let mut config = controller_config(&self.settings, &secrets)?;
        if self.insecure {
            config.transport.tls = TlsMode::DangerAcceptInvalid;
        }
        if let Some(secs) = self.timeout {
            config.transport.timeout = Duration::from_secs(secs);
        }
        debug!(url = %config.base_url, "connecting to controller");
        Ok(NdfcClient::connect(&config.base_url, &config.credentials, &config.transport).await?)
    }

    /// Password used for switch discovery.
    pub fn switch_password(&self) -> Result<SecretString, CliError> {
        let secrets = self.secrets()?;
        Ok(secrets.switch_password()?.clone())
    }
}

/// Flag, then settings, then table.
fn resolve_output(flag: Option<OutputFormat>, settings: &Settings) -> OutputFormat {
    flag.unwrap_or_else(|| match settings.output.as_str() {
        "json" => OutputFormat::Json,
        "json-compact" => OutputFormat::JsonCompact,
        "yaml" => OutputFormat::Yaml,
        "plain" => OutputFormat::Plain,
        _ => OutputFormat::Table,
    })
}

fn resolve_color(flag: Option<ColorMode>, settings: &Settings) -> ColorMode {
    flag.unwrap_or_else(|| match settings.color.as_str() {
        "always" => ColorMode::Always,
        "never" => ColorMode::Never,
        _ => ColorMode::Auto,
    })
}
