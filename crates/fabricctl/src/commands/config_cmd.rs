//! Config subcommand handlers.
//!
//! Settings are non-secret preferences only; controller credentials stay
//! in the env file.

use serde::Serialize;

use fabricctl_config::{
    Environment, Overrides, Settings, config_path, load_settings, save_settings,
};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;

use super::util;

/// Settings plus where the secrets would come from.
#[derive(Serialize)]
struct ResolvedView<'a> {
    settings_file: String,
    project_root: String,
    env_file: Option<String>,
    #[serde(flatten)]
    settings: &'a Settings,
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config_path();
    match args.command {
        ConfigCommand::Init => {
            if path.exists() {
                let prompt = format!("{} exists. Overwrite with defaults?", path.display());
                if !util::confirm("config init", &prompt, global.yes)? {
                    return Ok(());
                }
            }
            save_settings(&Settings::default(), &path)?;
            if !global.quiet {
                eprintln!("✓ settings written to {}", path.display());
            }
            Ok(())
        }

        ConfigCommand::Show => {
            let overrides = Overrides {
                project_root: global.project_root.clone(),
                env_file: global.env_file.clone(),
            };
            let settings = load_settings()?;
            let env = Environment::resolve(&overrides, &settings)?;
            let view = ResolvedView {
                settings_file: path.display().to_string(),
                project_root: env.project_root.display().to_string(),
                env_file: env.env.path().map(|p| p.display().to_string()),
                settings: &settings,
            };
            let out = match global.output {
                Some(OutputFormat::Json) => serde_json::to_string_pretty(&view).map_err(|e| CliError::Render(e.to_string()))?,
                Some(OutputFormat::JsonCompact) => serde_json::to_string(&view).map_err(|e| CliError::Render(e.to_string()))?,
                Some(OutputFormat::Yaml) => serde_yaml::to_string(&view).map_err(|e| CliError::Render(e.to_string()))?,
                _ => toml::to_string_pretty(&view).map_err(|e| CliError::Render(e.to_string()))?,
            };
            if !global.quiet {
                println!("{}", out.trim_end());
            }
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}
