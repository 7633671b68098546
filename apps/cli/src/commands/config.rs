//! `stockbook config ...`

use clap::Subcommand;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

use super::to_output;
use crate::config::AppConfig;
use crate::error::{CliError, CliResult};

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration (password masked)
    Show,

    /// Write a config file with the default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Effective<'a> {
    config_file: Option<&'a Path>,
    data_dir: PathBuf,
    #[serde(flatten)]
    settings: AppConfig,
}

/// `config_path` is the `--config` flag, if given.
pub fn run(action: ConfigAction, config: &AppConfig, config_path: Option<PathBuf>) -> CliResult<Value> {
    let path = config_path.or_else(AppConfig::default_config_path);

    match action {
        ConfigAction::Show => to_output(&Effective {
            config_file: path.as_deref().filter(|p| p.exists()),
            data_dir: config.data_dir()?,
            settings: config.redacted(),
        }),

        ConfigAction::Init { force } => {
            let path = path.ok_or_else(|| CliError::config("No config path available"))?;
            if path.exists() && !force {
                return Err(CliError::config(format!(
                    "{} already exists; pass --force to overwrite",
                    path.display()
                )));
            }

            let written = AppConfig::default().save(Some(path))?;
            to_output(&serde_json::json!({ "written": written }))
        }
    }
}
