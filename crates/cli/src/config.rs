//! Config file and plan input loading.

use std::io;
use std::path::{Path, PathBuf};

use tfplan_tui::ThemeConfig;
use thiserror::Error;
use tokio::io::AsyncReadExt;

/// Errors raised while gathering the CLI's inputs.
#[derive(Debug, Error)]
pub enum CliError {
    /// The config file exists but could not be read.
    #[error("could not read config '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The config file is not valid YAML for the expected layout.
    #[error("invalid config '{path}': {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    /// Reading the plan from standard input failed.
    #[error("could not read plan from stdin: {0}")]
    Stdin(#[source] io::Error),
    /// Reading the plan file failed.
    #[error(transparent)]
    Plan(#[from] tfplan_core::Error),
}

/// `<config dir>/tfplan/config.yaml`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tfplan").join("config.yaml"))
}

/// Load the theme settings.
///
/// An explicit path must exist. The default location is optional and its
/// absence yields the built-in defaults.
pub async fn load_theme_config(explicit: Option<&Path>) -> Result<ThemeConfig, CliError> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => match default_config_path() {
            Some(path) => (path, false),
            None => return Ok(ThemeConfig::default()),
        },
    };

    let text = match tokio::fs::read_to_string(&path).await {
        Ok(text) => text,
        Err(err) if !required && err.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(ThemeConfig::default());
        }
        Err(source) => return Err(CliError::ConfigRead { path, source }),
    };
    parse_theme_config(&text).map_err(|source| CliError::ConfigParse { path, source })
}

/// Parse config YAML. An empty document means all defaults.
pub fn parse_theme_config(text: &str) -> Result<ThemeConfig, serde_yaml::Error> {
    if text.trim().is_empty() {
        return Ok(ThemeConfig::default());
    }
    serde_yaml::from_str(text)
}

/// Read plan text from a file, or from stdin when no file or `-` is given.
pub async fn read_plan(file: Option<&Path>) -> Result<String, CliError> {
    match file {
        Some(path) if path != Path::new("-") => Ok(tfplan_core::read_plan_file(path)?),
        _ => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .map_err(CliError::Stdin)?;
            Ok(text)
        }
    }
}
