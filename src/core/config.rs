use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming a config file when `--config` is not given
pub const CONFIG_ENV: &str = "COSTFOLD_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
}

/// Defaults for `costfold output`; command-line flags take precedence
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// table, json, html or diff
    pub format: String,
    /// Table columns; `None` means the built-in defaults
    pub fields: Option<Vec<String>>,
    pub show_skipped: bool,
    pub no_color: bool,
    /// Metadata key used to group inputs
    pub group_key: String,
    /// Heading shown for the grouping column
    pub group_label: String,
    /// past or first-group
    pub diff_baseline: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "table".to_string(),
            fields: None,
            show_skipped: false,
            no_color: false,
            group_key: "filename".to_string(),
            group_label: "File".to_string(),
            diff_baseline: "past".to_string(),
        }
    }
}

pub fn default_config() -> Config {
    Config::default()
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, crate::CostfoldError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| crate::CostfoldError::Config(format!("Failed to parse config: {}", e)))?;
    Ok(config)
}

/// Resolve the config file: explicit path first, then `COSTFOLD_CONFIG`.
/// Without either the built-in defaults are used.
pub fn resolve_config(explicit: Option<&Path>) -> Result<Config, crate::CostfoldError> {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

    match path {
        Some(p) => {
            tracing::debug!("Loading config from {}", p.display());
            load_config(&p)
        }
        None => Ok(default_config()),
    }
}
