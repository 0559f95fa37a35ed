//! Configuration file handling

use miette::{IntoDiagnostic, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use sqlscan_core::{ExtractOptions, SqlDialect};

use crate::args::InputArgs;

const CONFIG_FILE_NAME: &str = "sqlscan.toml";

/// Configuration for sqlscan
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// SQL dialect (mysql, postgresql, generic)
    #[serde(default)]
    pub dialect: Option<String>,

    /// Treat bind placeholders as comparison values
    #[serde(default)]
    pub allow_placeholders: bool,

    /// Pretty-print JSON output
    #[serde(default)]
    pub pretty: bool,

    /// Include the parser AST in JSON output
    #[serde(default)]
    pub include_tree: Option<bool>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).into_diagnostic()?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).into_diagnostic()
    }

    /// Load the given file, or the nearest sqlscan.toml, or defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::find_and_load()?.unwrap_or_default()),
        }
    }

    /// Try to find and load sqlscan.toml in current directory or parent directories
    pub fn find_and_load() -> Result<Option<Self>> {
        let mut current_dir = std::env::current_dir().into_diagnostic()?;

        loop {
            let config_path = current_dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                tracing::debug!(path = %config_path.display(), "loading config");
                return Ok(Some(Self::from_file(&config_path)?));
            }

            // Try parent directory
            if !current_dir.pop() {
                break;
            }
        }

        Ok(None)
    }

    /// Merge CLI arguments into configuration
    /// CLI arguments take precedence over config file values
    pub fn merge_with_args(mut self, input: &InputArgs, pretty: bool, no_tree: bool) -> Self {
        if input.dialect.is_some() {
            self.dialect = input.dialect.clone();
        }

        if input.allow_placeholders {
            self.allow_placeholders = true;
        }

        if pretty {
            self.pretty = true;
        }

        if no_tree {
            self.include_tree = Some(false);
        }

        self
    }

    /// Build extraction options from the merged configuration
    pub fn extract_options(&self) -> Result<ExtractOptions> {
        let dialect = match &self.dialect {
            Some(name) => name.parse::<SqlDialect>().map_err(|e| miette::miette!(e))?,
            None => SqlDialect::default(),
        };
        Ok(ExtractOptions {
            dialect,
            allow_placeholders: self.allow_placeholders,
            include_tree: self.include_tree.unwrap_or(true),
        })
    }
}
