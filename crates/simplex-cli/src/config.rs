use std::fs;
use std::path::Path;
use std::str::FromStr;

use clap::ValueEnum;
use serde::Deserialize;
use simplex_solver::DEFAULT_MAX_ITERATIONS;
use tracing::Level;

use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

/// Defaults read from a YAML file passed with `--config`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Pivot budget per solve
    pub max_iterations: Option<usize>,
    /// Enable phase 1 for `>=`, `=` and negative right-hand sides
    pub two_phase: Option<bool>,
    /// Default output format
    pub format: Option<OutputFormat>,
    /// Default log level (error, warn, info, debug, trace)
    pub verbosity: Option<String>,
}

impl CliConfig {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let contents = fs::read_to_string(path).map_err(|e| CliError::Io(path.display().to_string(), e))?;
        Self::from_yaml(&contents).map_err(|e| CliError::Config(path.display().to_string(), e))
    }

    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file deserializes to unit, not a mapping
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents)
    }

    /// Log level from `-q`/`-v` flags, falling back to the file and then `warn`
    pub fn log_level(&self, quiet: bool, verbose: u8) -> Level {
        if quiet {
            return Level::ERROR;
        }
        match verbose {
            0 => self
                .verbosity
                .as_deref()
                .and_then(|v| Level::from_str(v).ok())
                .unwrap_or(Level::WARN),
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    pub fn max_iterations(&self, flag: Option<usize>) -> usize {
        flag.or(self.max_iterations).unwrap_or(DEFAULT_MAX_ITERATIONS)
    }

    pub fn two_phase(&self, flag: bool) -> bool {
        flag || self.two_phase.unwrap_or(false)
    }

    pub fn format(&self, flag: Option<OutputFormat>) -> OutputFormat {
        flag.or(self.format).unwrap_or_default()
    }
}
