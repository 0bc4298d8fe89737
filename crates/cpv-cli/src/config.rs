//! # CLI Configuration
//!
//! Sources, lowest to highest precedence:
//!
//! 1. Built-in defaults ([`CliConfig::default`]).
//! 2. A YAML file passed with `--config`.
//! 3. Environment variables:
//!    - `CPV_CHAIN_TAG` (default: `btc`)
//!    - `CPV_EXPLORER` (preset name or template with `{txid}`; default: none)
//!    - `CPV_DOT_PROGRAM` (default: `dot`)
//! 4. Explicit command-line flags, applied by the caller.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use cpv_graph::{OutputFormat, DEFAULT_DOT_PROGRAM};
use cpv_replay::{ExplorerTemplate, DEFAULT_CHAIN_TAG};

pub const ENV_CHAIN_TAG: &str = "CPV_CHAIN_TAG";
pub const ENV_EXPLORER: &str = "CPV_EXPLORER";
pub const ENV_DOT_PROGRAM: &str = "CPV_DOT_PROGRAM";

/// Settings shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Anchor type whose marker produces the `Merkle Root` entry.
    pub chain_tag: String,
    /// Link template for the TXID, if any.
    pub explorer: Option<ExplorerTemplate>,
    /// Graphviz executable.
    pub dot_program: PathBuf,
    /// Default output format for `cpv render`.
    pub format: OutputFormat,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            chain_tag: DEFAULT_CHAIN_TAG.to_string(),
            explorer: None,
            dot_program: PathBuf::from(DEFAULT_DOT_PROGRAM),
            format: OutputFormat::default(),
        }
    }
}

impl CliConfig {
    /// Defaults, then `path` if given, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(p) => Self::from_yaml_file(p)?,
            None => Self::default(),
        };
        base.apply_env()
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_yaml_str(&text).map_err(|e| match e {
            ConfigError::Parse { reason, .. } => ConfigError::Parse {
                source_name: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Parse YAML text. An empty document yields the defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(text).map_err(|e| ConfigError::Parse {
            source_name: "<yaml>".to_string(),
            reason: e.to_string(),
        })?;
        config.validated()
    }

    /// Overlay `CPV_*` variables from the process environment.
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_env_with(|var| std::env::var(var).ok())
    }

    /// Overlay `CPV_*` variables read through `lookup`.
    pub fn apply_env_with<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(tag) = lookup(ENV_CHAIN_TAG) {
            self.chain_tag = tag;
        }
        if let Some(raw) = lookup(ENV_EXPLORER) {
            let template = raw
                .parse::<ExplorerTemplate>()
                .map_err(|e| ConfigError::InvalidEnv {
                    var: ENV_EXPLORER,
                    reason: e.to_string(),
                })?;
            self.explorer = Some(template);
        }
        if let Some(program) = lookup(ENV_DOT_PROGRAM) {
            self.dot_program = PathBuf::from(program);
        }
        self.validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.chain_tag.trim().is_empty() {
            return Err(ConfigError::EmptyChainTag);
        }
        Ok(self)
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {reason}")]
    Read { path: PathBuf, reason: String },
    #[error("invalid config in {source_name}: {reason}")]
    Parse { source_name: String, reason: String },
    #[error("invalid value for {var}: {reason}")]
    InvalidEnv { var: &'static str, reason: String },
    #[error("chain_tag must not be empty")]
    EmptyChainTag,
}
