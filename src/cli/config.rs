//! TOML configuration file support.
//!
//! Settings that would otherwise need several flags can live in a file:
//!
//! ```toml
//! # exiftags.toml
//! [command]
//! program = "/usr/local/bin/exiftool"
//! args = ["-listx", "-lang", "de"]
//!
//! [server]
//! bind = "0.0.0.0:8080"
//! channel_capacity = 32
//!
//! [conversion]
//! log_progress_every = 50
//! ```
//!
//! Command-line flags take precedence over the file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;

use exiftags::listx::ConversionConfig;
use exiftags::source::ListxCommand;

use super::CommandArgs;

/// Root configuration structure for exiftags.toml files.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Command producing the -listx XML.
    #[serde(default)]
    pub command: Option<ListxCommand>,

    /// HTTP endpoint settings.
    #[serde(default)]
    pub server: ServerSection,

    /// Converter settings.
    #[serde(default)]
    pub conversion: ConversionSection,
}

/// Configuration for the serve command.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// Listen address.
    pub bind: Option<SocketAddr>,

    /// Body chunks buffered per response.
    pub channel_capacity: Option<usize>,
}

/// Configuration for the converter.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConversionSection {
    /// Log progress every N tables (0 disables).
    pub log_progress_every: Option<usize>,
}

impl Config {
    /// Load configuration from a TOML file, or defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Resolve the -listx command: flags, then file, then `exiftool -listx`.
    pub fn listx_command(&self, overrides: &CommandArgs) -> ListxCommand {
        let mut command = self.command.clone().unwrap_or_default();
        if let Some(program) = &overrides.program {
            command.program = program.clone();
        }
        if !overrides.args.is_empty() {
            command.args = overrides.args.clone();
        }
        command
    }

    /// Converter settings with file values applied.
    pub fn conversion_config(&self) -> ConversionConfig {
        let mut config = ConversionConfig::default();
        if let Some(interval) = self.conversion.log_progress_every {
            config.progress_interval = interval;
        }
        config
    }

    /// Server settings: flags, then file, then defaults.
    #[cfg(feature = "server")]
    pub fn server_config(
        &self,
        bind: Option<SocketAddr>,
        overrides: &CommandArgs,
    ) -> exiftags::server::ServerConfig {
        let mut config = exiftags::server::ServerConfig {
            command: self.listx_command(overrides),
            ..Default::default()
        };
        if let Some(bind) = bind.or(self.server.bind) {
            config.bind = bind;
        }
        if let Some(capacity) = self.server.channel_capacity {
            config.channel_capacity = capacity;
        }
        config
    }
}
