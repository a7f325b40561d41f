use std::path::Path;

use anyhow::{Context, Result};
use logpipe_core::{InputFormat, RenderConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LogpipeConfig {
    pub input: InputFormat,
    pub output: RenderConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogStyle,
    pub output: LogOutput,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogStyle::Pretty,
            output: LogOutput::Stderr,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogStyle {
    Json,
    #[default]
    Pretty,
}

/// Where diagnostics go. Never stdout: that carries the rendered records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stderr,
    File { path: String },
}

impl LogpipeConfig {
    /// Load configuration: defaults, then the optional system and local
    /// files, then `explicit` (which must exist), then `LOGPIPE__*`
    /// environment variables.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let defaults = config::Config::try_from(&LogpipeConfig::default())
            .context("Failed to serialize default configuration")?;

        let mut builder = config::Config::builder().add_source(defaults);

        // 1. /etc/logpipe/logpipe.{toml,yaml,json,...}
        // 2. config/logpipe.* relative to the working directory
        for path in ["/etc/logpipe/logpipe", "config/logpipe"] {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        if let Some(path) = explicit {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        // Double underscore for nesting: LOGPIPE__OUTPUT__COLOR=true
        builder = builder.add_source(
            config::Environment::with_prefix("LOGPIPE")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("output.fields")
                .try_parsing(true),
        );

        builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    pub fn validate(&self) -> Result<()> {
        if self.logging.level.trim().is_empty() {
            anyhow::bail!("logging.level must not be empty");
        }
        Ok(())
    }
}
