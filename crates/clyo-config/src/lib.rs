//! Shared configuration for the clyo command console.
//!
//! Configuration is layered by [`ortho_config`]: built-in defaults, an optional
//! configuration file, `CLYO_*` environment variables and finally command-line
//! flags, with later layers taking precedence. The console itself only reads
//! the resolved [`Config`]; the host process decides where the layers come
//! from.

mod defaults;
mod logging;
mod separator;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_LOG_FILTER, default_command_separator, default_log_filter, default_log_filter_string,
    default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};
pub use separator::{CommandSeparator, CommandSeparatorParseError};

/// Resolved configuration for the console and its host binary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "CLYO")]
pub struct Config {
    /// Tracing filter expression (`EnvFilter` syntax).
    #[serde(default = "default_log_filter_string")]
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format for log records.
    #[serde(default = "default_log_format")]
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Separator between a property token and an object name in targeted
    /// commands.
    #[serde(default = "default_command_separator")]
    #[ortho_config(default = default_command_separator())]
    pub command_separator: CommandSeparator,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            command_separator: default_command_separator(),
        }
    }
}

impl Config {
    /// Returns the tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Returns the configured log format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Returns the separator used to build targeted commands.
    #[must_use]
    pub const fn command_separator(&self) -> CommandSeparator {
        self.command_separator
    }
}
