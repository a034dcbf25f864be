use crate::logging::LogFormat;
use crate::separator::CommandSeparator;

/// Default log filter expression used by the binaries.
///
/// Interactive sessions keep the filter at `warn` so informational records do
/// not crowd the operator prompt.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Default log filter expression used by the binaries.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binaries.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Default separator between property tokens and object names.
#[must_use]
pub const fn default_command_separator() -> CommandSeparator {
    CommandSeparator::Hyphen
}
