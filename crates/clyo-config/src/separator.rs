//! Separator placed between a property token and an object name.
//!
//! Targeted commands take the form `<token><separator><object> <value>`, for
//! example `dt-P 5` with [`CommandSeparator::Hyphen`] or `dtP 5` with
//! [`CommandSeparator::Empty`]. The convention is chosen once for the whole
//! command table.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Joining convention for targeted property commands.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Deserialize,
    Serialize,
    PartialEq,
    Eq,
    Hash,
    EnumString,
    Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CommandSeparator {
    /// Join with a hyphen (`dt-P`).
    #[default]
    Hyphen,
    /// Concatenate the token and the object name (`dtP`).
    #[serde(rename = "none")]
    #[strum(serialize = "none")]
    Empty,
}

impl CommandSeparator {
    /// Returns the literal text inserted between token and object name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hyphen => "-",
            Self::Empty => "",
        }
    }

    /// Builds the targeted command prefix for `token` and `object`.
    #[must_use]
    pub fn join(self, token: &str, object: &str) -> String {
        format!("{token}{}{object}", self.as_str())
    }
}

/// Errors encountered while parsing a [`CommandSeparator`] from text.
pub type CommandSeparatorParseError = strum::ParseError;

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::hyphen("hyphen", CommandSeparator::Hyphen)]
    #[case::upper("HYPHEN", CommandSeparator::Hyphen)]
    #[case::none("none", CommandSeparator::Empty)]
    #[case::mixed("None", CommandSeparator::Empty)]
    fn parses_case_insensitively(#[case] input: &str, #[case] expected: CommandSeparator) {
        assert_eq!(
            CommandSeparator::from_str(input).expect("parse separator"),
            expected
        );
    }

    #[test]
    fn rejects_unknown_separator() {
        assert!(CommandSeparator::from_str("slash").is_err());
    }

    #[rstest]
    #[case::hyphen(CommandSeparator::Hyphen, "dt-P")]
    #[case::none(CommandSeparator::Empty, "dtP")]
    fn joins_token_and_object(#[case] separator: CommandSeparator, #[case] expected: &str) {
        assert_eq!(separator.join("dt", "P"), expected);
    }
}
