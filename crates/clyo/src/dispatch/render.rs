//! Operator-facing text for dispatch results.

use unicode_width::UnicodeWidthStr;

use crate::property::PropertyError;

use super::outcome::{DispatchResult, Outcome, TargetOutcome, TargetStatus};

/// Extra fill characters between the longest object name and its value.
const NAME_PADDING: usize = 3;

/// Renders `result` as the lines shown to the operator, without a trailing
/// newline.
///
/// Inquiries print the property label followed by one row per object, each
/// name padded with `-` to a common display width. Writes print one line per
/// object touched. Failures keep their position among the successes.
#[must_use]
pub fn render(result: &DispatchResult) -> String {
    let lines = match &result.outcome {
        Outcome::Stopped => vec![String::from("Stopping recording ...")],
        Outcome::EventTriggered { event } => vec![format!("{} event requested", capitalise(event))],
        Outcome::Unrecognized { line } if line.is_empty() => vec![String::from("Unknown command.")],
        Outcome::Unrecognized { line } => vec![format!("Unknown command: '{line}'")],
        Outcome::Inquired { label, .. } => inquiry(label, &result.targets),
        Outcome::BulkSet { label, .. } | Outcome::TargetedSet { label, .. } => result
            .targets
            .iter()
            .map(|target| assignment(label, target))
            .collect(),
    };
    lines.join("\n")
}

fn inquiry(label: &str, targets: &[TargetOutcome]) -> Vec<String> {
    let width = targets
        .iter()
        .map(|target| target.object.width())
        .max()
        .unwrap_or(0)
        + NAME_PADDING;

    let mut lines = Vec::with_capacity(targets.len() + 1);
    lines.push(label.to_owned());
    for target in targets {
        let name = padded(&target.object, width);
        let value = match &target.status {
            TargetStatus::Read { value } => value.clone(),
            TargetStatus::Updated(change) => change.new.clone(),
            TargetStatus::Failed(error) => format!("unavailable ({error})"),
        };
        lines.push(format!("{name}{value}"));
    }
    lines
}

fn assignment(label: &str, target: &TargetOutcome) -> String {
    match &target.status {
        TargetStatus::Updated(change) => {
            format!("New {label} for {}: {}", target.object, change.new)
        }
        TargetStatus::Read { value } => format!("{label} for {}: {value}", target.object),
        TargetStatus::Failed(PropertyError::Conversion(error)) => format!(
            "'{}' not a valid {} ({})",
            error.value, error.label, error.property
        ),
        TargetStatus::Failed(PropertyError::Assignment(error)) => error.to_string(),
        TargetStatus::Failed(error) => format!("{}: {error}", target.object),
    }
}

fn padded(name: &str, width: usize) -> String {
    let fill = width.saturating_sub(name.width());
    format!("{name}{}", "-".repeat(fill))
}

fn capitalise(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
