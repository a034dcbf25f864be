//! Line classification and routing.
//!
//! A line is tried against the command shapes in a fixed precedence order:
//!
//! 1. stop tokens,
//! 2. event tokens (exact match only, never with a trailing value),
//! 3. property tokens in supplied order, each tried as inquire (`dt`), bulk
//!    set (`dt 5`) and targeted set (`dt-P 5`) before moving to the next
//!    token,
//! 4. anything else is unrecognised.
//!
//! The first property token matching any of its three forms wins. Tokens
//! that are prefixes of another token's targeted form are not special-cased.

use tracing::{debug, info, warn};

use crate::property::{ManagedObjects, PropertyAccessor};
use crate::signal::EventSignal;
use crate::table::CommandTable;

use super::outcome::{DispatchResult, Outcome, TargetOutcome, TargetStatus};

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// A classified input line, borrowing from the line and the command table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// A stop token.
    Stop,
    /// An event token.
    Event {
        /// Event identifier.
        event: &'a str,
    },
    /// A bare property token.
    Inquire {
        /// Property identifier.
        property: &'a str,
    },
    /// A property token followed by a value.
    BulkSet {
        /// Property identifier.
        property: &'a str,
        /// Value text after the separating space.
        value: &'a str,
    },
    /// A property token joined to an object name, followed by a value.
    TargetedSet {
        /// Property identifier.
        property: &'a str,
        /// Object name.
        object: &'a str,
        /// Value text after the separating space.
        value: &'a str,
    },
    /// No command shape matched.
    Unrecognized {
        /// The trimmed line.
        line: &'a str,
    },
}

impl Command<'_> {
    /// Returns a short name for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Stop => "stop",
            Self::Event { .. } => "event",
            Self::Inquire { .. } => "inquire",
            Self::BulkSet { .. } => "bulk_set",
            Self::TargetedSet { .. } => "targeted_set",
            Self::Unrecognized { .. } => "unrecognized",
        }
    }
}

/// Classifies operator lines and applies them to the managed objects.
///
/// Dispatch is synchronous: one line is fully classified and applied before
/// the call returns. A failure on one object never prevents the remaining
/// objects from being read or updated, and nothing is rolled back.
#[derive(Debug)]
pub struct Dispatcher {
    table: CommandTable,
    accessor: PropertyAccessor,
}

impl Dispatcher {
    /// Creates a dispatcher over `objects` using `table`.
    #[must_use]
    pub fn new(table: CommandTable, objects: ManagedObjects) -> Self {
        let accessor = PropertyAccessor::new(objects, &table);
        Self { table, accessor }
    }

    /// Returns the command table.
    #[must_use]
    pub const fn table(&self) -> &CommandTable {
        &self.table
    }

    /// Returns the property accessor.
    #[must_use]
    pub const fn accessor(&self) -> &PropertyAccessor {
        &self.accessor
    }

    /// Returns `true` once the stop signal is set, by this dispatcher or by
    /// another thread holding the same signal.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.table.stop_signal().is_set()
    }

    /// Classifies `line` without side effects.
    #[must_use]
    pub fn classify<'a>(&'a self, line: &'a str) -> Command<'a> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Command::Unrecognized { line: trimmed };
        }
        if self.table.is_stop_token(trimmed) {
            return Command::Stop;
        }
        if let Some(event) = self.table.lookup_event(trimmed) {
            return Command::Event { event };
        }
        self.classify_property(trimmed)
            .unwrap_or(Command::Unrecognized { line: trimmed })
    }

    /// Classifies and executes `line`.
    #[must_use = "the result reports per-object failures"]
    pub fn dispatch(&self, line: &str) -> DispatchResult {
        let command = self.classify(line);
        debug!(
            target: DISPATCH_TARGET,
            line = line.trim(),
            kind = command.kind(),
            "classified command"
        );

        let result = match command {
            Command::Stop => self.stop(),
            Command::Event { event } => self.trigger(event),
            Command::Inquire { property } => self.inquire(property),
            Command::BulkSet { property, value } => self.bulk_set(property, value),
            Command::TargetedSet {
                property,
                object,
                value,
            } => self.targeted_set(property, object, value),
            Command::Unrecognized { line } => DispatchResult::new(Outcome::Unrecognized {
                line: line.to_owned(),
            }),
        };

        for target in &result.targets {
            if let Some(error) = target.error() {
                warn!(
                    target: DISPATCH_TARGET,
                    object = %target.object,
                    %error,
                    "property operation failed"
                );
            }
        }
        result
    }

    fn classify_property<'a>(&'a self, line: &'a str) -> Option<Command<'a>> {
        let separator = self.table.separator();
        for entry in self.table.property_tokens() {
            let property = entry.identifier();
            if line == entry.token() {
                return Some(Command::Inquire { property });
            }
            let Some(after_token) = line.strip_prefix(entry.token()) else {
                continue;
            };
            if let Some(value) = after_token.strip_prefix(' ') {
                return Some(Command::BulkSet { property, value });
            }
            for object in self.accessor.objects().names() {
                let prefix = separator.join(entry.token(), object);
                if let Some(value) = line
                    .strip_prefix(prefix.as_str())
                    .and_then(|tail| tail.strip_prefix(' '))
                {
                    return Some(Command::TargetedSet {
                        property,
                        object,
                        value,
                    });
                }
            }
        }
        None
    }

    fn stop(&self) -> DispatchResult {
        info!(
            target: DISPATCH_TARGET,
            objects = self.accessor.objects().len(),
            "stopping"
        );
        for object in self.accessor.objects().iter() {
            if object.stop() {
                debug!(target: DISPATCH_TARGET, object = object.name(), "stop hook ran");
            }
        }
        self.table.stop_signal().set();
        DispatchResult::new(Outcome::Stopped)
    }

    fn trigger(&self, event: &str) -> DispatchResult {
        if let Some(signal) = self.table.event_signal(event) {
            signal.set();
        }
        info!(target: DISPATCH_TARGET, event, "event requested");
        DispatchResult::new(Outcome::EventTriggered {
            event: event.to_owned(),
        })
    }

    fn inquire(&self, property: &str) -> DispatchResult {
        let targets = self
            .accessor
            .objects()
            .names()
            .map(|object| {
                let status = match self.accessor.get(object, property) {
                    Ok(value) => TargetStatus::Read { value },
                    Err(error) => TargetStatus::Failed(error.into()),
                };
                TargetOutcome::new(object, status)
            })
            .collect();
        DispatchResult::with_targets(
            Outcome::Inquired {
                property: property.to_owned(),
                label: self.accessor.label(property).to_owned(),
            },
            targets,
        )
    }

    fn bulk_set(&self, property: &str, value: &str) -> DispatchResult {
        let targets = self
            .accessor
            .objects()
            .names()
            .map(|object| self.apply(object, property, value))
            .collect();
        DispatchResult::with_targets(
            Outcome::BulkSet {
                property: property.to_owned(),
                label: self.accessor.label(property).to_owned(),
                value: value.to_owned(),
            },
            targets,
        )
    }

    fn targeted_set(&self, property: &str, object: &str, value: &str) -> DispatchResult {
        DispatchResult::with_targets(
            Outcome::TargetedSet {
                property: property.to_owned(),
                label: self.accessor.label(property).to_owned(),
                object: object.to_owned(),
                value: value.to_owned(),
            },
            vec![self.apply(object, property, value)],
        )
    }

    fn apply(&self, object: &str, property: &str, value: &str) -> TargetOutcome {
        let status = match self.accessor.set(object, property, value) {
            Ok(change) => {
                debug!(
                    target: DISPATCH_TARGET,
                    object,
                    property,
                    old = %change.old,
                    new = %change.new,
                    "property updated"
                );
                TargetStatus::Updated(change)
            }
            Err(error) => TargetStatus::Failed(error),
        };
        TargetOutcome::new(object, status)
    }
}
