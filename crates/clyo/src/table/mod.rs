//! Command table mapping operator tokens to properties and events.
//!
//! The table is built once from host-supplied specs and is read-only
//! afterwards. Every token resolves to exactly one identifier: collisions
//! between property, event and stop tokens are rejected during construction,
//! so the dispatcher never has to arbitrate between two meanings of the same
//! word.
//!
//! Property tokens are additionally kept in the order they were supplied.
//! The dispatcher scans them in that order and the first token whose inquire,
//! bulk or targeted form matches wins.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;

use clyo_config::CommandSeparator;
use tracing::info;

use crate::errors::ConstructionError;
use crate::signal::{EventSignal, Signal};

/// Tracing target for command table construction.
pub(crate) const TABLE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::table");

/// Identifier given to the stop event when the host does not declare one.
pub const DEFAULT_STOP_IDENTIFIER: &str = "stop";

/// Tokens bound to the stop event when the host does not declare one.
pub const DEFAULT_STOP_TOKENS: [&str; 3] = ["q", "Q", "quit"];

/// Declares a tunable property and the tokens that address it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySpec {
    identifier: String,
    label: String,
    tokens: Vec<String>,
}

impl PropertySpec {
    /// Creates a property spec.
    ///
    /// `label` is the human-readable description used when printing values,
    /// for example `Δt (s)` for a sampling interval.
    pub fn new<I, T>(identifier: impl Into<String>, label: impl Into<String>, tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            identifier: identifier.into(),
            label: label.into(),
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the canonical property identifier.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the command tokens in supplied order.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    fn describe(&self, index: usize) -> String {
        if self.identifier.trim().is_empty() {
            format!("property spec #{}", index + 1)
        } else {
            format!("property '{}'", self.identifier)
        }
    }
}

/// Declares a triggerable event, its tokens and the signal it sets.
#[derive(Clone)]
pub struct EventSpec {
    identifier: String,
    tokens: Vec<String>,
    signal: Arc<dyn EventSignal>,
    stop: bool,
}

impl EventSpec {
    /// Creates an event spec bound to `signal`.
    ///
    /// An event named [`DEFAULT_STOP_IDENTIFIER`] is treated as the stop
    /// event, exactly as if it had been built with [`Self::stop`].
    pub fn new<I, T, S>(identifier: impl Into<String>, tokens: I, signal: S) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
        S: EventSignal + 'static,
    {
        Self {
            identifier: identifier.into(),
            tokens: tokens.into_iter().map(Into::into).collect(),
            signal: Arc::new(signal),
            stop: false,
        }
    }

    /// Creates the stop event spec.
    ///
    /// Dispatching one of its tokens runs every object's stop hook, sets
    /// `signal` and ends the interactive loop.
    pub fn stop<I, T, S>(tokens: I, signal: S) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
        S: EventSignal + 'static,
    {
        Self {
            stop: true,
            ..Self::new(DEFAULT_STOP_IDENTIFIER, tokens, signal)
        }
    }

    /// Returns the event identifier.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Returns the command tokens in supplied order.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Returns `true` for the stop event spec.
    #[must_use]
    pub fn is_stop(&self) -> bool {
        self.stop || self.identifier == DEFAULT_STOP_IDENTIFIER
    }

    fn describe(&self, index: usize) -> String {
        if self.identifier.trim().is_empty() {
            format!("event spec #{}", index + 1)
        } else {
            format!("event '{}'", self.identifier)
        }
    }
}

impl fmt::Debug for EventSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSpec")
            .field("identifier", &self.identifier)
            .field("tokens", &self.tokens)
            .field("stop", &self.stop)
            .field("signal_set", &self.signal.is_set())
            .finish()
    }
}

/// What a command token resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// A property inquire/set token.
    Property,
    /// An event trigger token.
    Event,
    /// A stop token.
    Stop,
}

#[derive(Debug, Clone)]
struct CommandEntry {
    kind: CommandKind,
    identifier: String,
}

/// A property token paired with the identifier it addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyToken {
    token: String,
    identifier: String,
}

impl PropertyToken {
    /// Returns the command token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the property identifier.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

struct StopEvent {
    identifier: String,
    tokens: Vec<String>,
    signal: Arc<dyn EventSignal>,
}

/// Read-only lookup structure built from property and event specs.
pub struct CommandTable {
    entries: HashMap<String, CommandEntry>,
    properties: Vec<PropertySpec>,
    property_tokens: Vec<PropertyToken>,
    events: HashMap<String, Arc<dyn EventSignal>>,
    stop: StopEvent,
    separator: CommandSeparator,
}

impl CommandTable {
    /// Builds the table, validating every spec.
    ///
    /// Tokens are checked for collisions in a fixed order: property specs as
    /// supplied, then event specs as supplied, then the default stop tokens
    /// when no stop spec was given. The first collision is reported.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructionError`] when a spec is incomplete, a token or
    /// identifier is repeated, or more than one stop spec is supplied.
    pub fn build(
        properties: Vec<PropertySpec>,
        events: Vec<EventSpec>,
        separator: CommandSeparator,
    ) -> Result<Self, ConstructionError> {
        let mut entries = HashMap::new();
        let mut property_tokens = Vec::new();

        for (index, spec) in properties.iter().enumerate() {
            validate_property(index, spec)?;
            if properties
                .iter()
                .take(index)
                .any(|earlier| earlier.identifier == spec.identifier)
            {
                return Err(ConstructionError::duplicate_identifier(&spec.identifier));
            }
            for token in &spec.tokens {
                claim(&mut entries, token, CommandKind::Property, &spec.identifier)?;
                property_tokens.push(PropertyToken {
                    token: token.clone(),
                    identifier: spec.identifier.clone(),
                });
            }
        }

        let mut signals: HashMap<String, Arc<dyn EventSignal>> = HashMap::new();
        let mut supplied_stop: Option<StopEvent> = None;
        for (index, spec) in events.into_iter().enumerate() {
            validate_event(index, &spec)?;
            let is_stop = spec.is_stop();
            let duplicate = signals.contains_key(&spec.identifier)
                || supplied_stop
                    .as_ref()
                    .is_some_and(|existing| existing.identifier == spec.identifier);
            if is_stop {
                if let Some(existing) = &supplied_stop {
                    return Err(ConstructionError::MultipleStopEvents {
                        first: existing.identifier.clone(),
                        second: spec.identifier,
                    });
                }
            }
            if duplicate {
                return Err(ConstructionError::duplicate_identifier(spec.identifier));
            }

            let kind = if is_stop {
                CommandKind::Stop
            } else {
                CommandKind::Event
            };
            for token in &spec.tokens {
                claim(&mut entries, token, kind, &spec.identifier)?;
            }

            if is_stop {
                supplied_stop = Some(StopEvent {
                    identifier: spec.identifier,
                    tokens: spec.tokens,
                    signal: spec.signal,
                });
            } else {
                signals.insert(spec.identifier, spec.signal);
            }
        }

        let stop = supplied_stop.map_or_else(|| default_stop_event(&mut entries), Ok)?;

        Ok(Self {
            entries,
            properties,
            property_tokens,
            events: signals,
            stop,
            separator,
        })
    }

    /// Resolves a property token to its identifier.
    #[must_use]
    pub fn lookup_property(&self, token: &str) -> Option<&str> {
        self.lookup(token, CommandKind::Property)
    }

    /// Resolves an event token to its identifier.
    ///
    /// Stop tokens are not events; use [`Self::is_stop_token`].
    #[must_use]
    pub fn lookup_event(&self, token: &str) -> Option<&str> {
        self.lookup(token, CommandKind::Event)
    }

    /// Returns `true` when `token` is one of the stop tokens.
    #[must_use]
    pub fn is_stop_token(&self, token: &str) -> bool {
        self.lookup(token, CommandKind::Stop).is_some()
    }

    /// Returns every property token in supplied order.
    #[must_use]
    pub fn property_tokens(&self) -> &[PropertyToken] {
        &self.property_tokens
    }

    /// Returns the property specs in supplied order.
    #[must_use]
    pub fn properties(&self) -> &[PropertySpec] {
        &self.properties
    }

    /// Returns the display label for a property identifier.
    #[must_use]
    pub fn property_label(&self, identifier: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|spec| spec.identifier == identifier)
            .map(PropertySpec::label)
    }

    /// Returns the signal bound to an event identifier.
    #[must_use]
    pub fn event_signal(&self, identifier: &str) -> Option<&Arc<dyn EventSignal>> {
        self.events.get(identifier)
    }

    /// Returns the stop event identifier.
    #[must_use]
    pub fn stop_identifier(&self) -> &str {
        &self.stop.identifier
    }

    /// Returns the stop tokens in supplied order.
    #[must_use]
    pub fn stop_tokens(&self) -> &[String] {
        &self.stop.tokens
    }

    /// Returns the stop signal.
    #[must_use]
    pub fn stop_signal(&self) -> &Arc<dyn EventSignal> {
        &self.stop.signal
    }

    /// Returns the targeted-command separator convention.
    #[must_use]
    pub const fn separator(&self) -> CommandSeparator {
        self.separator
    }

    fn lookup(&self, token: &str, kind: CommandKind) -> Option<&str> {
        self.entries
            .get(token)
            .filter(|entry| entry.kind == kind)
            .map(|entry| entry.identifier.as_str())
    }
}

impl fmt::Debug for CommandTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandTable")
            .field("property_tokens", &self.property_tokens)
            .field("events", &self.events.keys().collect::<Vec<_>>())
            .field("stop_tokens", &self.stop.tokens)
            .field("separator", &self.separator)
            .finish_non_exhaustive()
    }
}

fn validate_property(index: usize, spec: &PropertySpec) -> Result<(), ConstructionError> {
    if spec.identifier.trim().is_empty() {
        return Err(ConstructionError::missing_field(
            spec.describe(index),
            "identifier",
        ));
    }
    if spec.label.trim().is_empty() {
        return Err(ConstructionError::missing_field(spec.describe(index), "label"));
    }
    validate_tokens(&spec.describe(index), &spec.tokens)
}

fn validate_event(index: usize, spec: &EventSpec) -> Result<(), ConstructionError> {
    if spec.identifier.trim().is_empty() {
        return Err(ConstructionError::missing_field(
            spec.describe(index),
            "identifier",
        ));
    }
    validate_tokens(&spec.describe(index), &spec.tokens)
}

fn validate_tokens(description: &str, tokens: &[String]) -> Result<(), ConstructionError> {
    if tokens.is_empty() {
        return Err(ConstructionError::missing_field(description, "commands"));
    }
    if tokens.iter().any(|token| token.trim().is_empty()) {
        return Err(ConstructionError::blank_token(description));
    }
    Ok(())
}

fn claim(
    entries: &mut HashMap<String, CommandEntry>,
    token: &str,
    kind: CommandKind,
    identifier: &str,
) -> Result<(), ConstructionError> {
    match entries.entry(token.to_owned()) {
        Entry::Occupied(_) => Err(ConstructionError::duplicate_token(token)),
        Entry::Vacant(slot) => {
            slot.insert(CommandEntry {
                kind,
                identifier: identifier.to_owned(),
            });
            Ok(())
        }
    }
}

fn default_stop_event(
    entries: &mut HashMap<String, CommandEntry>,
) -> Result<StopEvent, ConstructionError> {
    info!(
        target: TABLE_TARGET,
        tokens = ?DEFAULT_STOP_TOKENS,
        "stop event not supplied; creating one internally"
    );
    for token in DEFAULT_STOP_TOKENS {
        claim(entries, token, CommandKind::Stop, DEFAULT_STOP_IDENTIFIER)?;
    }
    Ok(StopEvent {
        identifier: DEFAULT_STOP_IDENTIFIER.to_owned(),
        tokens: DEFAULT_STOP_TOKENS.iter().map(|token| (*token).to_owned()).collect(),
        signal: Arc::new(Signal::new()),
    })
}

#[cfg(test)]
mod tests;
