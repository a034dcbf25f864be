//! Unit tests for command table construction and lookup.

use rstest::{fixture, rstest};

use super::*;

fn interval() -> PropertySpec {
    PropertySpec::new("interval", "Δt (s)", ["dt"])
}

fn averaging() -> PropertySpec {
    PropertySpec::new("averaging", "Averaging", ["avg", "av"])
}

fn graph(signal: &Signal) -> EventSpec {
    EventSpec::new("graph", ["g", "graph"], signal.clone())
}

#[fixture]
fn graph_signal() -> Signal {
    Signal::new()
}

#[fixture]
fn table(graph_signal: Signal) -> CommandTable {
    CommandTable::build(
        vec![interval(), averaging()],
        vec![graph(&graph_signal)],
        CommandSeparator::Hyphen,
    )
    .expect("build table")
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

#[rstest]
#[case::single_token("dt", "interval")]
#[case::first_alias("avg", "averaging")]
#[case::second_alias("av", "averaging")]
fn resolves_property_tokens(table: CommandTable, #[case] token: &str, #[case] expected: &str) {
    assert_eq!(table.lookup_property(token), Some(expected));
}

#[rstest]
fn property_lookup_ignores_event_tokens(table: CommandTable) {
    assert_eq!(table.lookup_property("g"), None);
    assert_eq!(table.lookup_event("dt"), None);
}

#[rstest]
fn resolves_event_tokens(table: CommandTable) {
    assert_eq!(table.lookup_event("g"), Some("graph"));
    assert_eq!(table.lookup_event("graph"), Some("graph"));
}

#[rstest]
fn event_signal_is_shared_with_host(graph_signal: Signal) {
    let table = CommandTable::build(
        vec![interval()],
        vec![graph(&graph_signal)],
        CommandSeparator::Hyphen,
    )
    .expect("build table");
    let signal = table.event_signal("graph").expect("graph signal");
    signal.set();
    assert!(graph_signal.is_set());
}

#[rstest]
fn property_tokens_keep_supplied_order(table: CommandTable) {
    let tokens: Vec<&str> = table
        .property_tokens()
        .iter()
        .map(PropertyToken::token)
        .collect();
    assert_eq!(tokens, ["dt", "avg", "av"]);
}

#[rstest]
fn exposes_property_labels(table: CommandTable) {
    assert_eq!(table.property_label("interval"), Some("Δt (s)"));
    assert_eq!(table.property_label("missing"), None);
}

// ---------------------------------------------------------------------------
// Stop event
// ---------------------------------------------------------------------------

#[rstest]
fn synthesises_default_stop_event(table: CommandTable) {
    assert_eq!(table.stop_identifier(), DEFAULT_STOP_IDENTIFIER);
    assert_eq!(table.stop_tokens(), ["q", "Q", "quit"]);
    for token in DEFAULT_STOP_TOKENS {
        assert!(table.is_stop_token(token), "{token} should stop");
    }
    assert!(!table.stop_signal().is_set());
}

#[test]
fn uses_host_stop_event() {
    let stop = Signal::new();
    let table = CommandTable::build(
        vec![interval()],
        vec![EventSpec::stop(["x", "exit"], stop.clone())],
        CommandSeparator::Hyphen,
    )
    .expect("build table");

    assert!(table.is_stop_token("exit"));
    assert!(!table.is_stop_token("q"));
    table.stop_signal().set();
    assert!(stop.is_set());
}

#[test]
fn event_named_stop_becomes_the_stop_event() {
    let host = Signal::new();
    let table = CommandTable::build(
        vec![interval()],
        vec![EventSpec::new(DEFAULT_STOP_IDENTIFIER, ["s"], host.clone())],
        CommandSeparator::Hyphen,
    )
    .expect("build table");

    assert!(table.is_stop_token("s"));
    assert!(!table.is_stop_token("q"));
    assert_eq!(table.lookup_event("s"), None);
    assert!(table.event_signal(DEFAULT_STOP_IDENTIFIER).is_none());
    assert_eq!(table.stop_tokens(), ["s"]);
    table.stop_signal().set();
    assert!(host.is_set());
}

#[test]
fn rejects_event_named_stop_alongside_stop_spec() {
    let error = CommandTable::build(
        Vec::new(),
        vec![
            EventSpec::stop(["x"], Signal::new()),
            EventSpec::new(DEFAULT_STOP_IDENTIFIER, ["s"], Signal::new()),
        ],
        CommandSeparator::Hyphen,
    )
    .expect_err("two stop events");
    assert!(matches!(error, ConstructionError::MultipleStopEvents { .. }));
}

#[test]
fn stop_tokens_are_not_events() {
    let table = CommandTable::build(
        Vec::new(),
        vec![EventSpec::stop(["x"], Signal::new())],
        CommandSeparator::Hyphen,
    )
    .expect("build table");
    assert_eq!(table.lookup_event("x"), None);
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn rejects_token_shared_by_two_properties() {
    let error = CommandTable::build(
        vec![interval(), PropertySpec::new("period", "Period", ["dt"])],
        Vec::new(),
        CommandSeparator::Hyphen,
    )
    .expect_err("duplicate token");
    assert_eq!(error, ConstructionError::duplicate_token("dt"));
}

#[rstest]
fn rejects_property_token_reused_by_event(graph_signal: Signal) {
    let error = CommandTable::build(
        vec![PropertySpec::new("gain", "Gain", ["g"])],
        vec![graph(&graph_signal)],
        CommandSeparator::Hyphen,
    )
    .expect_err("duplicate token");
    assert_eq!(error, ConstructionError::duplicate_token("g"));
}

#[test]
fn rejects_property_token_colliding_with_default_stop() {
    let error = CommandTable::build(
        vec![PropertySpec::new("quality", "Quality", ["q"])],
        Vec::new(),
        CommandSeparator::Hyphen,
    )
    .expect_err("stop collision");
    assert_eq!(error, ConstructionError::duplicate_token("q"));
}

#[test]
fn rejects_property_token_colliding_with_host_stop() {
    let error = CommandTable::build(
        vec![PropertySpec::new("exposure", "Exposure", ["x"])],
        vec![EventSpec::stop(["x"], Signal::new())],
        CommandSeparator::Hyphen,
    )
    .expect_err("stop collision");
    assert_eq!(error, ConstructionError::duplicate_token("x"));
}

#[test]
fn reports_first_collision_in_supplied_order() {
    let error = CommandTable::build(
        vec![
            PropertySpec::new("a", "A", ["a", "b"]),
            PropertySpec::new("c", "C", ["b", "a"]),
        ],
        Vec::new(),
        CommandSeparator::Hyphen,
    )
    .expect_err("collision");
    assert_eq!(error, ConstructionError::duplicate_token("b"));
}

#[rstest]
#[case::identifier(PropertySpec::new("", "Label", ["t"]), "identifier")]
#[case::label(PropertySpec::new("id", " ", ["t"]), "label")]
#[case::commands(PropertySpec::new("id", "Label", Vec::<String>::new()), "commands")]
fn rejects_incomplete_property_spec(#[case] spec: PropertySpec, #[case] field: &str) {
    let error = CommandTable::build(vec![spec], Vec::new(), CommandSeparator::Hyphen)
        .expect_err("incomplete spec");
    assert!(
        matches!(
            &error,
            ConstructionError::MissingRequiredSpecField { field: missing, .. } if *missing == field
        ),
        "unexpected error: {error:?}"
    );
}

#[test]
fn rejects_blank_token() {
    let error = CommandTable::build(
        vec![PropertySpec::new("interval", "Interval", ["dt", "  "])],
        Vec::new(),
        CommandSeparator::Hyphen,
    )
    .expect_err("blank token");
    assert!(matches!(error, ConstructionError::BlankCommandToken { .. }));
}

#[test]
fn rejects_duplicate_property_identifier() {
    let error = CommandTable::build(
        vec![interval(), PropertySpec::new("interval", "Again", ["di"])],
        Vec::new(),
        CommandSeparator::Hyphen,
    )
    .expect_err("duplicate identifier");
    assert_eq!(error, ConstructionError::duplicate_identifier("interval"));
}

#[test]
fn rejects_second_stop_event() {
    let error = CommandTable::build(
        Vec::new(),
        vec![
            EventSpec::stop(["x"], Signal::new()),
            EventSpec::stop(["y"], Signal::new()),
        ],
        CommandSeparator::Hyphen,
    )
    .expect_err("two stop events");
    assert!(matches!(error, ConstructionError::MultipleStopEvents { .. }));
}
