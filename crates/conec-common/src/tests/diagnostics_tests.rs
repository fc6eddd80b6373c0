use super::*;

#[test]
fn sink_counts_only_errors() {
    let mut diags = Diagnostics::new();
    diags.push(Diagnostic::error(
        "main.con",
        10,
        3,
        "boom",
        diagnostic_codes::INVALID_TYPE,
    ));
    let mut warning = Diagnostic::error("main.con", 0, 0, "meh", 0);
    warning.category = DiagnosticCategory::Warning;
    diags.push(warning);

    assert_eq!(diags.error_count(), 1);
    assert_eq!(diags.all().len(), 2);
}

#[test]
fn format_message_substitutes_placeholders() {
    let text = format_message(diagnostic_messages::UNKNOWN_NAME, &["count"]);
    assert_eq!(text, "The name `count` does not refer to a declared name");
}

#[test]
fn related_information_is_attached_in_order() {
    let diag = Diagnostic::error("m.con", 5, 1, "dup", diagnostic_codes::DUPLICATE_NAME)
        .with_related("m.con", 1, 1, "first definition");
    assert_eq!(diag.related_information.len(), 1);
    assert_eq!(diag.related_information[0].start, 1);
}

#[test]
fn records_resolve_line_and_column() {
    let mut diags = Diagnostics::new();
    diags.push(Diagnostic::error(
        "m.con",
        5,
        2,
        "deref of non-pointer",
        diagnostic_codes::NOT_POINTER,
    ));
    let lines = crate::position::LineMap::build("ab\ncdefg\n");
    let records = diags.records(&lines);
    assert_eq!(records.len(), 1);
    assert_eq!((records[0].line, records[0].column), (1, 2));
    assert_eq!(records[0].code, diagnostic_codes::NOT_POINTER);
}

#[test]
fn diagnostics_round_trip_through_json() {
    let diag = Diagnostic::error("m.con", 5, 2, "msg", diagnostic_codes::NOT_POINTER);
    let json = serde_json::to_string(&diag).unwrap();
    let back: Diagnostic = serde_json::from_str(&json).unwrap();
    assert_eq!(back, diag);
}
