use super::*;
use pretty_assertions::assert_eq;

fn error_at(code: ErrorCode, start: u32, message: &str) -> Diagnostic {
    Diagnostic::error(code)
        .with_message(message)
        .with_label(Span::new(start, start + 1), "here")
}

#[test]
fn flush_sorts_by_position_and_keeps_check_order_within_a_line() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
        error_limit: 0,
        deduplicate: false,
    });
    queue.add(error_at(ErrorCode::E2005, 30, "third"), 3, 1);
    queue.add(error_at(ErrorCode::E2001, 0, "first"), 1, 1);
    queue.add(error_at(ErrorCode::E2001, 1, "second"), 1, 1);

    let messages: Vec<String> = queue.flush().into_iter().map(|d| d.message).collect();
    assert_eq!(messages, vec!["first", "second", "third"]);
    assert!(queue.flush().is_empty());
    assert_eq!(queue.error_count(), 0);
}

#[test]
fn exact_duplicates_are_dropped() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.add(error_at(ErrorCode::E2003, 4, "dup"), 1, 5));
    assert!(!queue.add(error_at(ErrorCode::E2003, 4, "dup"), 1, 5));
    assert_eq!(queue.error_count(), 1);
}

#[test]
fn same_message_for_a_different_span_is_kept() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.add(error_at(ErrorCode::E2003, 4, "dup"), 1, 5));
    assert!(queue.add(error_at(ErrorCode::E2003, 40, "dup"), 4, 1));
    assert_eq!(queue.flush().len(), 2);
}

#[test]
fn notes_do_not_count_as_errors() {
    let mut queue = DiagnosticQueue::new();
    queue.add(Diagnostic::note(ErrorCode::E2004).with_message("note"), 1, 1);
    assert_eq!(queue.error_count(), 0);
    assert_eq!(queue.flush().len(), 1);
}

#[test]
fn error_limit_pushes_one_limit_diagnostic() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
        error_limit: 2,
        deduplicate: false,
    });
    for i in 0..5 {
        queue.add(error_at(ErrorCode::E2001, i, "e"), 1, i + 1);
    }
    assert!(queue.limit_reached());
    assert_eq!(queue.error_count(), 2);
    let flushed = queue.flush();
    let codes: Vec<ErrorCode> = flushed.iter().map(|d| d.code).collect();
    assert_eq!(
        codes,
        vec![ErrorCode::E2001, ErrorCode::E2001, ErrorCode::E9002]
    );
    assert!(flushed[2].notes.iter().any(|n| n.contains("--error-limit=<n>")));
}

#[test]
fn add_with_source_resolves_lines() {
    let source = "enum A {}\nenum B {}";
    let mut queue = DiagnosticQueue::new();
    queue.extend_with_source(
        vec![
            error_at(ErrorCode::E2005, 10, "on line two"),
            error_at(ErrorCode::E2005, 0, "on line one"),
        ],
        source,
    );
    let flushed = queue.flush();
    assert_eq!(flushed[0].message, "on line one");
    assert_eq!(flushed[1].message, "on line two");
}
