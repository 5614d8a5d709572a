use pretty_assertions::assert_eq;

use super::*;

fn not_found(start: u32) -> Diagnostic {
    Diagnostic::error(ErrorCode::NOT_FOUND)
        .with_args(["x"])
        .with_label(Span::new(start, start + 1), "")
}

#[test]
fn test_same_code_and_span_deduplicated() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.push(not_found(0)));
    assert!(!queue.push(not_found(0)));
    assert_eq!(queue.len(), 1);
    assert_eq!(queue.error_count(), 1);
}

#[test]
fn test_different_code_same_span_kept() {
    let mut queue = DiagnosticQueue::new();
    assert!(queue.push(not_found(0)));
    let other = Diagnostic::error(ErrorCode::NOT_CALLABLE).with_label(Span::new(0, 1), "");
    assert!(queue.push(other));
    assert_eq!(queue.len(), 2);
}

#[test]
fn test_error_limit() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
        error_limit: 2,
        deduplicate: true,
    });
    assert!(queue.push(not_found(0)));
    assert!(queue.push(not_found(2)));
    assert!(queue.limit_reached());
    assert!(!queue.push(not_found(4)));
    // Non-errors are not limited.
    assert!(queue.push(Diagnostic::pedantic(ErrorCode::NEVER_NULL).with_label(Span::new(6, 7), "")));
    assert_eq!(queue.len(), 3);
}

#[test]
fn test_warnings_do_not_count_as_errors() {
    let mut queue = DiagnosticQueue::new();
    queue.push(Diagnostic::warning(ErrorCode::NOT_FOUND).with_label(Span::new(0, 1), ""));
    assert!(!queue.has_errors());
    assert_eq!(queue.len(), 1);
}

#[test]
fn test_merge_deduplicates_against_existing() {
    let mut main = DiagnosticQueue::new();
    main.push(not_found(0));

    let mut probe = DiagnosticQueue::new();
    probe.push(not_found(0));
    probe.push(not_found(8));

    main.merge(probe);
    assert_eq!(main.len(), 2);
    assert_eq!(main.count_code(ErrorCode::NOT_FOUND), 2);
}

#[test]
fn test_take_resets_dedup_state() {
    let mut queue = DiagnosticQueue::new();
    queue.push(not_found(0));
    let taken = queue.take();
    assert_eq!(taken.len(), 1);
    assert!(queue.is_empty());
    assert!(!queue.has_errors());
    assert!(queue.push(not_found(0)));
}

#[test]
fn test_flush_sorts_by_position() {
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig::unlimited());
    queue.push(not_found(20));
    queue.push(not_found(4));
    queue.push(not_found(10));

    let starts: Vec<u32> = queue
        .flush()
        .iter()
        .filter_map(Diagnostic::primary_span)
        .map(|span| span.start)
        .collect();
    assert_eq!(starts, vec![4, 10, 20]);
    assert!(queue.is_empty());
}
