use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_diagnostic_builder() {
    let diag = Diagnostic::error(ErrorCode::NOT_ASSIGNABLE)
        .with_args(["i64", "i32"])
        .with_label(Span::new(0, 5), "here")
        .with_related(Span::new(10, 12), "declared here")
        .with_note("some context");

    assert_eq!(diag.code, ErrorCode::E2005);
    assert_eq!(diag.message, "Type 'i64' is not assignable to type 'i32'.");
    assert!(diag.is_error());
    assert_eq!(diag.labels.len(), 2);
    assert_eq!(diag.primary_span(), Some(Span::new(0, 5)));
    assert_eq!(diag.related_span(), Some(Span::new(10, 12)));
    assert_eq!(diag.notes.len(), 1);
}

#[test]
fn test_args_capped_at_three() {
    let diag = Diagnostic::error(ErrorCode::INTERNAL).with_args(["a", "b", "c", "d"]);
    assert_eq!(diag.args.len(), 3);
    assert!(!diag.args.spilled());
}

#[test]
fn test_primary_label_replaced() {
    let diag = Diagnostic::error(ErrorCode::NOT_FOUND)
        .with_related(Span::new(1, 2), "related")
        .with_label(Span::new(3, 4), "first")
        .with_label(Span::new(5, 6), "second");
    assert_eq!(diag.primary_span(), Some(Span::new(5, 6)));
    assert_eq!(diag.labels.len(), 2);
    assert!(diag.labels[0].is_primary);
}

#[test]
fn test_severity_order() {
    assert!(Severity::Pedantic < Severity::Info);
    assert!(Severity::Warning < Severity::Error);
    assert!(!Diagnostic::pedantic(ErrorCode::NEVER_NULL).is_error());
    assert!(!Diagnostic::warning(ErrorCode::NOT_FOUND).is_error());
}

#[test]
fn test_key_without_label_uses_dummy_span() {
    let diag = Diagnostic::error(ErrorCode::TYPE_EXPECTED);
    assert_eq!(diag.key(), (ErrorCode::TYPE_EXPECTED, Span::DUMMY));
}

#[test]
fn test_diagnostic_display() {
    let diag = Diagnostic::error(ErrorCode::NOT_FOUND)
        .with_args(["x"])
        .with_label(Span::new(0, 1), "");

    let output = diag.to_string();
    assert!(output.starts_with("error[E2001]: Cannot find name 'x'."));
    assert!(output.contains("0..1"));
}
