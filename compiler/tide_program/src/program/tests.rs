#![allow(clippy::expect_used)]

use pretty_assertions::assert_eq;
use tide_diagnostic::{Diagnostic, ErrorCode};
use tide_ir::builder::Fixture;
use tide_ir::Span;
use tide_types::{Target, Type};

use crate::test_support::{find, program};
use crate::{DeferredReports, Options, Program};

#[test]
fn test_builtin_types_follow_target() {
    let fixture = Fixture::main(|_| Vec::new());
    let wasm32 = program(&fixture);
    assert_eq!(wasm32.builtin_type(wasm32.intern("usize")), Some(Type::USIZE32));
    assert_eq!(wasm32.builtin_type(wasm32.intern("number")), Some(Type::F64));
    assert_eq!(wasm32.builtin_type(wasm32.intern("boolean")), Some(Type::BOOL));
    assert_eq!(wasm32.builtin_type(wasm32.intern("String")), None);

    let wasm64 = Program::new(
        Options::default().with_target(Target::Wasm64),
        &fixture.interner,
        &fixture.arena,
        &fixture.sources,
    );
    assert_eq!(wasm64.builtin_type(wasm64.intern("isize")), Some(Type::ISIZE64));
    assert_eq!(wasm64.target(), Target::Wasm64);
}

#[test]
fn test_typed_accessors_check_kind() {
    let fixture = Fixture::main(|b| vec![b.class("Foo").item(), b.func("f").item()]);
    let program = program(&fixture);
    let class = find(&program, "main/Foo");
    let function = find(&program, "main/f");

    assert!(program.class_prototype(class).is_some());
    assert!(program.function_prototype(class).is_none());
    assert!(program.function_prototype(function).is_some());
    assert!(program.class(class).is_none());
    assert!(program.file_data(find(&program, "main")).is_some());
}

#[test]
fn test_elements_iterate_in_allocation_order() {
    let fixture = Fixture::main(|b| vec![b.class("A").item(), b.class("B").item()]);
    let program = program(&fixture);
    let names: Vec<&str> = program
        .elements()
        .map(|(_, element)| element.internal_name.as_str())
        .collect();
    assert_eq!(names, vec!["main", "main/A", "main/B"]);
}

#[test]
fn test_deferred_reports_are_taken_once() {
    let fixture = Fixture::main(|b| vec![b.class("Foo").item(), b.func("f").item()]);
    let mut program = program(&fixture);
    let (class, function) = (find(&program, "main/Foo"), find(&program, "main/f"));

    program.defer_reports(function, DeferredReports::default());
    assert!(!program.has_deferred_reports(function));

    let missing = Diagnostic::error(ErrorCode::NOT_FOUND).with_label(Span::new(1, 4), "here");
    program.defer_reports(
        class,
        DeferredReports {
            diagnostics: vec![missing],
            nested: vec![function],
        },
    );
    assert!(program.has_deferred_reports(class));
    assert!(program.diagnostics().is_empty());

    let held = program.take_deferred_reports(class).expect("held");
    assert_eq!(held.diagnostics.len(), 1);
    assert_eq!(held.nested, vec![function]);
    assert!(program.take_deferred_reports(class).is_none());
}
