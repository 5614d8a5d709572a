use tide_diagnostic::{DiagnosticConfig, ErrorCode};
use tide_ir::builder::Fixture;
use tide_ir::ElementId;
use tide_program::{Options, Program};
use tide_types::Type;

use crate::{ReportMode, Resolver};

/// Program over a fixture with default options.
pub(crate) fn program(fixture: &Fixture) -> Program<'_> {
    program_with(fixture, Options::default())
}

/// Program over a fixture with an unlimited diagnostic queue.
pub(crate) fn program_with(fixture: &Fixture, options: Options) -> Program<'_> {
    Program::new(options, &fixture.interner, &fixture.arena, &fixture.sources)
        .with_diagnostic_config(DiagnosticConfig::unlimited())
}

/// Element by internal name; panics if missing.
pub(crate) fn find(program: &Program<'_>, internal_name: &str) -> ElementId {
    program
        .element_by_internal_name(internal_name)
        .unwrap_or_else(|| panic!("no element named {internal_name}"))
}

/// Resolve the global with the given internal name.
pub(crate) fn global_type(resolver: &mut Resolver<'_, '_>, internal_name: &str) -> Option<Type> {
    let global = find(resolver.program(), internal_name);
    resolver.resolve_global(global, ReportMode::Report)
}

/// Codes of every diagnostic reported so far, in report order.
pub(crate) fn codes(program: &Program<'_>) -> Vec<ErrorCode> {
    program.diagnostics().peek().map(|diagnostic| diagnostic.code).collect()
}

/// Display name of a type.
pub(crate) fn show(program: &Program<'_>, ty: Type) -> String {
    ty.display(program).to_string()
}
