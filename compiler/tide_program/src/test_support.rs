use tide_diagnostic::DiagnosticConfig;
use tide_ir::builder::Fixture;
use tide_ir::ElementId;

use crate::{Options, Program};

/// Initialized program over a fixture, with an unlimited diagnostic queue.
pub(crate) fn program(fixture: &Fixture) -> Program<'_> {
    let mut program = Program::new(
        Options::default(),
        &fixture.interner,
        &fixture.arena,
        &fixture.sources,
    )
    .with_diagnostic_config(DiagnosticConfig::unlimited());
    program.initialize();
    program
}

/// Element by internal name; panics if missing.
pub(crate) fn find(program: &Program<'_>, internal_name: &str) -> ElementId {
    program
        .element_by_internal_name(internal_name)
        .unwrap_or_else(|| panic!("no element named {internal_name}"))
}
