//! Configuration of a compilation run.

use tide_diagnostic::DiagnosticConfig;
use tide_ir::{ExprArena, Source, StringInterner};
use tide_program::{Options, Program};

/// Program options, diagnostic limits and driver switches.
#[derive(Clone, Debug)]
pub struct CompileOptions {
    pub options: Options,
    pub diagnostic_config: DiagnosticConfig,
    /// Resolve every expression in the bodies of resolved functions and in
    /// top-level statements.
    pub check_bodies: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            options: Options::default(),
            diagnostic_config: DiagnosticConfig::default(),
            check_bodies: true,
        }
    }
}

impl CompileOptions {
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_diagnostic_config(mut self, config: DiagnosticConfig) -> Self {
        self.diagnostic_config = config;
        self
    }

    #[must_use]
    pub fn with_check_bodies(mut self, check_bodies: bool) -> Self {
        self.check_bodies = check_bodies;
        self
    }

    /// A program over the given inputs, configured by these options.
    pub fn program<'a>(
        &self,
        interner: &'a StringInterner,
        arena: &'a ExprArena,
        sources: &'a [Source],
    ) -> Program<'a> {
        Program::new(self.options.clone(), interner, arena, sources)
            .with_diagnostic_config(self.diagnostic_config.clone())
    }
}
