//! Program-wide options.

use tide_types::Target;

/// How a call with several equally good overloads is settled.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum OverloadPolicy {
    /// Report `AmbiguousOverload` unless every tied candidate resolves to
    /// the same function.
    #[default]
    ReportAmbiguous,
    /// Pick the tied candidate declared first.
    FirstDeclared,
}

/// Options fixed for the lifetime of a [`Program`](crate::Program).
#[derive(Clone, Debug, Default)]
pub struct Options {
    /// Drives the width of `usize`/`isize` and of class references.
    pub target: Target,
    pub overload_policy: OverloadPolicy,
}

impl Options {
    #[must_use]
    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    #[must_use]
    pub fn with_overload_policy(mut self, policy: OverloadPolicy) -> Self {
        self.overload_policy = policy;
        self
    }
}
