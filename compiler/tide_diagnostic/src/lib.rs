//! Diagnostic system for the Tide resolution core.
//!
//! Every resolution failure becomes a [`Diagnostic`]:
//! - an [`ErrorCode`] with a message template
//! - a [`Severity`] (pedantic, info, warning, error)
//! - a primary span and an optional related span
//! - up to three message arguments
//!
//! Only error-severity diagnostics block code generation of the affected
//! declaration. The [`DiagnosticQueue`] deduplicates by `(code, span)` so a
//! failure discovered along two call paths is shown once, and whole queues
//! can be taken and merged, which is how speculative resolution keeps its
//! diagnostics separate until the caller decides what to do with them.

mod diagnostic;
mod error_code;
pub mod queue;

pub use diagnostic::{Diagnostic, DiagnosticArgs, Label, Severity};
pub use error_code::ErrorCode;
pub use queue::{DiagnosticConfig, DiagnosticQueue};
