//! Tide Resolve - resolution of syntax to types and elements.
//!
//! The [`Resolver`] is a program-scoped service. Given type syntax or an
//! expression and the context it appears in, it produces a concrete
//! [`Type`](tide_types::Type) or the program element the syntax refers to,
//! creating class and function instances on demand through the program's
//! instance caches.
//!
//! # Architecture
//!
//! ```text
//! resolve_type ──► resolve_type_arguments ──► resolve_class ─┐
//!      ▲                                                     │ publish, then
//!      │                                                     ▼ resolve members
//! resolve_expression ──► resolve_overloads ──► maybe_infer_call ──► resolve_function
//! ```
//!
//! Resolution is re-entrant: an instance is published in its prototype's
//! cache before its members are resolved, so a class that mentions itself
//! finds the instance being built instead of recursing. Only a base class
//! chain that revisits an instance still resolving its own base is an
//! error.
//!
//! # Failure
//!
//! Every entry point returns `Option`. A `None` in [`ReportMode::Report`]
//! comes with a diagnostic in the program's queue (deduplicated by code and
//! span); in [`ReportMode::Swallow`] nothing is reported. Speculative
//! resolution of overload candidates runs in a probe whose diagnostics are
//! discarded with the candidate. An instance first created inside a probe
//! keeps its own failures until a request outside any probe reaches it, so
//! a losing candidate leaves the queue untouched.

mod expr;
mod infer;
mod instantiate;
mod overload;
mod report;
mod resolver;
mod type_args;
mod types;

pub use expr::CallTarget;
pub use report::ReportMode;
pub use resolver::Resolver;
pub use type_args::UseSite;

#[cfg(test)]
mod test_support;
