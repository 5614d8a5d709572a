//! Tide Compiler - the resolution driver.
//!
//! Runs the resolver over a whole program the way a backend would consume
//! it: every non-generic top-level class, function and global is resolved,
//! methods of resolved classes are instantiated, and (optionally) every
//! function body is walked so each expression is resolved in its flow.
//! Failures are collected, never fatal.
//!
//! # Usage
//!
//! ```ignore
//! let options = CompileOptions::default();
//! let mut program = options.program(&interner, &arena, &sources);
//! let output = tide_compiler::compile(&mut program, &options);
//! std::process::exit(output.exit_code());
//! ```
//!
//! # Architecture
//!
//! ```text
//! tide_ir, tide_types, tide_diagnostic
//!              ↓
//!        tide_program
//!              ↓
//!        tide_resolve
//!              ↓
//!        tide_compiler  ← this crate
//! ```

mod options;
mod walk;

pub use options::CompileOptions;

use std::sync::Once;

use tide_diagnostic::Diagnostic;
use tide_ir::ElementId;
use tide_program::{ContextualTypes, ElementKind, Program};
use tide_resolve::{ReportMode, Resolver};
use tracing::debug;

use crate::walk::BodyWalker;

static SUBSCRIBER: Once = Once::new();

/// Install a stderr subscriber filtered by `RUST_LOG`, for example
/// `RUST_LOG=tide_resolve=trace`. Without `RUST_LOG` nothing is installed,
/// and repeated calls are no-ops.
pub fn init_tracing() {
    SUBSCRIBER.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let Ok(directives) = std::env::var("RUST_LOG") else {
            return;
        };
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::new(directives))
            .init();
    });
}

/// Result of a compilation run.
#[derive(Clone, Debug, Default)]
pub struct CompileOutput {
    /// Class and function instances resolved by the driver, in resolution
    /// order. Instances created on demand while resolving them are not
    /// listed.
    pub resolved: Vec<ElementId>,
    /// Generic prototypes left to their use sites.
    pub skipped: Vec<ElementId>,
    /// Every diagnostic, sorted.
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Process exit code: `1` if any error was reported, else `0`.
    pub fn exit_code(&self) -> i32 {
        i32::from(self.has_errors())
    }
}

/// Resolve the whole program.
#[tracing::instrument(level = "debug", skip_all, fields(check_bodies = options.check_bodies))]
pub fn compile(program: &mut Program<'_>, options: &CompileOptions) -> CompileOutput {
    let mut resolver = Resolver::new(program);
    let mut output = CompileOutput::default();
    let mut functions = Vec::new();

    let roots = top_level_roots(resolver.program());
    debug!(roots = roots.len(), "resolving top-level declarations");
    for root in roots {
        match resolver.program().kind(root) {
            ElementKind::Global => {
                resolver.resolve_global(root, ReportMode::Report);
            }
            ElementKind::ClassPrototype => {
                if resolver.program().class_prototype(root).is_some_and(|data| data.is_generic()) {
                    output.skipped.push(root);
                    continue;
                }
                let Some(class) = resolver.resolve_class(root, Vec::new(), ContextualTypes::new()) else {
                    continue;
                };
                output.resolved.push(class);
                for method in class_methods(resolver.program(), class) {
                    if let Some(function) = resolver.resolve_function(method, Vec::new(), &ContextualTypes::new(), None) {
                        output.resolved.push(function);
                        functions.push(function);
                    }
                }
            }
            ElementKind::FunctionPrototype => {
                if is_generic_function(resolver.program(), root) {
                    output.skipped.push(root);
                    continue;
                }
                if let Some(function) = resolver.resolve_function(root, Vec::new(), &ContextualTypes::new(), None) {
                    output.resolved.push(function);
                    functions.push(function);
                }
            }
            _ => {}
        }
    }

    if options.check_bodies {
        let mut walker = BodyWalker::new(&mut resolver);
        walker.walk_files();
        for function in functions {
            walker.walk_function(function);
        }
    }

    output.diagnostics = resolver.program_mut().diagnostics_mut().flush();
    debug!(
        resolved = output.resolved.len(),
        skipped = output.skipped.len(),
        diagnostics = output.diagnostics.len(),
        "compilation finished"
    );
    output
}

/// Classes, functions and globals declared in files and namespaces, in
/// declaration order.
fn top_level_roots(program: &Program<'_>) -> Vec<ElementId> {
    program
        .elements()
        .filter(|(_, element)| {
            matches!(
                element.kind,
                ElementKind::Global | ElementKind::ClassPrototype | ElementKind::FunctionPrototype
            ) && element
                .parent
                .is_some_and(|parent| matches!(program.kind(parent), ElementKind::File | ElementKind::Namespace))
        })
        .map(|(id, _)| id)
        .collect()
}

/// Constructor and own non-generic methods of a class instance, bound to
/// the instance. Every overload of a method is listed.
fn class_methods(program: &Program<'_>, class: ElementId) -> Vec<ElementId> {
    let Some(data) = program.class(class) else {
        return Vec::new();
    };
    let own = program
        .class_prototype(data.prototype)
        .map(|prototype| prototype.member_order.as_slice())
        .unwrap_or_default();
    let members = own
        .iter()
        .filter_map(|&member| program.lookup_instance_member(class, program.element(member).name))
        .flat_map(|head| overload_set(program, head));
    let mut methods = Vec::new();
    for member in data.constructor.into_iter().chain(members) {
        if program.kind(member) == ElementKind::FunctionPrototype
            && !is_generic_function(program, member)
            && !methods.contains(&member)
        {
            methods.push(member);
        }
    }
    methods
}

/// `head` and its sibling overloads, in declaration order.
fn overload_set(program: &Program<'_>, head: ElementId) -> Vec<ElementId> {
    match program.function_prototype(head) {
        Some(data) if !data.overloads.is_empty() => data.overloads.clone(),
        _ => vec![head],
    }
}

fn is_generic_function(program: &Program<'_>, function: ElementId) -> bool {
    program
        .function_prototype(function)
        .is_some_and(|data| data.is_generic())
}
