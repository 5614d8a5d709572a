//! Where diagnostics of a resolution go.

use tide_diagnostic::{Diagnostic, DiagnosticConfig, DiagnosticQueue};
use tide_ir::ElementId;
use tide_program::DeferredReports;

use crate::Resolver;

/// Whether a resolution reports its failures.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum ReportMode {
    /// Report failures, deduplicated by code and span.
    #[default]
    Report,
    /// Fail silently, for the call and everything it resolves.
    Swallow,
}

impl ReportMode {
    #[inline]
    pub fn is_report(self) -> bool {
        self == ReportMode::Report
    }
}

/// A diagnostic destination pushed for the extent of a closure. With no
/// sink pushed, diagnostics go to the program queue.
#[derive(Debug)]
pub(crate) enum Sink {
    /// A speculative attempt. The caller merges or discards the queue.
    Probe(DiagnosticQueue),
    /// The own resolution of an instance.
    Instance {
        queue: DiagnosticQueue,
        nested: Vec<ElementId>,
    },
}

impl Sink {
    fn queue_mut(&mut self) -> &mut DiagnosticQueue {
        match self {
            Sink::Probe(queue) | Sink::Instance { queue, .. } => queue,
        }
    }
}

fn collecting() -> DiagnosticQueue {
    DiagnosticQueue::with_config(DiagnosticConfig::unlimited())
}

impl Resolver<'_, '_> {
    /// Report `diagnostic` unless `mode` swallows it.
    pub(crate) fn report(&mut self, mode: ReportMode, diagnostic: Diagnostic) {
        if !mode.is_report() {
            return;
        }
        match self.sinks.last_mut() {
            Some(sink) => {
                sink.queue_mut().push(diagnostic);
            }
            None => {
                self.program.report(diagnostic);
            }
        }
    }

    /// Whether some enclosing resolution is speculative.
    #[inline]
    pub(crate) fn in_probe(&self) -> bool {
        self.sinks.iter().any(|sink| matches!(sink, Sink::Probe(_)))
    }

    /// Run `f` with its diagnostics collected separately. The caller
    /// decides whether to merge or discard them.
    pub fn probe<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> (Option<T>, DiagnosticQueue) {
        self.sinks.push(Sink::Probe(collecting()));
        let result = f(self);
        let queue = match self.sinks.pop() {
            Some(Sink::Probe(queue)) => queue,
            _ => DiagnosticQueue::default(),
        };
        (result, queue)
    }

    /// Resolve the parts of a freshly published `instance`.
    ///
    /// The instance's own failures belong to its declaration, whichever
    /// call first requested it. Outside a probe they are reported at once.
    /// Inside one they are held on the instance and surface when a later
    /// request outside any probe reaches it (see [`Self::replay_deferred`]).
    pub(crate) fn resolve_instance<T>(&mut self, instance: ElementId, f: impl FnOnce(&mut Self) -> T) -> T {
        self.sinks.push(Sink::Instance {
            queue: collecting(),
            nested: Vec::new(),
        });
        let result = f(self);
        let Some(Sink::Instance { mut queue, nested }) = self.sinks.pop() else {
            return result;
        };
        if self.in_probe() {
            self.program.defer_reports(
                instance,
                DeferredReports {
                    diagnostics: queue.take(),
                    nested,
                },
            );
            if let Some(Sink::Instance { nested, .. }) = self.sinks.last_mut() {
                nested.push(instance);
            }
        } else {
            for diagnostic in queue.take() {
                self.report(ReportMode::Report, diagnostic);
            }
        }
        result
    }

    /// Surface the reports held on `instance` and on the instances created
    /// while it resolved. Inside a probe the reports stay held, and an
    /// instance being resolved that reuses `instance` takes it as nested.
    pub(crate) fn replay_deferred(&mut self, instance: ElementId) {
        if self.in_probe() {
            if self.program.has_deferred_reports(instance) {
                if let Some(Sink::Instance { nested, .. }) = self.sinks.last_mut() {
                    nested.push(instance);
                }
            }
            return;
        }
        let mut pending = vec![instance];
        while let Some(next) = pending.pop() {
            let Some(reports) = self.program.take_deferred_reports(next) else {
                continue;
            };
            for diagnostic in reports.diagnostics {
                self.report(ReportMode::Report, diagnostic);
            }
            pending.extend(reports.nested);
        }
    }
}
