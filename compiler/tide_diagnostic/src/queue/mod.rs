//! Report collection.
//!
//! A report is dropped when its `(code, primary span)` was already seen or
//! the error cap is hit. Speculative resolution swaps a batch out with
//! `take` and puts it back with `merge` when the attempt is kept.

use rustc_hash::FxHashSet;
use tide_ir::Span;

use crate::{Diagnostic, ErrorCode};

/// Filtering applied by a [`DiagnosticQueue`].
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Errors accepted before later ones are discarded; `0` disables the
    /// cap. Warnings and pedantic reports are never capped.
    pub error_limit: usize,
    /// Discard a report whose key was already accepted.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 100,
            deduplicate: true,
        }
    }
}

impl DiagnosticConfig {
    /// No error cap. Tests use this to observe every report.
    pub fn unlimited() -> Self {
        DiagnosticConfig {
            error_limit: 0,
            deduplicate: true,
        }
    }
}

/// Reports of one program, in the order they were raised until
/// [`flush`](Self::flush) sorts them by position.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticQueue {
    diagnostics: Vec<Diagnostic>,
    /// Keys of every diagnostic accepted so far.
    seen: FxHashSet<(ErrorCode, Span)>,
    /// Accepted error-severity reports.
    error_count: usize,
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &DiagnosticConfig {
        &self.config
    }

    /// Accept `diag` unless it is a duplicate or over the error cap.
    /// Returns whether it was kept.
    pub fn push(&mut self, diag: Diagnostic) -> bool {
        let is_error = diag.is_error();
        if is_error && self.limit_reached() {
            return false;
        }
        if self.config.deduplicate && !self.seen.insert(diag.key()) {
            return false;
        }
        if is_error {
            self.error_count += 1;
        }
        self.diagnostics.push(diag);
        true
    }

    /// Move every diagnostic of `other` into this queue, applying this
    /// queue's deduplication and limit.
    pub fn merge(&mut self, mut other: DiagnosticQueue) {
        for diag in other.take() {
            self.push(diag);
        }
    }

    /// Remove and return all diagnostics in insertion order, resetting
    /// counters. Configuration is kept.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        self.seen.clear();
        self.error_count = 0;
        std::mem::take(&mut self.diagnostics)
    }

    /// Drain the queue ordered by primary span start. Reports without a
    /// span sort first.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let position = |d: &Diagnostic| d.primary_span().map_or(0, |span| span.start);
        let already_sorted = self
            .diagnostics
            .windows(2)
            .all(|w| position(&w[0]) <= position(&w[1]));
        if !already_sorted {
            // sort_by_key is stable, so equal positions keep report order.
            self.diagnostics.sort_by_key(position);
        }
        self.take()
    }

    /// True once further errors would be discarded.
    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Reports of every severity.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Inspect without draining.
    pub fn peek(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn count_code(&self, code: ErrorCode) -> usize {
        self.diagnostics.iter().filter(|d| d.code == code).count()
    }
}

#[cfg(test)]
mod tests;
