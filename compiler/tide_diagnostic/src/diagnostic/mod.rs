//! The report record.
//!
//! Every resolution failure becomes a [`Diagnostic`]: a code, a severity, the
//! message rendered from the code's template and the spans it points at.

use std::fmt;

use smallvec::SmallVec;
use tide_ir::Span;

use crate::ErrorCode;

/// Message arguments. At most three are ever rendered.
pub type DiagnosticArgs = SmallVec<[String; 3]>;

/// How bad a report is; `Ord` follows badness.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Severity {
    Pedantic,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Pedantic => write!(f, "pedantic"),
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A span with a short note attached.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub span: Span,
    pub message: String,
    /// The primary label marks where the failure is; at most one per
    /// diagnostic.
    pub is_primary: bool,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Secondary location, such as the overload that came closest.
    pub fn related(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
            is_primary: false,
        }
    }
}

/// A reported resolution failure or remark.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    /// Rendered message.
    pub message: String,
    /// Arguments the message was rendered from.
    pub args: DiagnosticArgs,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Message starts as the bare template; see [`with_args`](Self::with_args).
    pub fn new(code: ErrorCode, severity: Severity) -> Self {
        Diagnostic {
            code,
            severity,
            message: code.render(&[]),
            args: SmallVec::new(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    #[cold]
    pub fn error(code: ErrorCode) -> Self {
        Self::new(code, Severity::Error)
    }

    #[cold]
    pub fn warning(code: ErrorCode) -> Self {
        Self::new(code, Severity::Warning)
    }

    /// Only surfaced when pedantic reports are enabled.
    #[cold]
    pub fn pedantic(code: ErrorCode) -> Self {
        Self::new(code, Severity::Pedantic)
    }

    /// Fill the template's `{0}`..`{2}` placeholders. Extra arguments are ignored.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().take(3).map(Into::into).collect();
        self.message = self.code.render(&self.args);
        self
    }

    /// Override the rendered message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Point at the failure. A later call moves the primary label.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.retain(|label| !label.is_primary);
        self.labels.insert(0, Label::primary(span, message));
        self
    }

    pub fn with_related(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::related(span, message));
        self
    }

    /// Add a note providing additional context.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Whether this diagnostic blocks code generation.
    #[inline]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Span of the primary label.
    pub fn primary_span(&self) -> Option<Span> {
        self.labels
            .iter()
            .find(|label| label.is_primary)
            .map(|label| label.span)
    }

    /// Span of the first related label.
    pub fn related_span(&self) -> Option<Span> {
        self.labels
            .iter()
            .find(|label| !label.is_primary)
            .map(|label| label.span)
    }

    /// Deduplication key.
    #[inline]
    pub fn key(&self) -> (ErrorCode, Span) {
        (self.code, self.primary_span().unwrap_or(Span::DUMMY))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)?;
        for label in &self.labels {
            let marker = if label.is_primary { "-->" } else { ":::" };
            write!(f, "\n  {marker} {:?}", label.span)?;
            if !label.message.is_empty() {
                write!(f, " {}", label.message)?;
            }
        }
        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
