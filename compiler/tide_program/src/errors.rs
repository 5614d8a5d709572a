//! Registration failures.

use tide_diagnostic::{Diagnostic, ErrorCode};
use tide_ir::Span;

/// A declaration that could not be entered into the element graph.
///
/// Registration continues past these; each one becomes a diagnostic.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("duplicate identifier '{name}'")]
    Duplicate {
        name: String,
        span: Span,
        previous: Span,
    },

    #[error("file '{path}' not found")]
    FileNotFound { path: String, span: Span },

    #[error("file '{path}' has no exported member '{name}'")]
    ImportNotFound {
        path: String,
        name: String,
        span: Span,
    },

    /// A local export naming nothing in its file.
    #[error("cannot find name '{name}'")]
    ExportNotFound { name: String, span: Span },
}

impl RegisterError {
    pub fn code(&self) -> ErrorCode {
        match self {
            RegisterError::Duplicate { .. } => ErrorCode::DUPLICATE_ELEMENT,
            RegisterError::FileNotFound { .. } => ErrorCode::FILE_NOT_FOUND,
            RegisterError::ImportNotFound { .. } => ErrorCode::IMPORT_NOT_FOUND,
            RegisterError::ExportNotFound { .. } => ErrorCode::NOT_FOUND,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            RegisterError::Duplicate { span, .. }
            | RegisterError::FileNotFound { span, .. }
            | RegisterError::ImportNotFound { span, .. }
            | RegisterError::ExportNotFound { span, .. } => *span,
        }
    }
}

impl From<RegisterError> for Diagnostic {
    fn from(err: RegisterError) -> Self {
        let diag = Diagnostic::error(err.code());
        match err {
            RegisterError::Duplicate {
                name,
                span,
                previous,
            } => diag
                .with_args([name])
                .with_label(span, "duplicate declaration")
                .with_related(previous, "first declared here"),
            RegisterError::FileNotFound { path, span } => {
                diag.with_args([path]).with_label(span, "imported here")
            }
            RegisterError::ImportNotFound { path, name, span } => {
                diag.with_args([path, name]).with_label(span, "imported here")
            }
            RegisterError::ExportNotFound { name, span } => {
                diag.with_args([name]).with_label(span, "exported here")
            }
        }
    }
}
