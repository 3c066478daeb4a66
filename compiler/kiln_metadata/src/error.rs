use kiln_diagnostic::{Diagnostic, ErrorCode};
use kiln_ir::Span;

/// Failures that abort a single planning call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    #[error("`{ty}` expects {expected} generic argument(s) but {found} were given")]
    ArityMismatch {
        ty: String,
        expected: usize,
        found: usize,
        span: Span,
    },

    #[error("generic nesting in `{ty}` exceeds the depth limit of {limit}")]
    RecursionLimitExceeded { ty: String, limit: usize, span: Span },

    #[error("`{ty}` contains itself without indirection")]
    CyclicLayout { ty: String, span: Span },

    #[error("reference to unknown declaration #{id}")]
    UnknownDecl { id: u32 },

    #[error("internal planner error: {0}")]
    Internal(String),
}

impl PlanError {
    pub fn code(&self) -> ErrorCode {
        match self {
            PlanError::ArityMismatch { .. } => ErrorCode::E3001,
            PlanError::RecursionLimitExceeded { .. } => ErrorCode::E3002,
            PlanError::CyclicLayout { .. } => ErrorCode::E3003,
            PlanError::UnknownDecl { .. } => ErrorCode::E1002,
            PlanError::Internal(_) => ErrorCode::E9001,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            PlanError::ArityMismatch { span, .. }
            | PlanError::RecursionLimitExceeded { span, .. }
            | PlanError::CyclicLayout { span, .. } => *span,
            PlanError::UnknownDecl { .. } | PlanError::Internal(_) => Span::DUMMY,
        }
    }

    pub fn into_diagnostic(self) -> Diagnostic {
        let span = self.span();
        let diag = Diagnostic::error(self.code()).with_message(self.to_string());
        match self {
            PlanError::ArityMismatch { .. } => diag.with_label(span, "generic type declared here"),
            PlanError::RecursionLimitExceeded { .. } => diag
                .with_label(span, "instantiated here")
                .with_suggestion("raise the limit with `--max-depth=<n>`"),
            PlanError::CyclicLayout { .. } => diag
                .with_label(span, "recursive without indirection")
                .with_suggestion("store the recursive member behind an indirection"),
            PlanError::UnknownDecl { .. } | PlanError::Internal(_) => diag,
        }
    }
}
