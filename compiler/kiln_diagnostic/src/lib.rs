//! Diagnostic system for conformance and metadata reporting.
//!
//! Every reported problem carries:
//! - an error code for searchability and `kiln explain`
//! - a message (what went wrong)
//! - a primary span (where it went wrong)
//! - optional notes (why it is wrong)
//!
//! # Error Guarantees
//!
//! [`ErrorGuaranteed`] is type-level proof that at least one error was
//! emitted. Failure paths return it so that no failure can be silently
//! dropped without a diagnostic.
//!
//! ```text
//! let guarantee = queue.emit_error(diagnostic, line, column);
//! fn check(...) -> Result<(), ErrorGuaranteed> { ... }
//! ```

mod diagnostic;
pub mod emitter;
mod error_code;
pub mod errors;
mod guarantee;
pub mod queue;
pub mod span_utils;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
pub use errors::ErrorDocs;
pub use guarantee::ErrorGuaranteed;
pub use queue::{DiagnosticConfig, DiagnosticQueue};
