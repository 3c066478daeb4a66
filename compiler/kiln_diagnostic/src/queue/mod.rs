//! Diagnostic queue for collecting, deduplicating, and sorting diagnostics.
//!
//! - Error limits to keep output bounded
//! - Exact-duplicate suppression, so a reason reported twice for the same
//!   declaration and requirement appears once
//! - Stable position sort on flush: diagnostics on the same line keep the
//!   order in which the checks produced them

use kiln_ir::Span;
use rustc_hash::FxHashSet;

use crate::span_utils::LineOffsetTable;
use crate::{Diagnostic, ErrorCode};

/// Configuration for diagnostic processing.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DiagnosticConfig {
    /// Maximum number of errors before further errors are dropped (0 = unlimited).
    pub error_limit: usize,
    /// Drop diagnostics identical to one already queued.
    pub deduplicate: bool,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        DiagnosticConfig {
            error_limit: 50,
            deduplicate: true,
        }
    }
}

/// Queued diagnostic with its resolved position.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
struct QueuedDiagnostic {
    diagnostic: Diagnostic,
    line: u32,
    column: u32,
}

/// Queue for collecting, deduplicating, and sorting diagnostics.
///
/// ```text
/// let mut queue = DiagnosticQueue::new();
/// queue.add(diagnostic, line, column);
/// let sorted = queue.flush();
/// ```
#[derive(Clone, Debug, Default)]
pub struct DiagnosticQueue {
    diagnostics: Vec<QueuedDiagnostic>,
    /// Count of errors (not warnings/notes).
    error_count: usize,
    /// Whether the limit diagnostic was already pushed.
    limit_reported: bool,
    seen: FxHashSet<Diagnostic>,
    config: DiagnosticConfig,
}

impl DiagnosticQueue {
    /// Create a new diagnostic queue with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a diagnostic queue with custom configuration.
    pub fn with_config(config: DiagnosticConfig) -> Self {
        DiagnosticQueue {
            config,
            ..Self::default()
        }
    }

    /// Add a diagnostic at a known position.
    ///
    /// Returns `true` if the diagnostic was added, `false` if it was filtered.
    pub fn add(&mut self, diag: Diagnostic, line: u32, column: u32) -> bool {
        let is_error = diag.is_error();

        if is_error && self.limit_reached() {
            if !self.limit_reported {
                self.limit_reported = true;
                let limit = self.config.error_limit;
                let span = diag.primary_span().unwrap_or(Span::DUMMY);
                self.diagnostics.push(QueuedDiagnostic {
                    diagnostic: too_many_errors(limit, span),
                    line,
                    column,
                });
            }
            return false;
        }

        if self.config.deduplicate && !self.seen.insert(diag.clone()) {
            return false;
        }

        if is_error {
            self.error_count += 1;
        }

        self.diagnostics.push(QueuedDiagnostic {
            diagnostic: diag,
            line,
            column,
        });
        true
    }

    /// Add a diagnostic, computing its position from source text.
    ///
    /// Diagnostics without a primary span sort to the top of the file.
    pub fn add_with_source(
        &mut self,
        diag: Diagnostic,
        table: &LineOffsetTable,
        source: &str,
    ) -> bool {
        let (line, column) = diag
            .primary_span()
            .map_or((1, 1), |span| table.offset_to_line_col(source, span.start));
        self.add(diag, line, column)
    }

    /// Add every diagnostic in order, computing positions from source text.
    pub fn extend_with_source(
        &mut self,
        diags: impl IntoIterator<Item = Diagnostic>,
        source: &str,
    ) {
        let table = LineOffsetTable::build(source);
        for diag in diags {
            self.add_with_source(diag, &table, source);
        }
    }

    /// Check if the error limit has been reached.
    pub fn limit_reached(&self) -> bool {
        self.config.error_limit > 0 && self.error_count >= self.config.error_limit
    }

    /// Get the number of errors collected.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Sort diagnostics by position and return them, clearing the queue.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        // sort_by_key is stable: same-position diagnostics keep check order.
        self.diagnostics.sort_by_key(|d| (d.line, d.column));

        let result = self.diagnostics.drain(..).map(|d| d.diagnostic).collect();

        self.error_count = 0;
        self.limit_reported = false;
        self.seen.clear();

        result
    }
}

/// Create a "too many errors" diagnostic.
#[cold]
fn too_many_errors(limit: usize, span: Span) -> Diagnostic {
    Diagnostic::error(ErrorCode::E9002)
        .with_message(format!("aborting after {limit} errors"))
        .with_label(span, "error limit reached here")
        .with_note("use --error-limit=<n> to raise the limit, or 0 to report every error")
}

#[cfg(test)]
mod tests;
