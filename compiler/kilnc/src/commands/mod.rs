//! Command handlers for the Kiln CLI.
//!
//! Each submodule implements one command. Commands write results to
//! `Streams::out` and diagnostics to `Streams::err`, and return the number
//! of errors reported so that the binary can choose its exit status.

use std::io::Write;
use std::path::Path;

use kiln_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
use kiln_diagnostic::{Diagnostic, DiagnosticConfig, DiagnosticQueue, Severity};
use kiln_metadata::PlannerConfig;

use crate::manifest::Program;
use crate::{DriverError, Options};

mod check;
mod emit_ir;
mod explain;
mod plan;

pub use check::check;
pub use emit_ir::emit_ir;
pub use explain::explain;
pub use plan::plan;

/// Output destinations of a command.
pub struct Streams<'a> {
    pub out: &'a mut dyn Write,
    pub err: &'a mut dyn Write,
    pub color: ColorMode,
    pub is_tty: bool,
}

impl<'a> Streams<'a> {
    /// Plain streams, as used by tests.
    pub fn plain(out: &'a mut dyn Write, err: &'a mut dyn Write) -> Self {
        Streams {
            out,
            err,
            color: ColorMode::Never,
            is_tty: false,
        }
    }
}

/// Apply command-line overrides to a loaded program.
pub fn apply_options(program: &mut Program, options: &Options) {
    if let Some(target) = options.target {
        program.target = target;
    }
    if let Some(module) = &options.module {
        program.module = program.table.intern(module);
    }
}

pub(crate) fn planner_config(program: &Program, options: &Options) -> PlannerConfig {
    PlannerConfig::for_module(program.module)
        .with_target(program.target)
        .with_max_depth(options.max_depth)
}

/// Sort, deduplicate and print `diagnostics`, returning the error count.
///
/// At most `options.error_limit` errors are printed, followed by one note
/// that the rest were dropped.
pub(crate) fn emit_diagnostics(
    program: &Program,
    options: &Options,
    diagnostics: Vec<Diagnostic>,
    streams: &mut Streams<'_>,
) -> usize {
    if diagnostics.is_empty() {
        return 0;
    }
    let mut queue = DiagnosticQueue::with_config(DiagnosticConfig {
        error_limit: options.error_limit,
        ..DiagnosticConfig::default()
    });
    queue.extend_with_source(diagnostics, &program.source);
    let errors = queue.error_count();
    let sorted = queue.flush();
    let warnings = sorted
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();

    let mut emitter =
        TerminalEmitter::with_color_mode(&mut *streams.err, streams.color, streams.is_tty)
            .with_source(program.path.display().to_string(), program.source.as_str());
    emitter.emit_all(&sorted);
    emitter.emit_summary(errors, warnings);
    emitter.flush();
    errors
}

/// Print a failure that stopped the driver, returning the error count.
///
/// Declaration errors carry spans into the manifest and are rendered as
/// diagnostics against it when the manifest can be re-read.
pub fn report_failure(
    path: &Path,
    error: DriverError,
    streams: &mut Streams<'_>,
) -> Result<usize, DriverError> {
    match error {
        DriverError::Declaration(decl) => {
            let source = std::fs::read_to_string(path).unwrap_or_default();
            let mut emitter =
                TerminalEmitter::with_color_mode(&mut *streams.err, streams.color, streams.is_tty)
                    .with_source(path.display().to_string(), source.as_str());
            emitter.emit(&decl.into_diagnostic());
            emitter.emit_summary(1, 0);
            emitter.flush();
        }
        other => {
            writeln!(streams.err, "error: {other}").map_err(DriverError::Output)?;
        }
    }
    Ok(1)
}

pub(crate) fn write_out(streams: &mut Streams<'_>, text: &str) -> Result<(), DriverError> {
    streams.out.write_all(text.as_bytes()).map_err(DriverError::Output)
}
