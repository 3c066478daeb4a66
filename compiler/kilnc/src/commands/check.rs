//! The `check` command: run every requested conformance synthesis.

use kiln_derive::report::report;
use kiln_derive::{synthesize_all, ConformanceResult};
use kiln_ir::StringLookup;
use serde::Serialize;

use super::{emit_diagnostics, write_out, Streams};
use crate::manifest::Program;
use crate::{DriverError, Options};

#[derive(Serialize)]
struct CheckEntry<'a> {
    #[serde(rename = "type")]
    ty: String,
    protocol: &'static str,
    synthesized: bool,
    keys: Vec<&'a str>,
    reasons: Vec<&'static str>,
}

/// Check every derivable-protocol requirement in `program`.
///
/// Failures are reported as diagnostics; the return value is the number of
/// errors.
pub fn check(
    program: &Program,
    options: &Options,
    streams: &mut Streams<'_>,
) -> Result<usize, DriverError> {
    let table = &program.table;
    let results = synthesize_all(table);

    let mut diagnostics = Vec::new();
    let mut entries = Vec::with_capacity(results.len());
    for (id, requirement, result) in &results {
        let Some(decl) = table.get(*id) else {
            continue;
        };
        diagnostics.extend(report(table, decl, requirement, result));
        entries.push(CheckEntry {
            ty: table.qualified_name(*id),
            protocol: requirement.name(),
            synthesized: result.is_synthesized(),
            keys: match result {
                ConformanceResult::Synthesized(synthesis) => synthesis
                    .keys
                    .iter()
                    .map(|key| table.interner().lookup(*key))
                    .collect(),
                ConformanceResult::Failed(_) => Vec::new(),
            },
            reasons: result.reasons().iter().map(|r| r.message_key()).collect(),
        });
    }

    let errors = emit_diagnostics(program, options, diagnostics, streams);

    if options.json {
        let json = serde_json::to_string_pretty(&entries)
            .map_err(|e| DriverError::Output(std::io::Error::other(e)))?;
        write_out(streams, &json)?;
        write_out(streams, "\n")?;
    } else {
        let failed = entries.iter().filter(|e| !e.synthesized).count();
        write_out(
            streams,
            &format!(
                "checked {} requirement(s): {} synthesized, {failed} failed\n",
                entries.len(),
                entries.len() - failed
            ),
        )?;
    }
    Ok(errors)
}
