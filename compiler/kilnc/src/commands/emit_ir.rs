//! The `emit-ir` command: print the build-time records and access sequences
//! of every requested instantiation.

use kiln_ir::StringLookup;
use kiln_metadata::render::{render_access, render_module};
use kiln_metadata::{CanonicalCache, Planner};

use super::{emit_diagnostics, planner_config, write_out, Streams};
use crate::manifest::Program;
use crate::{DriverError, Options};

/// Render IR for every request in `program`.
///
/// Records come first, deduplicated and ordered by symbol, followed by one
/// commented access sequence per request.
pub fn emit_ir(
    program: &Program,
    options: &Options,
    cache: &CanonicalCache,
    streams: &mut Streams<'_>,
) -> Result<usize, DriverError> {
    let planner = Planner::with_cache(&program.table, planner_config(program, options), cache);

    let mut accesses = Vec::with_capacity(program.requests.len());
    let mut diagnostics = Vec::new();
    for (text, ty) in &program.requests {
        match planner.access(ty) {
            Ok(access) => accesses.push((text.as_str(), access)),
            Err(err) => diagnostics.push(err.into_diagnostic()),
        }
    }
    let errors = emit_diagnostics(program, options, diagnostics, streams);

    let module = program.table.interner().lookup(program.module).to_owned();
    let mut ir = format!(
        "; module {module}, {}-bit target\n",
        program.target.pointer_width()
    );
    ir.push_str(&render_module(accesses.iter().map(|(_, access)| access.descriptor())));
    for (text, access) in &accesses {
        ir.push_str("\n; ");
        ir.push_str(text);
        ir.push('\n');
        ir.push_str(&render_access(access));
        ir.push('\n');
    }
    write_out(streams, &ir)?;
    Ok(errors)
}
