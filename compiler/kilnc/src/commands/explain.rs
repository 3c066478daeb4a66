//! The `explain` command: print the documentation for an error code.


use kiln_diagnostic::{ErrorCode, ErrorDocs};

use super::{write_out, Streams};
use crate::DriverError;

/// Print the documentation for `code_str`, returning 1 if it has none.
pub fn explain(code_str: &str, streams: &mut Streams<'_>) -> Result<usize, DriverError> {
    let Ok(code) = code_str.parse::<ErrorCode>() else {
        writeln!(streams.err, "Unknown error code: {code_str}")
            .and_then(|()| writeln!(streams.err, "Codes have the format EXXXX where X is a digit."))
            .and_then(|()| writeln!(streams.err, "Examples: E1001, E2003, E3001"))
            .map_err(DriverError::Output)?;
        return Ok(1);
    };

    match ErrorDocs::get(code) {
        Some(doc) => {
            write_out(streams, doc)?;
            if !doc.ends_with('\n') {
                write_out(streams, "\n")?;
            }
            Ok(0)
        }
        None => {
            writeln!(streams.err, "No documentation available for {code}")
                .map_err(DriverError::Output)?;
            Ok(1)
        }
    }
}
