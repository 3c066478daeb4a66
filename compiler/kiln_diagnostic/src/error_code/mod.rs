//! Error codes for all compiler diagnostics.
//!
//! Each error code is a unique identifier (e.g., `E2003`) whose first digit
//! names the phase that produced it. Used for `kiln explain` lookups.

use std::fmt;

/// Error codes for all compiler diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E1xxx: Declaration table errors
/// - E2xxx: Conformance synthesis errors
/// - E3xxx: Metadata planning errors
/// - E9xxx: Internal compiler errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Declaration Errors (E1xxx)
    /// Duplicate declaration in a module
    E1001,
    /// Reference to an undeclared type
    E1002,
    /// Generic parameter index out of range
    E1003,
    /// Module name is not an identifier
    E1004,

    // Synthesis Errors (E2xxx)
    /// Type does not conform to a derivable protocol
    E2001,
    /// Keys holder is missing and cannot be defaulted
    E2002,
    /// Keys holder is not an enum
    E2003,
    /// Keys holder does not conform to the key protocol
    E2004,
    /// Conformance cannot be synthesized for an empty enum
    E2005,
    /// Key case does not match any stored member
    E2006,
    /// Stored member has no key and no default value
    E2007,
    /// Stored member type does not conform to the protocol
    E2008,

    // Metadata Errors (E3xxx)
    /// Generic argument count mismatch
    E3001,
    /// Generic nesting depth limit exceeded
    E3002,
    /// Type contains itself without indirection
    E3003,

    // Internal Errors (E9xxx)
    /// Internal compiler error
    E9001,
    /// Too many errors
    E9002,
}

impl ErrorCode {
    /// All error codes, in declaration order.
    pub const ALL: &'static [ErrorCode] = &[
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E1004,
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E2005,
        ErrorCode::E2006,
        ErrorCode::E2007,
        ErrorCode::E2008,
        ErrorCode::E3001,
        ErrorCode::E3002,
        ErrorCode::E3003,
        ErrorCode::E9001,
        ErrorCode::E9002,
    ];

    /// Get the string representation of this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
        }
    }

    /// Short human-readable description of this error code.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "duplicate declaration",
            ErrorCode::E1002 => "unknown declaration",
            ErrorCode::E1003 => "generic parameter index out of range",
            ErrorCode::E1004 => "invalid module name",
            ErrorCode::E2001 => "type does not conform to derivable protocol",
            ErrorCode::E2002 => "missing keys holder",
            ErrorCode::E2003 => "keys holder is not an enum",
            ErrorCode::E2004 => "keys holder does not conform to key protocol",
            ErrorCode::E2005 => "cannot synthesize conformance for empty enum",
            ErrorCode::E2006 => "key does not match any stored member",
            ErrorCode::E2007 => "stored member has no matching key",
            ErrorCode::E2008 => "stored member type does not conform",
            ErrorCode::E3001 => "generic argument count mismatch",
            ErrorCode::E3002 => "generic nesting depth limit exceeded",
            ErrorCode::E3003 => "infinitely sized type",
            ErrorCode::E9001 => "internal compiler error",
            ErrorCode::E9002 => "too many errors",
        }
    }

    /// Check if this is a declaration table error (E1xxx range).
    pub fn is_declaration_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::E1001 | ErrorCode::E1002 | ErrorCode::E1003 | ErrorCode::E1004
        )
    }

    /// Check if this is a conformance synthesis error (E2xxx range).
    pub fn is_synthesis_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::E2001
                | ErrorCode::E2002
                | ErrorCode::E2003
                | ErrorCode::E2004
                | ErrorCode::E2005
                | ErrorCode::E2006
                | ErrorCode::E2007
                | ErrorCode::E2008
        )
    }

    /// Check if this is a metadata planning error (E3xxx range).
    pub fn is_metadata_error(&self) -> bool {
        matches!(self, ErrorCode::E3001 | ErrorCode::E3002 | ErrorCode::E3003)
    }

    /// Check if this is an internal compiler error (E9xxx range).
    pub fn is_internal_error(&self) -> bool {
        matches!(self, ErrorCode::E9001 | ErrorCode::E9002)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse an error code string like `"E2003"`. Case-insensitive.
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Self::ALL
            .iter()
            .find(|code| code.as_str() == upper)
            .copied()
            .ok_or(())
    }
}

#[cfg(test)]
mod tests;
