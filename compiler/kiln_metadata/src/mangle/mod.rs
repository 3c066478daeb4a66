//! Symbol mangling for metadata records.
//!
//! Every record the planner produces has a stable linker name, so that
//! identical instantiations planned anywhere agree on one symbol.
//!
//! # Mangling Scheme
//!
//! ```text
//! _kn_<module>$<type>[$G<arg>$_<arg>...$E]<suffix>
//! ```
//!
//! | Suffix | Record |
//! |--------|--------|
//! | `$Mn` | nominal type descriptor |
//! | `$N` | metadata of a non-generic type |
//! | `$MN` | prespecialized metadata of an instantiation |
//! | `$MJ` | caching token of an instantiation |
//! | `$WV` | value witness table |
//!
//! Arguments are mangled recursively without the prefix. A generic type's
//! witness table is keyed by layout (`$L<size>_<align>_<xi>`) rather than by
//! arguments, so instantiations of one generic type with the same
//! representation share it.
//!
//! `Argument.Integer` mangles to `_kn_Argument$Integer$N`, and
//! `Argument.TwoArgument<Integer, Integer>` to
//! `_kn_Argument$TwoArgument$GArgument$Integer$_Argument$Integer$E$MN`.

use std::fmt::Write;

use kiln_ir::StringLookup;
use kiln_types::{BoundType, DeclId, DeclTable, Layout};

/// Prefix of every Kiln metadata symbol.
pub const MANGLE_PREFIX: &str = "_kn_";

/// Separator between path components.
const PATH_SEP: char = '$';

const GENERIC_OPEN: &str = "$G";
const ARG_SEP: &str = "$_";
const GENERIC_CLOSE: &str = "$E";

#[derive(Debug, Clone, Copy, Default)]
pub struct Mangler;

impl Mangler {
    #[must_use]
    pub fn new() -> Self {
        Mangler
    }

    /// Mangled path of a declaration without prefix or suffix.
    pub fn type_path(&self, table: &DeclTable, decl: DeclId) -> String {
        let mut out = String::with_capacity(32);
        self.write_path(&mut out, table, decl);
        out
    }

    /// Nominal type descriptor of a declaration.
    pub fn type_descriptor(&self, table: &DeclTable, decl: DeclId) -> String {
        self.prefixed(|out| self.write_path(out, table, decl), "$Mn")
    }

    /// Metadata record of an instantiation: `$N` for non-generic types,
    /// `$MN` for specializations.
    pub fn metadata(&self, table: &DeclTable, ty: &BoundType) -> String {
        let suffix = if ty.args.is_empty() { "$N" } else { "$MN" };
        self.prefixed(|out| self.write_bound(out, table, ty), suffix)
    }

    /// Caching token the runtime uses to memoize canonicalization.
    pub fn caching_token(&self, table: &DeclTable, ty: &BoundType) -> String {
        self.prefixed(|out| self.write_bound(out, table, ty), "$MJ")
    }

    /// Value witness table for `ty` with the given layout.
    pub fn value_witnesses(&self, table: &DeclTable, ty: &BoundType, layout: Layout) -> String {
        self.prefixed(
            |out| {
                self.write_path(out, table, ty.decl);
                if !ty.args.is_empty() {
                    let _ = write!(
                        out,
                        "$L{}_{}_{}",
                        layout.size, layout.align, layout.extra_inhabitants
                    );
                }
            },
            "$WV",
        )
    }

    fn prefixed(&self, body: impl FnOnce(&mut String), suffix: &str) -> String {
        let mut out = String::with_capacity(64);
        out.push_str(MANGLE_PREFIX);
        body(&mut out);
        out.push_str(suffix);
        out
    }

    fn write_path(&self, out: &mut String, table: &DeclTable, decl: DeclId) {
        let Some(entry) = table.get(decl) else {
            out.push_str("$unknown");
            return;
        };
        match entry.parent {
            Some(parent) => self.write_path(out, table, parent),
            // Module names are identifiers, so they never contain `PATH_SEP`.
            None => self.encode_identifier(out, table.interner().lookup(entry.module)),
        }
        out.push(PATH_SEP);
        self.encode_identifier(out, table.interner().lookup(entry.name));
    }

    fn write_bound(&self, out: &mut String, table: &DeclTable, ty: &BoundType) {
        self.write_path(out, table, ty.decl);
        if ty.args.is_empty() {
            return;
        }
        out.push_str(GENERIC_OPEN);
        for (i, arg) in ty.args.iter().enumerate() {
            if i > 0 {
                out.push_str(ARG_SEP);
            }
            self.write_bound(out, table, arg);
        }
        out.push_str(GENERIC_CLOSE);
    }

    // Alphanumerics and '_' pass through, a few characters get named escapes
    // and everything else is hex-escaped.

    #[inline]
    fn encode_char_hex(out: &mut String, c: char) {
        let _ = write!(out, "${:02x}", c as u32);
    }

    #[allow(clippy::unused_self)]
    fn encode_identifier(&self, out: &mut String, name: &str) {
        for c in name.chars() {
            match c {
                c if c.is_alphanumeric() || c == '_' => out.push(c),
                '<' => out.push_str("$LT"),
                '>' => out.push_str("$GT"),
                ',' => out.push_str("$C"),
                '(' => out.push_str("$LP"),
                ')' => out.push_str("$RP"),
                ':' => out.push_str("$CC"),
                '-' => out.push_str("$D"),
                _ => Self::encode_char_hex(out, c),
            }
        }
    }
}

#[cfg(test)]
mod tests;
