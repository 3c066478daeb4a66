//! Turning synthesis failures into diagnostics.
//!
//! A failed requirement produces one top-level "does not conform" error at
//! the type, followed by one diagnostic per reason. Reasons about the keys
//! holder are notes attached to the holder; the empty-enum reason is an
//! error of its own at the type.

use kiln_diagnostic::{Diagnostic, ErrorCode};
use kiln_types::{DeclTable, TypeDecl};

use crate::{ConformanceResult, DerivableProtocolRequirement, DiagnosticReason, ReasonKind};

/// Diagnostics for one synthesis result. Empty when synthesis succeeded.
pub fn report(
    table: &DeclTable,
    decl: &TypeDecl,
    requirement: &DerivableProtocolRequirement,
    result: &ConformanceResult,
) -> Vec<Diagnostic> {
    let reasons = result.reasons();
    if reasons.is_empty() {
        return Vec::new();
    }

    let type_name = table.name(decl.id);
    let mut diagnostics = Vec::with_capacity(reasons.len() + 1);
    diagnostics.push(
        Diagnostic::error(ErrorCode::E2001)
            .with_message(format!(
                "type '{type_name}' does not conform to protocol '{}'",
                requirement.name()
            ))
            .with_label(decl.span, "conformance requested here"),
    );
    diagnostics.extend(
        reasons
            .iter()
            .map(|reason| reason_diagnostic(table, type_name, requirement, reason)),
    );
    diagnostics
}

/// Render a single reason.
pub fn reason_diagnostic(
    table: &DeclTable,
    type_name: &str,
    requirement: &DerivableProtocolRequirement,
    reason: &DiagnosticReason,
) -> Diagnostic {
    let protocol = requirement.name();
    let holder = requirement.keys_holder;
    let lookup = table.interner();

    let (message, label) = match reason.kind {
        ReasonKind::MissingKeysType => (
            format!(
                "cannot automatically synthesize '{protocol}' because no '{holder}' type \
                 is declared"
            ),
            "keys holder required here".to_owned(),
        ),
        ReasonKind::KeysNotEnum => (
            format!(
                "cannot automatically synthesize '{protocol}' because '{holder}' is not an enum"
            ),
            format!("'{holder}' declared here"),
        ),
        ReasonKind::KeysWrongProtocol => (
            format!(
                "cannot automatically synthesize '{protocol}' because '{holder}' does not \
                 conform to {}",
                requirement.key_protocol.name
            ),
            format!("'{holder}' declared here"),
        ),
        ReasonKind::EmptyEnumNoCases => (
            format!(
                "cannot automatically synthesize '{protocol}' conformance for empty enum \
                 '{type_name}'"
            ),
            "enum has no cases".to_owned(),
        ),
        ReasonKind::KeyNotFoundInMembers { key } => (
            format!(
                "{} case '{}' does not match any stored properties",
                requirement.key_protocol.name,
                lookup.lookup(key)
            ),
            "key declared here".to_owned(),
        ),
        ReasonKind::MemberNotInKeys { member } => (
            format!(
                "cannot automatically synthesize '{protocol}' because '{}' does not have a \
                 matching {} and does not have a default value",
                lookup.lookup(member),
                requirement.key_protocol.name
            ),
            "stored property declared here".to_owned(),
        ),
        ReasonKind::MemberNotConforming { member, ty } => (
            format!(
                "cannot automatically synthesize '{protocol}' because '{}' does not conform \
                 to '{protocol}'",
                table.name(ty)
            ),
            format!("'{}' declared here", lookup.lookup(member)),
        ),
    };

    let diag = if reason.kind == ReasonKind::EmptyEnumNoCases {
        Diagnostic::error(reason.code())
    } else {
        Diagnostic::note(reason.code())
    };
    diag.with_message(message).with_label(reason.span, label)
}

#[cfg(test)]
mod tests;
