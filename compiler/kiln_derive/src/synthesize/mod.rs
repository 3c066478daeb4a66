//! The synthesis query.

use kiln_ir::{Name, Span, StringLookup};
use kiln_types::{DeclId, DeclTable, TypeDecl, TypeRef};

use crate::predicate::{KeysCandidate, PredicateOutcome, KEY_PREDICATES};
use crate::{DerivableProtocol, DerivableProtocolRequirement, DiagnosticReason, ReasonKind};

/// A successful synthesis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Synthesis {
    /// Coding keys in declaration order.
    pub keys: Vec<Name>,
    /// The keys were derived from the type's members rather than declared.
    pub defaulted_keys: bool,
}

/// Answer to one (declaration, requirement) query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConformanceResult {
    Synthesized(Synthesis),
    /// Never empty; reasons appear in the order the checks ran.
    Failed(Vec<DiagnosticReason>),
}

impl ConformanceResult {
    #[inline]
    pub fn is_synthesized(&self) -> bool {
        matches!(self, ConformanceResult::Synthesized(_))
    }

    pub fn reasons(&self) -> &[DiagnosticReason] {
        match self {
            ConformanceResult::Synthesized(_) => &[],
            ConformanceResult::Failed(reasons) => reasons,
        }
    }

    /// Reason kinds without locations, for matching against expectations.
    pub fn reason_kinds(&self) -> Vec<ReasonKind> {
        self.reasons().iter().map(|r| r.kind).collect()
    }
}

/// A coding key with the location that introduced it.
#[derive(Copy, Clone, Debug)]
struct Key {
    name: Name,
    span: Span,
}

/// Decide whether `decl` can have `requirement` synthesized.
///
/// Checks run in a fixed order and never stop early: keys-holder predicates,
/// then key/member agreement and member conformance (only against a usable
/// set of keys), then the empty-enum check.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(decl = %table.name(decl.id), protocol = requirement.name())
)]
pub fn synthesize(
    table: &DeclTable,
    decl: &TypeDecl,
    requirement: &DerivableProtocolRequirement,
) -> ConformanceResult {
    let lookup = table.interner();
    let candidate = KeysCandidate::find(table, decl, requirement);
    let holder_span = candidate.span().unwrap_or(decl.span);
    let mut reasons = Vec::new();

    for predicate in KEY_PREDICATES {
        if let PredicateOutcome::Fails(kind) = predicate.evaluate(&candidate, requirement, lookup) {
            let span = match kind {
                ReasonKind::MissingKeysType => decl.span,
                _ => holder_span,
            };
            push_reason(&mut reasons, kind, span);
        }
    }

    let keys = if let Some(holder) = candidate.as_key_enum(requirement, lookup) {
        let keys: Vec<_> = holder
            .cases
            .iter()
            .map(|case| Key {
                name: case.name,
                span: case.span,
            })
            .collect();
        Some((keys, false))
    } else if matches!(candidate, KeysCandidate::Absent) && requirement.can_default_keys {
        Some((default_keys(decl), true))
    } else {
        None
    };

    if let Some((keys, defaulted)) = &keys {
        if decl.kind.is_struct() && !defaulted {
            check_key_agreement(decl, keys, requirement.protocol, &mut reasons);
        }
        check_member_conformance(table, decl, keys, requirement.protocol, &mut reasons);
    }

    if decl.kind.is_enum() && decl.cases.is_empty() {
        push_reason(&mut reasons, ReasonKind::EmptyEnumNoCases, decl.span);
    }

    if reasons.is_empty() {
        let (keys, defaulted_keys) = keys.unwrap_or_default();
        tracing::debug!(keys = keys.len(), defaulted_keys, "synthesized");
        ConformanceResult::Synthesized(Synthesis {
            keys: keys.into_iter().map(|k| k.name).collect(),
            defaulted_keys,
        })
    } else {
        tracing::debug!(reasons = reasons.len(), "synthesis failed");
        ConformanceResult::Failed(reasons)
    }
}

fn push_reason(reasons: &mut Vec<DiagnosticReason>, kind: ReasonKind, span: Span) {
    let reason = DiagnosticReason::new(kind, span);
    if !reasons.contains(&reason) {
        tracing::trace!(reason = reason.message_key(), "appending reason");
        reasons.push(reason);
    }
}

/// Keys implied by the type's shape: stored members for structs, cases for enums.
fn default_keys(decl: &TypeDecl) -> Vec<Key> {
    if decl.kind.is_enum() {
        decl.cases
            .iter()
            .map(|c| Key {
                name: c.name,
                span: c.span,
            })
            .collect()
    } else {
        decl.stored
            .iter()
            .map(|m| Key {
                name: m.name,
                span: m.span,
            })
            .collect()
    }
}

fn check_key_agreement(
    decl: &TypeDecl,
    keys: &[Key],
    protocol: DerivableProtocol,
    reasons: &mut Vec<DiagnosticReason>,
) {
    for key in keys {
        if decl.stored_named(key.name).is_none() {
            push_reason(reasons, ReasonKind::KeyNotFoundInMembers { key: key.name }, key.span);
        }
    }

    if protocol.requires_total_keys() {
        for member in &decl.stored {
            let keyed = keys.iter().any(|k| k.name == member.name);
            if !keyed && !member.has_default {
                push_reason(
                    reasons,
                    ReasonKind::MemberNotInKeys {
                        member: member.name,
                    },
                    member.span,
                );
            }
        }
    }
}

/// Every keyed member's type must itself conform to the protocol.
fn check_member_conformance(
    table: &DeclTable,
    decl: &TypeDecl,
    keys: &[Key],
    protocol: DerivableProtocol,
    reasons: &mut Vec<DiagnosticReason>,
) {
    let keyed = |name: Name| keys.iter().any(|k| k.name == name);

    let members = decl
        .stored
        .iter()
        .filter(|m| keyed(m.name))
        .map(|m| (m.name, &m.ty, m.span))
        .chain(
            decl.cases
                .iter()
                .filter(|c| keyed(c.name))
                .flat_map(|c| c.payload.iter().map(move |ty| (c.name, ty, c.span))),
        );

    for (member, ty, span) in members {
        if let Some(offender) = first_nonconforming(table, ty, protocol) {
            push_reason(
                reasons,
                ReasonKind::MemberNotConforming {
                    member,
                    ty: offender,
                },
                span,
            );
        }
    }
}

/// The first declaration in `ty` that does not list `protocol`.
///
/// Generic parameters are assumed to conform; the constraint is checked
/// where the type is instantiated.
fn first_nonconforming(
    table: &DeclTable,
    ty: &TypeRef,
    protocol: DerivableProtocol,
) -> Option<DeclId> {
    match ty {
        TypeRef::Param(_) => None,
        TypeRef::Indirect(inner) => first_nonconforming(table, inner, protocol),
        TypeRef::Named { decl, args } => {
            let declared = table
                .get(*decl)
                .is_some_and(|target| protocol.is_declared_by(target, table.interner()));
            if declared {
                args.iter()
                    .find_map(|arg| first_nonconforming(table, arg, protocol))
            } else {
                Some(*decl)
            }
        }
    }
}

/// Requirements a declaration asks for through its inheritance clause.
pub fn requested_requirements<L: StringLookup + ?Sized>(
    decl: &TypeDecl,
    lookup: &L,
) -> Vec<DerivableProtocolRequirement> {
    DerivableProtocol::ALL
        .into_iter()
        .filter(|p| p.is_declared_by(decl, lookup))
        .map(DerivableProtocolRequirement::new)
        .collect()
}

/// Run every requested synthesis in the table, in declaration order.
pub fn synthesize_all(
    table: &DeclTable,
) -> Vec<(DeclId, DerivableProtocolRequirement, ConformanceResult)> {
    table
        .iter()
        .filter(|decl| !decl.kind.is_builtin())
        .flat_map(move |decl| {
            requested_requirements(decl, table.interner())
                .into_iter()
                .map(move |req| (decl.id, req, synthesize(table, decl, &req)))
        })
        .collect()
}
