//! Structural predicates over the keys holder.
//!
//! Each predicate states its own precondition on the candidate, so the list
//! can be evaluated in full without short-circuiting: a predicate whose
//! precondition is unmet reports `NotApplicable` instead of piling a second
//! reason onto the same root cause.

use kiln_ir::{Span, StringLookup};
use kiln_types::{DeclTable, NestedKind, TypeDecl};

use crate::{DerivableProtocolRequirement, ReasonKind};

/// What the lookup of the keys holder name found.
#[derive(Clone, Copy, Debug)]
pub enum KeysCandidate<'a> {
    /// Nothing with the keys holder name is nested in the type.
    Absent,
    /// A non-type binding, e.g. `static let CodingKeys = 5`.
    Value { span: Span },
    /// A nested type declaration.
    Type(&'a TypeDecl),
}

impl<'a> KeysCandidate<'a> {
    /// Look up the keys holder nested in `decl`.
    pub fn find(
        table: &'a DeclTable,
        decl: &TypeDecl,
        requirement: &DerivableProtocolRequirement,
    ) -> Self {
        let lookup = table.interner();
        let Some(member) = decl
            .nested
            .iter()
            .find(|m| lookup.lookup(m.name) == requirement.keys_holder)
        else {
            return KeysCandidate::Absent;
        };
        match member.kind {
            NestedKind::Value => KeysCandidate::Value { span: member.span },
            NestedKind::Type(id) => match table.get(id) {
                Some(holder) => KeysCandidate::Type(holder),
                // Tables never hand out dangling nested ids; treat one as a value.
                None => KeysCandidate::Value { span: member.span },
            },
        }
    }

    /// Span of the keys holder, if one is declared.
    pub fn span(&self) -> Option<Span> {
        match self {
            KeysCandidate::Absent => None,
            KeysCandidate::Value { span } => Some(*span),
            KeysCandidate::Type(decl) => Some(decl.span),
        }
    }

    /// The holder as a valid key enum, if it is one.
    pub fn as_key_enum<L: StringLookup + ?Sized>(
        &self,
        requirement: &DerivableProtocolRequirement,
        lookup: &L,
    ) -> Option<&'a TypeDecl> {
        match self {
            KeysCandidate::Type(holder)
                if holder.kind.is_enum()
                    && requirement.key_protocol.is_satisfied_by(holder, lookup) =>
            {
                Some(holder)
            }
            _ => None,
        }
    }
}

/// Outcome of one predicate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PredicateOutcome {
    Holds,
    Fails(ReasonKind),
    NotApplicable,
}

/// A structural requirement on the keys holder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyPredicate {
    /// A holder is declared, or the requirement can synthesize one.
    Exists,
    /// A declared holder is an enum.
    IsEnum,
    /// A holder enum declares or structurally satisfies the key protocol.
    ConformsToKeyProtocol,
}

/// Predicates in reporting order.
pub const KEY_PREDICATES: &[KeyPredicate] = &[
    KeyPredicate::Exists,
    KeyPredicate::IsEnum,
    KeyPredicate::ConformsToKeyProtocol,
];

impl KeyPredicate {
    pub fn evaluate<L: StringLookup + ?Sized>(
        self,
        candidate: &KeysCandidate<'_>,
        requirement: &DerivableProtocolRequirement,
        lookup: &L,
    ) -> PredicateOutcome {
        match (self, candidate) {
            (KeyPredicate::Exists, KeysCandidate::Absent) => {
                if requirement.can_default_keys {
                    PredicateOutcome::Holds
                } else {
                    PredicateOutcome::Fails(ReasonKind::MissingKeysType)
                }
            }
            (KeyPredicate::Exists, _) => PredicateOutcome::Holds,

            (KeyPredicate::IsEnum, KeysCandidate::Absent) => PredicateOutcome::NotApplicable,
            (KeyPredicate::IsEnum, KeysCandidate::Value { .. }) => {
                PredicateOutcome::Fails(ReasonKind::KeysNotEnum)
            }
            (KeyPredicate::IsEnum, KeysCandidate::Type(holder)) => {
                if holder.kind.is_enum() {
                    PredicateOutcome::Holds
                } else {
                    PredicateOutcome::Fails(ReasonKind::KeysNotEnum)
                }
            }

            (KeyPredicate::ConformsToKeyProtocol, KeysCandidate::Type(holder))
                if holder.kind.is_enum() =>
            {
                if requirement.key_protocol.is_satisfied_by(holder, lookup) {
                    PredicateOutcome::Holds
                } else {
                    PredicateOutcome::Fails(ReasonKind::KeysWrongProtocol)
                }
            }
            (KeyPredicate::ConformsToKeyProtocol, _) => PredicateOutcome::NotApplicable,
        }
    }
}

#[cfg(test)]
mod tests;
