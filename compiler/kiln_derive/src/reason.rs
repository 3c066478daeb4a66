//! Structured reasons a synthesis failed.

use kiln_diagnostic::ErrorCode;
use kiln_ir::{Name, Span};
use kiln_types::DeclId;

/// Which structural requirement was not met.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReasonKind {
    /// No keys holder is declared and the requirement cannot default one.
    MissingKeysType,
    /// The keys holder is a value binding, a struct or some other non-enum.
    KeysNotEnum,
    /// The keys holder is an enum that does not satisfy the key protocol.
    KeysWrongProtocol,
    /// The type is an enum without cases.
    EmptyEnumNoCases,
    /// A key case names no stored member.
    KeyNotFoundInMembers { key: Name },
    /// A stored member without a default value has no key.
    MemberNotInKeys { member: Name },
    /// A member's type does not conform to the protocol being synthesized.
    MemberNotConforming { member: Name, ty: DeclId },
}

impl ReasonKind {
    /// Stable identifier for the message template of this reason.
    pub fn message_key(&self) -> &'static str {
        match self {
            ReasonKind::MissingKeysType => "codable.missing_keys_type",
            ReasonKind::KeysNotEnum => "codable.keys_not_enum",
            ReasonKind::KeysWrongProtocol => "codable.keys_wrong_protocol",
            ReasonKind::EmptyEnumNoCases => "codable.empty_enum",
            ReasonKind::KeyNotFoundInMembers { .. } => "codable.key_not_found",
            ReasonKind::MemberNotInKeys { .. } => "codable.member_not_in_keys",
            ReasonKind::MemberNotConforming { .. } => "codable.member_not_conforming",
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ReasonKind::MissingKeysType => ErrorCode::E2002,
            ReasonKind::KeysNotEnum => ErrorCode::E2003,
            ReasonKind::KeysWrongProtocol => ErrorCode::E2004,
            ReasonKind::EmptyEnumNoCases => ErrorCode::E2005,
            ReasonKind::KeyNotFoundInMembers { .. } => ErrorCode::E2006,
            ReasonKind::MemberNotInKeys { .. } => ErrorCode::E2007,
            ReasonKind::MemberNotConforming { .. } => ErrorCode::E2008,
        }
    }

    /// Whether the reason is about the keys holder rather than the type itself.
    pub fn concerns_keys(&self) -> bool {
        matches!(
            self,
            ReasonKind::MissingKeysType | ReasonKind::KeysNotEnum | ReasonKind::KeysWrongProtocol
        )
    }
}

/// A failed requirement attached to the declaration that caused it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DiagnosticReason {
    pub kind: ReasonKind,
    pub span: Span,
}

impl DiagnosticReason {
    #[inline]
    pub fn new(kind: ReasonKind, span: Span) -> Self {
        DiagnosticReason { kind, span }
    }

    #[inline]
    pub fn message_key(&self) -> &'static str {
        self.kind.message_key()
    }

    #[inline]
    pub fn code(&self) -> ErrorCode {
        self.kind.code()
    }
}
