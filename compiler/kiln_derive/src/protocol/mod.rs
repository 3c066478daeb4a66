//! Derivable protocols and their structural requirements.

use kiln_ir::StringLookup;
use kiln_types::{MemberSigKind, TypeDecl};

/// A protocol whose conformance can be synthesized from a type's shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DerivableProtocol {
    Decodable,
    Encodable,
}

impl DerivableProtocol {
    pub const ALL: [DerivableProtocol; 2] =
        [DerivableProtocol::Decodable, DerivableProtocol::Encodable];

    pub fn from_name(s: &str) -> Option<DerivableProtocol> {
        match s {
            "Decodable" => Some(DerivableProtocol::Decodable),
            "Encodable" => Some(DerivableProtocol::Encodable),
            _ => None,
        }
    }

    /// Protocols requested by one inheritance-clause entry.
    ///
    /// `Codable` is a composition and requests both halves.
    pub fn expand(s: &str) -> &'static [DerivableProtocol] {
        match s {
            "Codable" => &Self::ALL,
            "Decodable" => &[DerivableProtocol::Decodable],
            "Encodable" => &[DerivableProtocol::Encodable],
            _ => &[],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DerivableProtocol::Decodable => "Decodable",
            DerivableProtocol::Encodable => "Encodable",
        }
    }

    /// Whether every stored member needs a key unless it has a default value.
    ///
    /// Encoding may skip members; decoding must initialize all of them.
    pub fn requires_total_keys(self) -> bool {
        matches!(self, DerivableProtocol::Decodable)
    }

    /// Whether `decl` lists this protocol, directly or through `Codable`.
    pub fn is_declared_by<L: StringLookup + ?Sized>(self, decl: &TypeDecl, lookup: &L) -> bool {
        decl.conformances
            .iter()
            .any(|&name| Self::expand(lookup.lookup(name)).contains(&self))
    }
}

impl std::fmt::Display for DerivableProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The protocol a keys holder must satisfy, described by name and by the
/// members that satisfy it structurally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyProtocol {
    pub name: &'static str,
    pub required: &'static [(&'static str, MemberSigKind)],
}

impl KeyProtocol {
    pub const CODING_KEY: KeyProtocol = KeyProtocol {
        name: "CodingKey",
        required: &[
            ("stringValue", MemberSigKind::Property),
            ("intValue", MemberSigKind::Property),
            ("init(stringValue:)", MemberSigKind::Initializer),
            ("init(intValue:)", MemberSigKind::Initializer),
        ],
    };

    /// Whether `decl` declares the key protocol or provides every required member.
    pub fn is_satisfied_by<L: StringLookup + ?Sized>(&self, decl: &TypeDecl, lookup: &L) -> bool {
        let declared = decl
            .conformances
            .iter()
            .any(|&name| lookup.lookup(name) == self.name);
        declared || self.missing_members(decl, lookup).next().is_none()
    }

    /// Required members `decl` does not provide, in declaration order.
    pub fn missing_members<'a, L: StringLookup + ?Sized>(
        &'a self,
        decl: &'a TypeDecl,
        lookup: &'a L,
    ) -> impl Iterator<Item = &'static str> + 'a {
        self.required.iter().filter_map(move |&(name, kind)| {
            let present = decl
                .interface
                .iter()
                .any(|sig| sig.kind == kind && lookup.lookup(sig.name) == name);
            (!present).then_some(name)
        })
    }
}

/// One derivable protocol together with how its keys holder is found.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DerivableProtocolRequirement {
    pub protocol: DerivableProtocol,
    /// Name of the nested declaration holding the coding keys.
    pub keys_holder: &'static str,
    pub key_protocol: KeyProtocol,
    /// Whether an absent keys holder is synthesized from the type's members.
    pub can_default_keys: bool,
}

impl DerivableProtocolRequirement {
    pub fn new(protocol: DerivableProtocol) -> Self {
        DerivableProtocolRequirement {
            protocol,
            keys_holder: "CodingKeys",
            key_protocol: KeyProtocol::CODING_KEY,
            can_default_keys: true,
        }
    }

    /// Require an explicit keys holder.
    #[must_use]
    pub fn without_default_keys(mut self) -> Self {
        self.can_default_keys = false;
        self
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.protocol.name()
    }
}

#[cfg(test)]
mod tests;
