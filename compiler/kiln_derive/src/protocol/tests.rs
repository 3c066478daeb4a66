use super::*;
use kiln_ir::SharedInterner;
use kiln_types::{DeclSpec, DeclTable};
use pretty_assertions::assert_eq;

#[test]
fn from_name_and_expand() {
    assert_eq!(
        DerivableProtocol::from_name("Decodable"),
        Some(DerivableProtocol::Decodable)
    );
    assert_eq!(DerivableProtocol::from_name("Codable"), None);
    assert_eq!(
        DerivableProtocol::expand("Codable"),
        &[DerivableProtocol::Decodable, DerivableProtocol::Encodable]
    );
    assert_eq!(
        DerivableProtocol::expand("Encodable"),
        &[DerivableProtocol::Encodable]
    );
    assert!(DerivableProtocol::expand("Hashable").is_empty());
}

#[test]
fn only_decoding_requires_total_keys() {
    assert!(DerivableProtocol::Decodable.requires_total_keys());
    assert!(!DerivableProtocol::Encodable.requires_total_keys());
}

#[test]
fn codable_declares_both_halves() {
    let mut table = DeclTable::new(SharedInterner::new());
    let main = table.intern("Main");
    let id = table
        .declare(
            main,
            DeclSpec::structure(table.intern("S")).conforming_to(table.intern("Codable")),
        )
        .unwrap();
    let decl = table.get(id).unwrap();
    for protocol in DerivableProtocol::ALL {
        assert!(protocol.is_declared_by(decl, table.interner()));
    }
}

#[test]
fn key_protocol_by_declaration_or_shape() {
    let mut table = DeclTable::new(SharedInterner::new());
    let main = table.intern("Main");

    let declared = table
        .declare(
            main,
            DeclSpec::enumeration(table.intern("A")).conforming_to(table.intern("CodingKey")),
        )
        .unwrap();

    let mut shaped = DeclSpec::enumeration(table.intern("B"));
    for &(name, kind) in KeyProtocol::CODING_KEY.required {
        shaped = shaped.with_member(table.intern(name), kind);
    }
    let shaped = table.declare(main, shaped).unwrap();

    let partial = table
        .declare(
            main,
            DeclSpec::enumeration(table.intern("C"))
                .with_member(table.intern("stringValue"), MemberSigKind::Property)
                .with_member(table.intern("intValue"), MemberSigKind::Method),
        )
        .unwrap();

    let key = KeyProtocol::CODING_KEY;
    let lookup = table.interner();
    assert!(key.is_satisfied_by(table.get(declared).unwrap(), lookup));
    assert!(key.is_satisfied_by(table.get(shaped).unwrap(), lookup));
    assert!(!key.is_satisfied_by(table.get(partial).unwrap(), lookup));

    let missing: Vec<_> = key
        .missing_members(table.get(partial).unwrap(), lookup)
        .collect();
    assert_eq!(
        missing,
        vec!["intValue", "init(stringValue:)", "init(intValue:)"]
    );
}

#[test]
fn requirement_defaults() {
    let req = DerivableProtocolRequirement::new(DerivableProtocol::Encodable);
    assert_eq!(req.keys_holder, "CodingKeys");
    assert_eq!(req.key_protocol.name, "CodingKey");
    assert!(req.can_default_keys);
    assert!(!req.without_default_keys().can_default_keys);
    assert_eq!(req.name(), "Encodable");
}
