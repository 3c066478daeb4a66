use super::*;
use crate::{DerivableProtocol, KeyProtocol};
use kiln_ir::SharedInterner;
use kiln_types::{DeclId, DeclSpec};
use pretty_assertions::assert_eq;

fn outer(table: &mut DeclTable) -> DeclId {
    let main = table.intern("Main");
    table
        .declare(main, DeclSpec::enumeration(table.intern("Outer")))
        .unwrap()
}

fn outcomes(
    table: &DeclTable,
    decl: DeclId,
    requirement: &DerivableProtocolRequirement,
) -> Vec<PredicateOutcome> {
    let decl = table.get(decl).unwrap();
    let candidate = KeysCandidate::find(table, decl, requirement);
    KEY_PREDICATES
        .iter()
        .map(|p| p.evaluate(&candidate, requirement, table.interner()))
        .collect()
}

#[test]
fn absent_holder_defaults() {
    let mut table = DeclTable::new(SharedInterner::new());
    let id = outer(&mut table);
    let req = DerivableProtocolRequirement::new(DerivableProtocol::Decodable);
    assert_eq!(
        outcomes(&table, id, &req),
        vec![
            PredicateOutcome::Holds,
            PredicateOutcome::NotApplicable,
            PredicateOutcome::NotApplicable,
        ]
    );
    assert_eq!(
        outcomes(&table, id, &req.without_default_keys())[0],
        PredicateOutcome::Fails(ReasonKind::MissingKeysType)
    );
}

#[test]
fn value_binding_is_not_an_enum() {
    let mut table = DeclTable::new(SharedInterner::new());
    let id = outer(&mut table);
    table
        .declare_value(id, table.intern("CodingKeys"), Span::new(40, 61))
        .unwrap();
    let req = DerivableProtocolRequirement::new(DerivableProtocol::Encodable);

    let decl = table.get(id).unwrap();
    let candidate = KeysCandidate::find(&table, decl, &req);
    assert_eq!(candidate.span(), Some(Span::new(40, 61)));
    assert_eq!(
        outcomes(&table, id, &req),
        vec![
            PredicateOutcome::Holds,
            PredicateOutcome::Fails(ReasonKind::KeysNotEnum),
            PredicateOutcome::NotApplicable,
        ]
    );
}

#[test]
fn conforming_struct_is_still_not_an_enum() {
    let mut table = DeclTable::new(SharedInterner::new());
    let id = outer(&mut table);
    table
        .declare_nested(
            id,
            DeclSpec::structure(table.intern("CodingKeys"))
                .conforming_to(table.intern("CodingKey")),
        )
        .unwrap();
    let req = DerivableProtocolRequirement::new(DerivableProtocol::Decodable);
    assert_eq!(
        outcomes(&table, id, &req)[1..].to_vec(),
        vec![
            PredicateOutcome::Fails(ReasonKind::KeysNotEnum),
            PredicateOutcome::NotApplicable,
        ]
    );
}

#[test]
fn plain_enum_fails_key_protocol() {
    let mut table = DeclTable::new(SharedInterner::new());
    let id = outer(&mut table);
    table
        .declare_nested(id, DeclSpec::enumeration(table.intern("CodingKeys")))
        .unwrap();
    let req = DerivableProtocolRequirement::new(DerivableProtocol::Decodable);
    assert_eq!(
        outcomes(&table, id, &req)[2],
        PredicateOutcome::Fails(ReasonKind::KeysWrongProtocol)
    );
}

#[test]
fn structural_key_enum_is_valid() {
    let mut table = DeclTable::new(SharedInterner::new());
    let id = outer(&mut table);
    let mut keys = DeclSpec::enumeration(table.intern("CodingKeys")).with_case(table.intern("a"));
    for &(name, kind) in KeyProtocol::CODING_KEY.required {
        keys = keys.with_member(table.intern(name), kind);
    }
    let keys = table.declare_nested(id, keys).unwrap();

    let req = DerivableProtocolRequirement::new(DerivableProtocol::Decodable);
    assert!(outcomes(&table, id, &req)
        .iter()
        .all(|o| *o == PredicateOutcome::Holds));

    let decl = table.get(id).unwrap();
    let candidate = KeysCandidate::find(&table, decl, &req);
    assert_eq!(
        candidate.as_key_enum(&req, table.interner()).map(|d| d.id),
        Some(keys)
    );
}
