use super::*;
use crate::{synthesize, DerivableProtocol};
use kiln_diagnostic::Severity;
use kiln_ir::{SharedInterner, Span};
use kiln_types::{DeclId, DeclSpec};
use pretty_assertions::assert_eq;

fn invalid_coding_keys1() -> (DeclTable, DeclId) {
    let mut table = DeclTable::new(SharedInterner::new());
    let main = table.intern("Main");
    let id = table
        .declare(
            main,
            DeclSpec::enumeration(table.intern("InvalidCodingKeys1"))
                .conforming_to(table.intern("Codable"))
                .at(Span::new(0, 40)),
        )
        .unwrap();
    table
        .declare_value(id, table.intern("CodingKeys"), Span::new(44, 69))
        .unwrap();
    (table, id)
}

#[test]
fn failed_requirement_reports_error_then_reasons() {
    let (table, id) = invalid_coding_keys1();
    let decl = table.get(id).unwrap();
    let req = DerivableProtocolRequirement::new(DerivableProtocol::Decodable);
    let result = synthesize(&table, decl, &req);

    let diags = report(&table, decl, &req, &result);
    let messages: Vec<_> = diags.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "type 'InvalidCodingKeys1' does not conform to protocol 'Decodable'",
            "cannot automatically synthesize 'Decodable' because 'CodingKeys' is not an enum",
            "cannot automatically synthesize 'Decodable' conformance for empty enum \
             'InvalidCodingKeys1'",
        ]
    );

    assert_eq!(diags[0].code, ErrorCode::E2001);
    assert_eq!(diags[0].severity, Severity::Error);
    assert_eq!(diags[1].severity, Severity::Note);
    assert_eq!(diags[1].primary_span(), Some(Span::new(44, 69)));
    assert_eq!(diags[2].code, ErrorCode::E2005);
    assert_eq!(diags[2].severity, Severity::Error);
    assert_eq!(diags[2].primary_span(), Some(Span::new(0, 40)));
}

#[test]
fn each_requirement_is_reported_separately() {
    let (table, id) = invalid_coding_keys1();
    let decl = table.get(id).unwrap();
    let encodable = DerivableProtocolRequirement::new(DerivableProtocol::Encodable);
    let result = synthesize(&table, decl, &encodable);
    let diags = report(&table, decl, &encodable, &result);

    assert_eq!(
        diags[0].message,
        "type 'InvalidCodingKeys1' does not conform to protocol 'Encodable'"
    );
    assert!(diags.iter().skip(1).all(|d| d.message.contains("'Encodable'")));
}

#[test]
fn synthesized_result_reports_nothing() {
    let mut table = DeclTable::new(SharedInterner::new());
    let main = table.intern("Main");
    let id = table
        .declare(
            main,
            DeclSpec::enumeration(table.intern("E"))
                .conforming_to(table.intern("Codable"))
                .with_case(table.intern("a")),
        )
        .unwrap();
    let decl = table.get(id).unwrap();
    let req = DerivableProtocolRequirement::new(DerivableProtocol::Encodable);
    let result = synthesize(&table, decl, &req);
    assert!(report(&table, decl, &req, &result).is_empty());
}

#[test]
fn wrong_protocol_note_names_key_protocol() {
    let mut table = DeclTable::new(SharedInterner::new());
    let main = table.intern("Main");
    let id = table
        .declare(main, DeclSpec::enumeration(table.intern("InvalidCodingKeys2")))
        .unwrap();
    let req = DerivableProtocolRequirement::new(DerivableProtocol::Encodable);
    let reason = DiagnosticReason::new(ReasonKind::KeysWrongProtocol, Span::new(1, 2));
    let diag = reason_diagnostic(&table, table.name(id), &req, &reason);
    assert_eq!(
        diag.message,
        "cannot automatically synthesize 'Encodable' because 'CodingKeys' does not conform \
         to CodingKey"
    );
    assert_eq!(diag.code, ErrorCode::E2004);
}
