use super::*;
use kiln_ir::StringLookup;
use kiln_types::NestedKind;
use pretty_assertions::assert_eq;

const TWO_ARGUMENT: &str = r#"{
  "module": "Main",
  "declarations": [
    { "module": "Argument", "name": "Integer", "kind": "builtin", "layout": "word" },
    { "module": "Argument", "name": "Half", "kind": "builtin",
      "layout": { "size": 2, "align": 2 } },
    { "module": "Argument", "name": "TwoArgument", "kind": "struct", "visibility": "public",
      "generics": ["First", "Second"],
      "fields": [{ "name": "first", "type": "First" }, { "name": "second", "type": "Second" }] },
    { "name": "List", "kind": "enum", "generics": ["T"],
      "cases": [{ "name": "empty" }, { "name": "cons", "payload": ["T", "indirect List<T>"] }] }
  ],
  "plan": ["Argument.TwoArgument<Argument.Integer, Argument.Half>"]
}"#;

fn build_str(text: &str) -> Result<Program, DriverError> {
    let path = Path::new("test.json");
    let manifest = Manifest::parse(path, text)?;
    build(path, text.to_owned(), &manifest)
}

#[test]
fn parses_type_expressions() {
    let ty = parse_type("Argument.Pair< Int , indirect List<Int> >").unwrap();
    assert_eq!(ty.to_string(), "Argument.Pair<Int, indirect List<Int>>");
    assert!(parse_type("Pair<Int").is_err());
    assert!(parse_type("Pair<Int>>").is_err());
    assert!(parse_type("").is_err());
}

#[test]
fn builds_declarations_and_requests() {
    let program = build_str(TWO_ARGUMENT).unwrap();
    let table = &program.table;
    assert_eq!(table.len(), 4);
    assert_eq!(program.target, TargetInfo::BITS_64);

    let two = table.lookup_qualified("Argument.TwoArgument").unwrap();
    let decl = table.get(two).unwrap();
    assert_eq!(decl.visibility, Visibility::Public);
    assert_eq!(decl.stored[1].ty, TypeRef::Param(1));

    let half = table.lookup_qualified("Argument.Half").unwrap();
    let (text, request) = &program.requests[0];
    assert_eq!(text, "Argument.TwoArgument<Argument.Integer, Argument.Half>");
    assert_eq!(request.decl, two);
    assert_eq!(request.args[1], BoundType::leaf(half));
}

#[test]
fn self_reference_through_indirection() {
    let program = build_str(TWO_ARGUMENT).unwrap();
    let list = program.table.lookup_qualified("Main.List").unwrap();
    let cons = &program.table.get(list).unwrap().cases[1];
    assert_eq!(
        cons.payload[1],
        TypeRef::indirect(TypeRef::applied(list, vec![TypeRef::Param(0)]))
    );
}

#[test]
fn spans_point_at_declaration_names() {
    let program = build_str(TWO_ARGUMENT).unwrap();
    let two = program.table.lookup_qualified("Argument.TwoArgument").unwrap();
    let span = program.table.get(two).unwrap().span;
    assert_eq!(
        &program.source[span.start as usize..span.end as usize],
        "\"TwoArgument\""
    );
}

#[test]
fn nested_values_and_types() {
    let text = r#"{
      "module": "Main",
      "declarations": [
        { "name": "A", "kind": "enum", "conforms": ["Codable"],
          "nested": [{ "value": "CodingKeys" }] },
        { "name": "B", "kind": "enum", "conforms": ["Codable"],
          "nested": [{ "name": "CodingKeys", "kind": "struct", "conforms": ["CodingKey"] }] }
      ]
    }"#;
    let program = build_str(text).unwrap();
    let table = &program.table;
    let a = table.get(table.lookup_qualified("Main.A").unwrap()).unwrap();
    assert_eq!(a.nested[0].kind, NestedKind::Value);
    assert_eq!(table.interner().lookup(a.nested[0].name), "CodingKeys");

    let keys = table.lookup_qualified("Main.B.CodingKeys").unwrap();
    let b = table.get(table.lookup_qualified("Main.B").unwrap()).unwrap();
    assert_eq!(b.nested[0].kind, NestedKind::Type(keys));
}

#[test]
fn nested_names_resolve_in_enclosing_scope() {
    let text = r#"{
      "module": "Main",
      "declarations": [
        { "name": "Outer", "kind": "struct",
          "nested": [
            { "name": "Inner", "kind": "struct" },
            { "name": "User", "kind": "struct", "fields": [{ "name": "x", "type": "Inner" }] }
          ] }
      ]
    }"#;
    let program = build_str(text).unwrap();
    let table = &program.table;
    let inner = table.lookup_qualified("Main.Outer.Inner").unwrap();
    let user = table.get(table.lookup_qualified("Main.Outer.User").unwrap()).unwrap();
    assert_eq!(user.stored[0].ty, TypeRef::named(inner));
}

#[test]
fn unknown_type_is_reported() {
    let text = r#"{ "module": "Main", "declarations": [
        { "name": "S", "kind": "struct", "fields": [{ "name": "x", "type": "Missing" }] } ] }"#;
    let Err(DriverError::Manifest(message)) = build_str(text) else {
        panic!("expected a manifest error");
    };
    assert_eq!(message, "unknown type `Missing` in `S`");
}

#[test]
fn unsupported_target() {
    let text = r#"{ "module": "Main", "target": 16, "declarations": [] }"#;
    assert!(matches!(build_str(text), Err(DriverError::Manifest(_))));
}

#[test]
fn unknown_keys_are_rejected() {
    let text = r#"{ "module": "Main", "declarations": [], "extra": 1 }"#;
    assert!(matches!(build_str(text), Err(DriverError::Json { .. })));
}

#[test]
fn duplicate_declarations_fail() {
    let text = r#"{ "module": "Main", "declarations": [
        { "name": "S", "kind": "struct" }, { "name": "S", "kind": "struct" } ] }"#;
    assert!(matches!(build_str(text), Err(DriverError::Declaration(_))));
}

#[test]
fn dotted_module_names_fail() {
    let text = r#"{ "module": "Main", "declarations": [
        { "module": "Lib.Sub", "name": "S", "kind": "struct" } ] }"#;
    let Err(DriverError::Declaration(err)) = build_str(text) else {
        panic!("expected a declaration error");
    };
    assert_eq!(err.code(), kiln_diagnostic::ErrorCode::E1004);
}

#[test]
fn builtin_requires_layout() {
    let text = r#"{ "module": "Main", "declarations": [{ "name": "Int", "kind": "builtin" }] }"#;
    assert!(matches!(build_str(text), Err(DriverError::Manifest(_))));
}
