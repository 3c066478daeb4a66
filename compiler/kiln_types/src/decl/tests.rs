use super::*;
use kiln_ir::StringInterner;
use pretty_assertions::assert_eq;

#[test]
fn type_ref_head_looks_through_indirection() {
    let decl = DeclId::from_raw(3);
    assert_eq!(TypeRef::named(decl).head(), Some(decl));
    assert_eq!(TypeRef::indirect(TypeRef::named(decl)).head(), Some(decl));
    assert_eq!(TypeRef::Param(0).head(), None);
    assert!(TypeRef::Param(1).is_param());
}

#[test]
fn builtin_spec_is_public() {
    let interner = StringInterner::new();
    let spec = DeclSpec::builtin(interner.intern("Int"), ScalarLayout::Word);
    assert_eq!(spec.visibility, Visibility::Public);
    assert!(spec.kind.is_builtin());
}

#[test]
fn default_visibility_is_internal() {
    let interner = StringInterner::new();
    let spec = DeclSpec::structure(interner.intern("Point"));
    assert_eq!(spec.visibility, Visibility::Internal);
    assert!(!spec.visibility.is_exported());
    assert!(Visibility::Public.is_exported());
}

#[test]
fn spec_builder_keeps_declaration_order() {
    let interner = StringInterner::new();
    let a = interner.intern("a");
    let b = interner.intern("b");
    let spec = DeclSpec::enumeration(interner.intern("Keys"))
        .with_case(b)
        .with_case(a);
    let names: Vec<_> = spec.cases.iter().map(|c| c.name).collect();
    assert_eq!(names, vec![b, a]);
}

#[test]
fn kind_names() {
    assert_eq!(DeclKind::Struct.as_str(), "struct");
    assert_eq!(DeclKind::Enum.as_str(), "enum");
    assert_eq!(DeclKind::Builtin(ScalarLayout::Word).as_str(), "builtin");
}
