use super::*;
use kiln_ir::SharedInterner;
use kiln_types::{DeclSpec, ScalarLayout, Visibility};
use pretty_assertions::assert_eq;

struct Fixture {
    table: DeclTable,
    integer: DeclId,
    two: DeclId,
}

fn fixture() -> Fixture {
    let mut table = DeclTable::new(SharedInterner::new());
    let argument = table.intern("Argument");
    let integer = table
        .declare(
            argument,
            DeclSpec::builtin(table.intern("Integer"), ScalarLayout::Word),
        )
        .unwrap();
    let two = table
        .declare(
            argument,
            DeclSpec::structure(table.intern("TwoArgument"))
                .with_generic(table.intern("First"))
                .with_generic(table.intern("Second"))
                .with_visibility(Visibility::Public),
        )
        .unwrap();
    Fixture {
        table,
        integer,
        two,
    }
}

#[test]
fn leaf_symbols() {
    let f = fixture();
    let m = Mangler::new();
    let leaf = BoundType::leaf(f.integer);
    assert_eq!(m.metadata(&f.table, &leaf), "_kn_Argument$Integer$N");
    assert_eq!(m.type_descriptor(&f.table, f.integer), "_kn_Argument$Integer$Mn");
    assert_eq!(
        m.value_witnesses(&f.table, &leaf, Layout::new(8, 8)),
        "_kn_Argument$Integer$WV"
    );
}

#[test]
fn specialization_symbols() {
    let f = fixture();
    let m = Mangler::new();
    let ty = BoundType::new(
        f.two,
        vec![BoundType::leaf(f.integer), BoundType::leaf(f.integer)],
    );
    assert_eq!(
        m.metadata(&f.table, &ty),
        "_kn_Argument$TwoArgument$GArgument$Integer$_Argument$Integer$E$MN"
    );
    assert_eq!(
        m.caching_token(&f.table, &ty),
        "_kn_Argument$TwoArgument$GArgument$Integer$_Argument$Integer$E$MJ"
    );
    assert_eq!(m.type_descriptor(&f.table, f.two), "_kn_Argument$TwoArgument$Mn");
}

#[test]
fn nested_arguments_are_bracketed() {
    let f = fixture();
    let m = Mangler::new();
    let inner = BoundType::new(
        f.two,
        vec![BoundType::leaf(f.integer), BoundType::leaf(f.integer)],
    );
    let a = BoundType::new(f.two, vec![inner.clone(), BoundType::leaf(f.integer)]);
    let b = BoundType::new(f.two, vec![BoundType::leaf(f.integer), inner]);
    assert_ne!(m.metadata(&f.table, &a), m.metadata(&f.table, &b));
}

#[test]
fn witness_tables_are_keyed_by_layout() {
    let f = fixture();
    let m = Mangler::new();
    let ty = BoundType::new(
        f.two,
        vec![BoundType::leaf(f.integer), BoundType::leaf(f.integer)],
    );
    assert_eq!(
        m.value_witnesses(&f.table, &ty, Layout::new(16, 8)),
        "_kn_Argument$TwoArgument$L16_8_0$WV"
    );
}

#[test]
fn special_characters_are_escaped() {
    let mut table = DeclTable::new(SharedInterner::new());
    let module = table.intern("data_utils");
    let id = table
        .declare(module, DeclSpec::structure(table.intern("Ünïcode-x")))
        .unwrap();
    assert_eq!(
        Mangler::new().type_path(&table, id),
        "data_utils$Ünïcode$Dx"
    );
}

#[test]
fn nested_declarations_include_parent() {
    let mut table = DeclTable::new(SharedInterner::new());
    let main = table.intern("Main");
    let outer = table
        .declare(main, DeclSpec::structure(table.intern("Outer")))
        .unwrap();
    let inner = table
        .declare_nested(outer, DeclSpec::structure(table.intern("Inner")))
        .unwrap();
    assert_eq!(Mangler::new().type_path(&table, inner), "Main$Outer$Inner");
}

#[test]
fn dotted_module_cannot_alias_a_nested_type() {
    let mut table = DeclTable::new(SharedInterner::new());
    let a = table.intern("A");
    let b = table
        .declare(a, DeclSpec::structure(table.intern("B")))
        .unwrap();
    let nested = table
        .declare_nested(b, DeclSpec::structure(table.intern("C")))
        .unwrap();
    assert_eq!(
        Mangler::new().metadata(&table, &BoundType::leaf(nested)),
        "_kn_A$B$C$N"
    );

    let dotted = table.intern("A.B");
    assert!(table
        .declare(dotted, DeclSpec::structure(table.intern("C")))
        .is_err());
    assert_eq!(table.len(), 2);
}

#[test]
fn witness_tables_are_not_shared_across_declarations() {
    let mut f = fixture();
    let argument = f.table.intern("Argument");
    let other = f
        .table
        .declare(
            argument,
            DeclSpec::structure(f.table.intern("OtherPair"))
                .with_generic(f.table.intern("A"))
                .with_generic(f.table.intern("B")),
        )
        .unwrap();
    let int = || BoundType::leaf(f.integer);
    let m = Mangler::new();
    let layout = Layout::new(16, 8);
    let two = m.value_witnesses(&f.table, &BoundType::new(f.two, vec![int(), int()]), layout);
    let pair = m.value_witnesses(&f.table, &BoundType::new(other, vec![int(), int()]), layout);
    assert_ne!(two, pair);
    assert_eq!(pair, "_kn_Argument$OtherPair$L16_8_0$WV");
}
