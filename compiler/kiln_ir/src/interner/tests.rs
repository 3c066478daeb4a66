use super::*;
use pretty_assertions::assert_eq;
use rayon::prelude::*;

#[test]
fn interning_is_idempotent() {
    let interner = StringInterner::new();
    let a = interner.intern("TwoArgument");
    let b = interner.intern("TwoArgument");
    assert_eq!(a, b);
    assert_eq!(interner.lookup(a), "TwoArgument");
}

#[test]
fn distinct_strings_get_distinct_names() {
    let interner = StringInterner::new();
    assert_ne!(interner.intern("Encodable"), interner.intern("Decodable"));
}

#[test]
fn vocabulary_is_pre_interned() {
    let interner = StringInterner::new();
    assert!(interner.get("CodingKeys").is_some());
    assert!(interner.get("InvalidCodingKeys1").is_none());
}

#[test]
fn empty_string_is_name_empty() {
    let interner = StringInterner::new();
    assert_eq!(interner.intern(""), Name::EMPTY);
    assert_eq!(interner.lookup(Name::EMPTY), "");
}

#[test]
fn len_counts_new_strings_once() {
    let interner = StringInterner::new();
    let before = interner.len();
    interner.intern("Argument");
    interner.intern("Argument");
    assert_eq!(interner.len(), before + 1);
}

#[test]
fn concurrent_interning_converges() {
    let interner = SharedInterner::new();
    let names: Vec<Name> = (0..64)
        .into_par_iter()
        .map(|_| interner.intern("Integer"))
        .collect();
    assert!(names.windows(2).all(|w| w[0] == w[1]));
}
