use super::*;
use pretty_assertions::assert_eq;

#[test]
fn kind_values() {
    assert_eq!(MetadataKind::Struct.value(), 512);
    assert_eq!(MetadataKind::Enum.value(), 0x201);
}

#[test]
fn size_class_join() {
    use SizeClass::{Canonical, Instantiated};
    assert_eq!(Canonical.join(Canonical), Canonical);
    assert_eq!(Canonical.join(Instantiated), Instantiated);
    assert_eq!(Instantiated.join(Canonical), Instantiated);
}

#[test]
fn trailing_flag_bits() {
    let canonical =
        TrailingFlags::STATIC_SPECIALIZATION | TrailingFlags::CANONICAL_STATIC_SPECIALIZATION;
    assert_eq!(TrailingFlags::STATIC_SPECIALIZATION.bits(), 1);
    assert_eq!(canonical.bits(), 3);
}

#[test]
fn field_offset_vector_is_word_padded() {
    let t64 = TargetInfo::BITS_64;
    let t32 = TargetInfo::BITS_32;
    assert_eq!(field_offset_words(0, t64), 0);
    assert_eq!(field_offset_words(1, t64), 1);
    assert_eq!(field_offset_words(2, t64), 1);
    assert_eq!(field_offset_words(3, t64), 2);
    assert_eq!(field_offset_words(3, t32), 3);
}

#[test]
fn trailing_flags_take_one_64_bit_slot() {
    assert_eq!(trailing_flag_words(TargetInfo::BITS_64), 1);
    assert_eq!(trailing_flag_words(TargetInfo::BITS_32), 2);
}
