//! Value layouts of aggregates.
//!
//! Struct fields are placed in declaration order, each at the next offset
//! aligned for it. Enums use spare bit patterns of a single payload when
//! there are enough, and otherwise append a tag.

use kiln_types::{align_to, Layout};

/// Layout of a struct with the given field layouts, and each field's byte offset.
pub(crate) fn struct_layout(fields: &[Layout]) -> (Layout, Vec<u64>) {
    let mut offsets = Vec::with_capacity(fields.len());
    let mut size = 0u64;
    let mut align = 1u32;
    let mut extra_inhabitants = 0u32;

    for field in fields {
        let offset = align_to(size, field.align);
        offsets.push(offset);
        size = offset + field.size;
        align = align.max(field.align);
        extra_inhabitants = extra_inhabitants.max(field.extra_inhabitants);
    }

    let layout = Layout::new(size, align).with_extra_inhabitants(extra_inhabitants);
    (layout, offsets)
}

/// Bytes needed for a tag distinguishing `states` values.
pub(crate) fn tag_bytes(states: u64) -> u64 {
    match states {
        0..=1 => 0,
        2..=0x100 => 1,
        0x101..=0x1_0000 => 2,
        _ => 4,
    }
}

/// Spare values of a tag of `bytes` bytes once `used` values are taken.
fn spare_tag_values(bytes: u64, used: u64) -> u32 {
    if bytes == 0 {
        return 0;
    }
    let total = 1u64 << (8 * bytes.min(4));
    u32::try_from(total.saturating_sub(used)).unwrap_or(u32::MAX)
}

/// Layout of an enum with `empty_cases` cases without payload and one
/// payload layout per case that carries values.
pub(crate) fn enum_layout(empty_cases: usize, payloads: &[Layout]) -> Layout {
    let empty = empty_cases as u64;

    match payloads {
        [] => {
            let bytes = tag_bytes(empty);
            if bytes == 0 {
                return Layout::EMPTY;
            }
            #[expect(clippy::cast_possible_truncation, reason = "tag is at most 4 bytes")]
            let align = bytes as u32;
            Layout::new(bytes, align).with_extra_inhabitants(spare_tag_values(bytes, empty))
        }
        [payload] => {
            if empty <= u64::from(payload.extra_inhabitants) {
                #[expect(clippy::cast_possible_truncation, reason = "bounded by a u32 count")]
                let left = payload.extra_inhabitants - empty as u32;
                return payload.with_extra_inhabitants(left);
            }
            let bytes = tag_bytes(empty + 1);
            Layout::new(payload.size + bytes, payload.align)
                .with_extra_inhabitants(spare_tag_values(bytes, empty + 1))
        }
        _ => {
            let cases = empty + payloads.len() as u64;
            let bytes = tag_bytes(cases);
            let size = payloads.iter().map(|p| p.size).max().unwrap_or(0);
            let align = payloads.iter().map(|p| p.align).max().unwrap_or(1);
            Layout::new(size + bytes, align).with_extra_inhabitants(spare_tag_values(bytes, cases))
        }
    }
}
