//! Metadata records produced by the planner.

use std::sync::Arc;

use bitflags::bitflags;
use kiln_types::{BoundType, Layout, TargetInfo};
use smallvec::SmallVec;

/// Metadata kind stored in the record's second word.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MetadataKind {
    Struct,
    Enum,
}

impl MetadataKind {
    /// Raw kind value as emitted.
    pub const fn value(self) -> u64 {
        match self {
            MetadataKind::Struct => 0x200,
            MetadataKind::Enum => 0x201,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MetadataKind::Struct => "struct",
            MetadataKind::Enum => "enum",
        }
    }
}

/// Whether a record is shared build-time data or a runtime instantiation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SizeClass {
    /// Emitted once at build time; all uses share one address.
    Canonical,
    /// Canonicalized by the runtime on first use.
    Instantiated,
}

impl SizeClass {
    /// The weaker of two classes: any instantiated part makes the whole instantiated.
    #[must_use]
    pub fn join(self, other: SizeClass) -> SizeClass {
        match (self, other) {
            (SizeClass::Canonical, SizeClass::Canonical) => SizeClass::Canonical,
            _ => SizeClass::Instantiated,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SizeClass::Canonical => "canonical",
            SizeClass::Instantiated => "instantiated",
        }
    }
}

bitflags! {
    /// Flags in the trailing word of a specialized record.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct TrailingFlags: u64 {
        /// The record was built at compile time.
        const STATIC_SPECIALIZATION = 1 << 0;
        /// The record is the canonical metadata for its instantiation.
        const CANONICAL_STATIC_SPECIALIZATION = 1 << 1;
    }
}

/// A value witness table, shared by every instantiation of a generic type
/// that has the same layout.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ValueWitnessTable {
    pub symbol: String,
    pub layout: Layout,
}

/// One argument slot per generic parameter.
pub type ArgumentRefs = SmallVec<[Arc<MetadataDescriptor>; 4]>;

/// A planned metadata record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetadataDescriptor {
    /// The instantiation this record describes.
    pub ty: BoundType,
    pub symbol: String,
    pub target: TargetInfo,
    pub kind: MetadataKind,
    pub size_class: SizeClass,
    pub value_witnesses: Arc<ValueWitnessTable>,
    /// Symbol of the nominal type descriptor.
    pub type_descriptor: String,
    pub argument_references: ArgumentRefs,
    pub flags: TrailingFlags,
    /// Byte offset of each stored field, in declaration order.
    pub field_offsets: Vec<u32>,
    /// Word index of the first field offset in the record.
    pub offset_to_first_field: usize,
    /// Words after the argument slots: the field offset vector, padded to a
    /// word, plus the trailing flags if present.
    pub extra_data_words: usize,
    /// Layout of values of this type.
    pub layout: Layout,
}

/// Words before the argument slots: witness table, kind, type descriptor.
pub(crate) const HEADER_WORDS: usize = 3;

impl MetadataDescriptor {
    #[inline]
    pub fn is_canonical(&self) -> bool {
        self.size_class == SizeClass::Canonical
    }

    #[inline]
    pub fn argument_count(&self) -> usize {
        self.argument_references.len()
    }

    #[inline]
    pub fn required_alignment(&self) -> u32 {
        self.layout.align
    }

    /// Whether the record ends with a trailing flags word.
    #[inline]
    pub fn has_trailing_flags(&self) -> bool {
        !self.flags.is_empty()
    }

    /// Total record size in words.
    pub fn record_words(&self) -> usize {
        HEADER_WORDS + self.argument_count() + self.extra_data_words
    }
}

/// Words taken by a `u32` field offset vector on `target`, padded to a word.
pub(crate) fn field_offset_words(fields: usize, target: TargetInfo) -> usize {
    let per_word = usize::try_from(target.pointer_size() / 4).unwrap_or(1).max(1);
    fields.div_ceil(per_word)
}

/// Words taken by the 64-bit trailing flags on `target`.
pub(crate) fn trailing_flag_words(target: TargetInfo) -> usize {
    usize::try_from(8 / target.pointer_size()).unwrap_or(1).max(1)
}

#[cfg(test)]
mod tests;
