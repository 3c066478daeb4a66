//! Value layouts and target parameters.
//!
//! Only builtin leaves carry a layout in the table. Aggregate layouts are
//! computed by the metadata planner from their fields, using these helpers.

use std::fmt;

/// Target parameters that affect layout.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TargetInfo {
    pointer_width: u32,
}

impl TargetInfo {
    pub const BITS_64: TargetInfo = TargetInfo { pointer_width: 64 };
    pub const BITS_32: TargetInfo = TargetInfo { pointer_width: 32 };

    /// Target with the given pointer width in bits. Only 32 and 64 are supported.
    pub fn from_pointer_width(bits: u32) -> Option<Self> {
        match bits {
            32 => Some(Self::BITS_32),
            64 => Some(Self::BITS_64),
            _ => None,
        }
    }

    #[inline]
    pub fn pointer_width(self) -> u32 {
        self.pointer_width
    }

    /// Pointer size in bytes.
    #[inline]
    pub fn pointer_size(self) -> u64 {
        u64::from(self.pointer_width / 8)
    }

    /// Pointer alignment in bytes.
    #[inline]
    pub fn pointer_align(self) -> u32 {
        self.pointer_width / 8
    }

    /// Number of invalid bit patterns of a heap pointer on this target.
    pub fn pointer_extra_inhabitants(self) -> u32 {
        if self.pointer_width == 64 {
            0x7fff_ffff
        } else {
            4096
        }
    }

    /// Layout of a single pointer.
    pub fn pointer_layout(self) -> Layout {
        Layout {
            size: self.pointer_size(),
            align: self.pointer_align(),
            extra_inhabitants: self.pointer_extra_inhabitants(),
        }
    }
}

impl Default for TargetInfo {
    fn default() -> Self {
        Self::BITS_64
    }
}

/// Size, alignment and spare bit patterns of a value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Layout {
    /// Size in bytes, not rounded up to alignment.
    pub size: u64,
    /// Alignment in bytes; always a power of two.
    pub align: u32,
    pub extra_inhabitants: u32,
}

impl Layout {
    /// Layout of a type with no stored data.
    pub const EMPTY: Layout = Layout {
        size: 0,
        align: 1,
        extra_inhabitants: 0,
    };

    pub const fn new(size: u64, align: u32) -> Self {
        Layout {
            size,
            align,
            extra_inhabitants: 0,
        }
    }

    #[must_use]
    pub const fn with_extra_inhabitants(mut self, count: u32) -> Self {
        self.extra_inhabitants = count;
        self
    }

    /// Distance between consecutive elements in an array; never zero.
    pub fn stride(&self) -> u64 {
        align_to(self.size, self.align).max(1)
    }

    /// Whether values fit in a fixed-size inline buffer of three words.
    pub fn is_inline(&self, target: TargetInfo) -> bool {
        self.size <= 3 * target.pointer_size() && self.align <= target.pointer_align()
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "size {} align {} stride {}",
            self.size,
            self.align,
            self.stride()
        )
    }
}

/// Round `value` up to a multiple of `align`.
#[inline]
pub fn align_to(value: u64, align: u32) -> u64 {
    let align = u64::from(align.max(1));
    value.div_ceil(align) * align
}

/// Layout description of a builtin leaf, resolved against a target.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScalarLayout {
    /// A machine word, like `Int`.
    Word,
    /// A heap reference, with the target's spare pointer values.
    Pointer,
    /// A fixed layout independent of the target.
    Fixed(Layout),
}

impl ScalarLayout {
    pub fn resolve(self, target: TargetInfo) -> Layout {
        match self {
            ScalarLayout::Word => Layout::new(target.pointer_size(), target.pointer_align()),
            ScalarLayout::Pointer => target.pointer_layout(),
            ScalarLayout::Fixed(layout) => layout,
        }
    }
}
