//! Kiln IR - shared leaf types for the Kiln compiler.
//!
//! - Spans for source locations
//! - Names for interned identifiers
//! - A sharded string interner usable from parallel compilation units
//!
//! Every type here is `Clone + Eq + Hash + Debug` so it can key caches and
//! flow through query results unchanged.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod interner;
mod name;
mod span;

pub use interner::{InternError, SharedInterner, StringInterner, StringLookup};
pub use name::Name;
pub use span::Span;
