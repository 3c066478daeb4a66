//! Stack growth for deeply nested instantiations.
//!
//! Planning recurses once per generic argument and stored field. The depth
//! limit bounds the recursion, but a generous limit can still exceed the
//! default thread stack, so each level runs behind `stacker::maybe_grow`.

/// Grow the stack when less than this remains.
const RED_ZONE: usize = 100 * 1024;

/// Stack allocated per growth.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first growing the stack if it is close to exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
