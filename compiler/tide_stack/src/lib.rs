//! Stack safety for deep resolution.
//!
//! Nested generic syntax (`Box<Box<Box<...>>>`), long expression chains,
//! deeply nested blocks and chains of instantiations all recurse through
//! the resolver. Each recursive entry point runs under
//! [`ensure_sufficient_stack`], which grows the stack on native targets and
//! is a passthrough on wasm32.

/// Headroom required before a recursive step (100KB).
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment (1MB).
const SEGMENT: usize = 1024 * 1024;

/// Run `f`, moving to a fresh stack segment first if less than the red zone
/// remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT, f)
}

/// The engine owns the stack on wasm32.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests;
