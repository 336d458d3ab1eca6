//! Native stack headroom for the recursive passes.
//!
//! Parser, resolver, printer and interpreter all recurse once per nesting
//! level of the program, and the interpreter once more per Lox call.  Each
//! of those entry points runs through [`ensure_sufficient_stack`], which
//! moves onto a freshly allocated segment when the current one is nearly
//! full, so depth is bounded by `MAX_CALL_DEPTH` and memory rather than by
//! whatever stack the embedding thread happened to get.

/// Grow when less than this much stack remains.
const RED_ZONE: usize = 128 * 1024;

/// Size of each new stack segment.
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
