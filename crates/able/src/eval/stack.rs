//! Stack growth for deeply recursive scripts
//!
//! One script call nests several evaluator frames. The native stack grows
//! on demand, so recursion stops at `EvalContext::max_call_depth` with a
//! `StackOverflow` error instead of exhausting the thread's stack.

/// Minimum stack space to keep available (100KB red zone).
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first moving to a fresh stack segment if the current one is
/// nearly exhausted.
#[inline]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
