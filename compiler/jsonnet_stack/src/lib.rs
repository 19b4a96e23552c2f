//! Host stack growth for deep recursion.
//!
//! Every pass over a Jsonnet program is recursive: the parser descends into
//! nested brackets, the desugarer and analyzer walk the trees, and the
//! evaluator re-enters itself for every thunk it forces. Language-level
//! depth is bounded by the evaluator's frame limit, but a single language
//! frame can cost many host frames, so the passes wrap their recursive
//! entry points in [`ensure_sufficient_stack`].
//!
//! On native targets the stack is grown in [`GROWTH`]-sized segments
//! whenever less than [`RED_ZONE`] remains. On `wasm32` the closure is
//! called directly.

/// Remaining stack below which a new segment is allocated.
pub const RED_ZONE: usize = 128 * 1024;

/// Size of each freshly allocated stack segment.
pub const GROWTH: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the host stack if it is nearly exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, GROWTH, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nest(depth: u32) -> String {
        ensure_sufficient_stack(|| {
            if depth == 0 {
                String::from("x")
            } else {
                let inner = nest(depth - 1);
                if depth % 50_000 == 0 {
                    format!("[{}]", inner.len())
                } else {
                    inner
                }
            }
        })
    }

    #[test]
    fn test_deep_nesting_survives() {
        assert_eq!(nest(200_000), "[3]");
    }

    #[test]
    fn test_result_passthrough() {
        let out: Result<u8, String> = ensure_sufficient_stack(|| Err("nope".to_string()));
        assert_eq!(out, Err("nope".to_string()));
    }
}
