//! Fast-forwarding deterministic simulations through their eventual period.

use std::hash::Hash;

use indexmap::IndexMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cycle {
    /// Iteration at which the repeating state was first seen.
    pub offset: usize,
    pub period: usize,
}

impl Cycle {
    /// The earliest iteration whose state equals the state after `iterations`.
    pub fn equivalent_iteration(&self, iterations: usize) -> usize {
        if iterations < self.offset {
            iterations
        } else {
            self.offset + (iterations - self.offset) % self.period
        }
    }
}

/// Applies `step` to `initial` `iterations` times, stopping early once a state repeats.
///
/// States are identified by `key`. Every distinct state is cached in visit order, so after a
/// repeat the answer is read out of the cache instead of being simulated.
pub fn fast_forward<S, K>(
    initial: S,
    iterations: usize,
    mut step: impl FnMut(&mut S),
    key: impl Fn(&S) -> K,
) -> (S, Option<Cycle>)
where
    S: Clone,
    K: Hash + Eq,
{
    let mut seen = IndexMap::new();
    let mut state = initial;
    seen.insert(key(&state), state.clone());

    for iteration in 1..=iterations {
        step(&mut state);
        let k = key(&state);
        if let Some(offset) = seen.get_index_of(&k) {
            let cycle = Cycle {
                offset,
                period: iteration - offset,
            };
            tracing::debug!(offset, period = cycle.period, "state cycle detected");
            let target = cycle.equivalent_iteration(iterations);
            // `target < iteration`, so the state is already cached.
            return (seen[target].clone(), Some(cycle));
        }
        seen.insert(k, state.clone());
    }
    (state, None)
}

/// [`fast_forward`], then evaluates `metric` on the resulting state.
pub fn fast_forward_metric<S, K, M>(
    initial: S,
    iterations: usize,
    step: impl FnMut(&mut S),
    key: impl Fn(&S) -> K,
    metric: impl FnOnce(&S) -> M,
) -> M
where
    S: Clone,
    K: Hash + Eq,
{
    let (state, _) = fast_forward(initial, iterations, step, key);
    metric(&state)
}
