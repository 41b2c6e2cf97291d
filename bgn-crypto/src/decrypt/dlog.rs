use crate::pairing::Group;

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Baby-step giant-step table for logarithms of a fixed base in `[0, bound]`.
///
/// The baby steps `base^j` for `j` in `[0, m)` are kept in a map; a lookup
/// then walks at most `m` giant steps of `base^(−m)` from the target, where
/// `m = ⌈√(bound + 1)⌉`.
#[derive(Debug, Clone)]
pub struct DlogTable<E> {
    baby_steps: HashMap<E, u64>,
    giant_stride: E,
    steps: u64,
    bound: u64,
}

impl<E: Clone + Debug + Eq + Hash> DlogTable<E> {
    pub fn build<G: Group<Element = E>>(group: &G, base: &E, bound: u64) -> Self {
        let range = bound.saturating_add(1);
        let mut steps = range.isqrt();
        if steps * steps < range {
            steps += 1;
        }

        let mut baby_steps = HashMap::with_capacity(steps as usize);
        let mut current = group.identity();
        for j in 0..steps {
            // keep the smallest exponent if the base has tiny order
            baby_steps.entry(current.clone()).or_insert(j);
            current = group.mul(&current, base);
        }

        Self {
            baby_steps,
            giant_stride: group.inverse(&current),
            steps,
            bound,
        }
    }

    pub fn bound(&self) -> u64 {
        self.bound
    }

    /// Finds `x ≤ bound` with `base^x = target`.
    pub fn solve<G: Group<Element = E>>(&self, group: &G, target: &E) -> Option<u64> {
        let mut gamma = target.clone();
        for i in 0..self.steps {
            if let Some(j) = self.baby_steps.get(&gamma) {
                let x = i * self.steps + j;
                return (x <= self.bound).then_some(x);
            }
            gamma = group.mul(&gamma, &self.giant_stride);
        }

        None
    }
}
