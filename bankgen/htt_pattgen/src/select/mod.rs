//! Random choice among valid candidates.

use htt_ir::Candidate;

use crate::{RandomSource, SelectionPolicy};

/// Picks one candidate index using a single random draw.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Selector {
    policy: SelectionPolicy,
}

impl Selector {
    pub fn new(policy: SelectionPolicy) -> Self {
        Selector { policy }
    }

    pub fn policy(self) -> SelectionPolicy {
        self.policy
    }

    /// Index of the chosen candidate, always `< candidates.len()`.
    ///
    /// Consumes exactly one draw from `rng`. Returns `None` for an empty list.
    pub fn select(self, candidates: &[Candidate], rng: &mut impl RandomSource) -> Option<usize> {
        if candidates.is_empty() {
            return None;
        }
        let draw = rng.next_uniform();
        let index = match self.policy {
            SelectionPolicy::Uniform => uniform_index(candidates.len(), draw),
            SelectionPolicy::Weighted => weighted_index(candidates, draw),
        };
        Some(index)
    }
}

/// `floor(len * draw)`, clamped into range.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "the product is floored and clamped to the list bounds"
)]
fn uniform_index(len: usize, draw: f64) -> usize {
    let scaled = (len as f64 * draw).floor();
    if scaled.is_nan() || scaled < 0.0 {
        return 0;
    }
    (scaled as usize).min(len - 1)
}

/// First candidate whose cumulative coverage exceeds `draw * total`.
fn weighted_index(candidates: &[Candidate], draw: f64) -> usize {
    let total: f64 = candidates.iter().map(|c| f64::from(c.coverage)).sum();
    if total <= 0.0 {
        return uniform_index(candidates.len(), draw);
    }
    let target = draw * total;
    let mut cumulative = 0.0;
    for (index, candidate) in candidates.iter().enumerate() {
        cumulative += f64::from(candidate.coverage);
        if target < cumulative {
            return index;
        }
    }
    candidates.len() - 1
}
