//! Random source consumed by candidate selection.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform floats in `[0, 1)`.
///
/// Each driver owns its own source so runs are reproducible and parallel
/// drivers never share a stream.
pub trait RandomSource {
    fn next_uniform(&mut self) -> f64;
}

/// Adapter from any `rand` generator.
#[derive(Clone, Debug)]
pub struct RngSource<R>(R);

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        RngSource(rng)
    }
}

impl RngSource<StdRng> {
    /// Deterministic stream for `seed`.
    pub fn seeded(seed: u64) -> Self {
        RngSource(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    #[inline]
    fn next_uniform(&mut self) -> f64 {
        self.0.random::<f64>()
    }
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    #[inline]
    fn next_uniform(&mut self) -> f64 {
        (**self).next_uniform()
    }
}
