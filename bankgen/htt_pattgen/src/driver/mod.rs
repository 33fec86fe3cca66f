//! Generation driver: one input event in, one `Outcome` out.
//!
//! # Flow
//!
//! ```text
//! next()
//!   │
//!   ▼
//! generator.next_candidates() ──► EndOfInput / Empty / Fatal(SourceRead)
//!   │
//!   ▼
//! ConstraintPolicy::check ──► ConstraintViolated
//!   │
//!   ▼
//! SectorResolver::resolve ──► Fatal(SectorNotFound)
//!   │
//!   ▼
//! Selector::select ──► Ok
//! ```
//!
//! Nothing is retried. The iteration counter advances on every call so it
//! stays aligned with the upstream input cursor.

mod collisions;

pub use collisions::CollisionStats;

use std::sync::Arc;

use htt_ir::{GeneratedPattern, ModuleTuple, Pattern, SectorId};
use htt_sector::{SectorBank, SectorResolver};
use rand::rngs::StdRng;

use crate::{
    CandidateGenerator, ConfigError, ConstraintPolicy, FatalReason, Generated, Outcome,
    PattGenConfig, RandomSource, RngSource, Selector, Violation,
};

/// Drives a candidate generator through validation, sector resolution and
/// selection.
///
/// Owns its generator (and therefore its input cursor), policy copy and
/// random stream. The resolver is typically an `Arc<SectorBank>` shared
/// read-only with other drivers.
pub struct PatternGenerator<G, R = RngSource<StdRng>, B = Arc<SectorBank>> {
    generator: G,
    resolver: B,
    policy: ConstraintPolicy,
    selector: Selector,
    rng: R,
    iteration: usize,
    exhausted: bool,
    current: Option<(GeneratedPattern, usize)>,
    collisions: CollisionStats,
}

impl<G, B> PatternGenerator<G, RngSource<StdRng>, B>
where
    G: CandidateGenerator,
    B: SectorResolver,
{
    /// Build a driver whose random stream is seeded from `config.seed`.
    pub fn new(generator: G, resolver: B, config: &PattGenConfig) -> Result<Self, ConfigError> {
        Self::with_rng(generator, resolver, config, RngSource::seeded(config.seed))
    }
}

impl<G, R, B> PatternGenerator<G, R, B>
where
    G: CandidateGenerator,
    R: RandomSource,
    B: SectorResolver,
{
    /// Build a driver with an explicit random source.
    ///
    /// All configuration is validated here, before any event is read.
    pub fn with_rng(
        generator: G,
        resolver: B,
        config: &PattGenConfig,
        rng: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let n_layers = generator.n_layers();
        let policy = ConstraintPolicy::new(
            n_layers,
            config.wildcard_allowed.clone(),
            config.max_wildcards,
        )?;
        if resolver.n_layers() != n_layers {
            return Err(ConfigError::LayerMismatch {
                component: "sector bank",
                expected: n_layers,
                found: resolver.n_layers(),
            });
        }

        tracing::debug!(
            generator = generator.name(),
            n_layers,
            max_wildcards = config.max_wildcards,
            selection = ?config.selection,
            "pattern generator ready"
        );

        Ok(PatternGenerator {
            generator,
            resolver,
            policy,
            selector: Selector::new(config.selection),
            rng,
            iteration: 0,
            exhausted: false,
            current: None,
            collisions: CollisionStats::new(
                config.collision_warn_fraction,
                config.collision_warn_min_lookups,
            ),
        })
    }

    /// Process the next input event.
    #[allow(
        clippy::should_implement_trait,
        reason = "EndOfInput repeats forever, unlike Iterator::next returning None"
    )]
    pub fn next(&mut self) -> Outcome {
        self.iteration += 1;
        self.current = None;

        if self.exhausted {
            return Outcome::EndOfInput;
        }

        let (candidates, wildcards) = match self.generator.next_candidates() {
            Generated::EndOfInput => {
                tracing::debug!(iteration = self.iteration, "end of input");
                self.exhausted = true;
                return Outcome::EndOfInput;
            }
            Generated::Empty => return Outcome::Empty,
            Generated::Failed(err) => {
                tracing::warn!(iteration = self.iteration, %err, "event source failed");
                return Outcome::Fatal(FatalReason::SourceRead(err));
            }
            Generated::Candidates {
                candidates,
                wildcards,
            } => (candidates, wildcards),
        };
        if candidates.is_empty() {
            return Outcome::Empty;
        }

        let violation = if wildcards > self.policy.max_wildcards() {
            Some(Violation::TooManyWildcards {
                count: wildcards,
                max: self.policy.max_wildcards(),
            })
        } else {
            candidates
                .iter()
                .find_map(|candidate| self.policy.check(&candidate.pattern).err())
        };
        if let Some(violation) = violation {
            tracing::debug!(
                iteration = self.iteration,
                pattern = %candidates[0].pattern,
                %violation,
                "bad pattern"
            );
            return Outcome::ConstraintViolated {
                violation,
                wildcards,
            };
        }

        let mut resolved = Vec::with_capacity(candidates.len());
        for mut candidate in candidates {
            let resolution = self.resolver.resolve(&candidate.modules);
            self.collisions.record(resolution, &candidate.modules);
            let Some(sector) = resolution.sector() else {
                // If this happens a lot, the bank needs more sectors.
                tracing::debug!(
                    iteration = self.iteration,
                    pattern = %candidate.pattern,
                    modules = %candidate.modules,
                    "pattern didn't match any sector"
                );
                return Outcome::Fatal(FatalReason::SectorNotFound {
                    modules: candidate.modules,
                    pattern: candidate.pattern,
                });
            };
            candidate.sector = sector;
            resolved.push(candidate);
        }

        let Some(index) = self.selector.select(&resolved, &mut self.rng) else {
            return Outcome::Empty;
        };
        let pattern = GeneratedPattern::from(resolved.swap_remove(index));
        self.current = Some((pattern.clone(), wildcards));
        Outcome::Ok { pattern, wildcards }
    }

    /// Replace the per-layer wildcard permissions.
    ///
    /// Rejected without effect if the list length differs from the layer count.
    pub fn set_wildcard_policy(&mut self, allowed: Vec<bool>) -> Result<(), ConfigError> {
        self.policy.set_allowed(allowed).inspect_err(|err| {
            tracing::error!(%err, "wildcard policy rejected");
        })
    }

    /// The last generated pattern, if the last call returned `Ok`.
    pub fn current(&self) -> Option<&GeneratedPattern> {
        self.current.as_ref().map(|(pattern, _)| pattern)
    }

    pub fn pattern(&self) -> Option<&Pattern> {
        self.current().map(|current| &current.pattern)
    }

    /// Wildcard count of the last generated pattern.
    pub fn wildcards(&self) -> Option<usize> {
        self.current.as_ref().map(|&(_, wildcards)| wildcards)
    }

    pub fn sector(&self) -> Option<SectorId> {
        self.current().map(|current| current.sector)
    }

    /// Calls to `next` so far, including the ones that signalled end of input.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn n_layers(&self) -> usize {
        self.policy.n_layers()
    }

    pub fn max_wildcards(&self) -> usize {
        self.policy.max_wildcards()
    }

    pub fn policy(&self) -> &ConstraintPolicy {
        &self.policy
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn collisions(&self) -> &CollisionStats {
        &self.collisions
    }

    /// Resolve a module tuple directly, without touching collision counts.
    pub fn resolve(&self, modules: &ModuleTuple) -> Option<SectorId> {
        self.resolver.resolve(modules).sector()
    }
}

#[cfg(test)]
mod tests;
