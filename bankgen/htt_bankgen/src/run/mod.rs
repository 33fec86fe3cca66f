//! Run loop: drive pattern generators to end of input.
//!
//! A run feeds every accepted pattern to a [`PatternSink`] and accumulates
//! [`GenerationStats`], logging a progress line every
//! [`RunConfig::progress_interval`] trials and a summary at the end.
//!
//! Independent drivers (disjoint event ranges, separate sub-regions) can be
//! run side by side with [`BankGenRun::run_partitioned`]; they share the
//! sector bank read-only and own everything else.

use htt_pattgen::{
    CandidateGenerator, CollisionStats, FatalReason, Outcome, PatternGenerator, RandomSource,
};
use htt_sector::SectorResolver;
use rayon::prelude::*;

use crate::{GenerationStats, PatternSink};

/// Run loop settings.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    /// Trials between progress lines. Zero disables them.
    pub progress_interval: usize,
    /// Stop the run at the first event source failure.
    pub stop_on_source_error: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            progress_interval: 100_000,
            stop_on_source_error: true,
        }
    }
}

impl RunConfig {
    #[must_use]
    pub fn with_progress_interval(mut self, trials: usize) -> Self {
        self.progress_interval = trials;
        self
    }

    #[must_use]
    pub fn with_stop_on_source_error(mut self, stop: bool) -> Self {
        self.stop_on_source_error = stop;
        self
    }
}

/// Result of one driver inside a partitioned run.
#[derive(Debug)]
pub struct WorkerReport<S> {
    /// Position of the driver in the input list.
    pub index: usize,
    pub stats: GenerationStats,
    pub collisions: CollisionStats,
    pub sink: S,
}

/// Per-driver reports, in input order, plus their merged counters.
#[derive(Debug)]
pub struct PartitionedReport<S> {
    pub workers: Vec<WorkerReport<S>>,
    pub total: GenerationStats,
}

/// Bank generation run.
#[derive(Copy, Clone, Debug, Default)]
pub struct BankGenRun {
    config: RunConfig,
}

impl BankGenRun {
    pub fn new(config: RunConfig) -> Self {
        BankGenRun { config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Drive `driver` until end of input, handing accepted patterns to `sink`.
    ///
    /// `sink.finish()` is called once when the run ends.
    #[tracing::instrument(
        level = "info",
        skip_all,
        fields(generator = driver.generator().name(), n_layers = driver.n_layers())
    )]
    pub fn run<G, R, B, S>(
        &self,
        driver: &mut PatternGenerator<G, R, B>,
        sink: &mut S,
    ) -> GenerationStats
    where
        G: CandidateGenerator,
        R: RandomSource,
        B: SectorResolver,
        S: PatternSink + ?Sized,
    {
        let mut stats = GenerationStats::new(driver.n_layers(), driver.max_wildcards());

        loop {
            let outcome = driver.next();
            if outcome.is_end_of_input() {
                break;
            }
            if let Outcome::Ok { pattern, .. } = &outcome {
                sink.add_pattern(pattern);
            }
            stats.record(&outcome, driver.generator().layers_missed());

            if self.config.progress_interval != 0
                && stats.trials % self.config.progress_interval == 0
            {
                tracing::info!("{stats}");
            }

            if let Outcome::Fatal(FatalReason::SourceRead(err)) = &outcome {
                if self.config.stop_on_source_error {
                    tracing::error!(%err, trials = stats.trials, "stopping run");
                    break;
                }
            }
        }

        sink.finish();
        log_summary(&stats, driver.collisions());
        stats
    }

    /// Run independent drivers in parallel, each with its own sink.
    ///
    /// Reports come back in input order; `total` merges every worker's
    /// counters.
    pub fn run_partitioned<G, R, B, S>(
        &self,
        workers: Vec<(PatternGenerator<G, R, B>, S)>,
    ) -> PartitionedReport<S>
    where
        G: CandidateGenerator + Send,
        R: RandomSource + Send,
        B: SectorResolver + Send,
        S: PatternSink + Send,
    {
        let reports: Vec<WorkerReport<S>> = workers
            .into_par_iter()
            .enumerate()
            .map(|(index, (mut driver, mut sink))| {
                let _span = tracing::info_span!("worker", index).entered();
                let stats = self.run(&mut driver, &mut sink);
                WorkerReport {
                    index,
                    stats,
                    collisions: driver.collisions().clone(),
                    sink,
                }
            })
            .collect();

        let mut total = GenerationStats::default();
        for report in &reports {
            total.merge(&report.stats);
        }
        tracing::info!(workers = reports.len(), "{total}");

        PartitionedReport {
            workers: reports,
            total,
        }
    }
}

/// Derive the random seed of worker `index` from a base seed.
///
/// Neighbouring indices give unrelated seeds, so workers never replay each
/// other's draws.
pub fn seed_for_worker(base: u64, index: usize) -> u64 {
    // splitmix64 finalizer
    let mut z = base.wrapping_add((index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn log_summary(stats: &GenerationStats, collisions: &CollisionStats) {
    tracing::info!(
        "Trials: {} total, {} failed, {} empty.",
        stats.trials,
        stats.failed,
        stats.empty
    );
    tracing::info!("WC coverages: {}", stats.wildcard_summary());
    tracing::info!("Wildcards/layer: {}", bins(&stats.wildcards_per_layer));
    if stats.truth_misses.iter().any(|&n| n > 0) {
        tracing::info!("Truth misses: {}", bins(&stats.truth_misses));
        tracing::info!("Match misses: {}", bins(&stats.match_misses));
    }
    if collisions.ambiguous > 0 {
        tracing::info!(
            ambiguous = collisions.ambiguous,
            lookups = collisions.lookups,
            "ambiguous sector lookups"
        );
    }
}

fn bins(counts: &[usize]) -> String {
    counts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests;
