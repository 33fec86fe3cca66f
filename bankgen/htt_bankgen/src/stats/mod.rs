//! Monitoring counters for a bank generation run.

use std::fmt;

use htt_pattgen::{FatalReason, Outcome};

/// Counters accumulated over a generation run.
///
/// Every outcome except `EndOfInput` is one trial. Histograms indexed by a
/// wildcard or layer count have `n_layers + 1` bins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Events processed.
    pub trials: usize,
    /// Trials that did not produce a pattern.
    pub failed: usize,
    pub empty: usize,
    pub constraint: usize,
    pub sector_not_found: usize,
    pub source_errors: usize,
    /// Patterns handed to the sink.
    pub patterns: usize,
    /// Patterns by wildcard count, including ones rejected for having too many.
    pub patterns_by_wildcards: Vec<usize>,
    /// Accepted patterns with a wildcard in each layer.
    pub wildcards_per_layer: Vec<usize>,
    /// Events by number of layers the track itself left no hit in.
    pub truth_misses: Vec<usize>,
    /// Events by number of wildcards not explained by truth misses.
    pub match_misses: Vec<usize>,
    max_wildcards: usize,
}

impl GenerationStats {
    pub fn new(n_layers: usize, max_wildcards: usize) -> Self {
        GenerationStats {
            patterns_by_wildcards: vec![0; n_layers + 1],
            wildcards_per_layer: vec![0; n_layers],
            truth_misses: vec![0; n_layers + 1],
            match_misses: vec![0; n_layers + 1],
            max_wildcards,
            ..GenerationStats::default()
        }
    }

    pub fn max_wildcards(&self) -> usize {
        self.max_wildcards
    }

    /// Trials that produced a pattern.
    pub fn succeeded(&self) -> usize {
        self.trials - self.failed
    }

    /// Count one outcome.
    ///
    /// `layers_missed` comes from generators that derive patterns from a
    /// single track; it feeds the truth and match miss histograms.
    pub fn record(&mut self, outcome: &Outcome, layers_missed: Option<usize>) {
        let wildcards = match outcome {
            Outcome::EndOfInput => return,
            Outcome::Ok { pattern, wildcards } => {
                self.patterns += 1;
                bump(&mut self.patterns_by_wildcards, *wildcards);
                for layer in pattern.pattern.wildcard_layers().layers() {
                    bump(&mut self.wildcards_per_layer, layer);
                }
                Some(*wildcards)
            }
            Outcome::Empty => {
                self.failed += 1;
                self.empty += 1;
                None
            }
            Outcome::ConstraintViolated { wildcards, .. } => {
                self.failed += 1;
                self.constraint += 1;
                bump(&mut self.patterns_by_wildcards, *wildcards);
                Some(*wildcards)
            }
            Outcome::Fatal(FatalReason::SectorNotFound { pattern, .. }) => {
                self.failed += 1;
                self.sector_not_found += 1;
                Some(pattern.wildcard_count())
            }
            Outcome::Fatal(FatalReason::SourceRead(_)) => {
                self.failed += 1;
                self.source_errors += 1;
                None
            }
        };
        self.trials += 1;

        if let Some(missed) = layers_missed {
            bump(&mut self.truth_misses, missed);
            if let Some(wildcards) = wildcards {
                bump(&mut self.match_misses, wildcards.saturating_sub(missed));
            }
        }
    }

    /// Add another run's counters into this one.
    pub fn merge(&mut self, other: &GenerationStats) {
        self.trials += other.trials;
        self.failed += other.failed;
        self.empty += other.empty;
        self.constraint += other.constraint;
        self.sector_not_found += other.sector_not_found;
        self.source_errors += other.source_errors;
        self.patterns += other.patterns;
        add_bins(&mut self.patterns_by_wildcards, &other.patterns_by_wildcards);
        add_bins(&mut self.wildcards_per_layer, &other.wildcards_per_layer);
        add_bins(&mut self.truth_misses, &other.truth_misses);
        add_bins(&mut self.match_misses, &other.match_misses);
        self.max_wildcards = self.max_wildcards.max(other.max_wildcards);
    }

    /// Pattern counts per wildcard count, e.g. `(0 WCs) [40 7 | 2] (2 WCs)`.
    ///
    /// The bar sits before the first count above the wildcard budget.
    pub fn wildcard_summary(&self) -> String {
        let mut out = String::from("(0 WCs) [");
        for (n, count) in self.patterns_by_wildcards.iter().enumerate() {
            if n != 0 {
                out.push(' ');
            }
            if n == self.max_wildcards + 1 {
                out.push_str("| ");
            }
            out.push_str(&count.to_string());
        }
        let top = self.patterns_by_wildcards.len().saturating_sub(1);
        out.push_str(&format!("] ({top} WCs)"));
        out
    }
}

/// Progress line: `Trials: N (F failed). Patterns: ...`.
impl fmt::Display for GenerationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Trials: {} ({} failed). Patterns: {}",
            self.trials,
            self.failed,
            self.wildcard_summary()
        )
    }
}

fn bump(bins: &mut Vec<usize>, index: usize) {
    if index >= bins.len() {
        bins.resize(index + 1, 0);
    }
    bins[index] += 1;
}

fn add_bins(into: &mut Vec<usize>, from: &[usize]) {
    if from.len() > into.len() {
        into.resize(from.len(), 0);
    }
    for (dst, src) in into.iter_mut().zip(from) {
        *dst += src;
    }
}
