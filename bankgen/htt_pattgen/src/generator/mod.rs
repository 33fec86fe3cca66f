//! Candidate generation strategies.
//!
//! A generator turns the next input event into zero or more pattern
//! candidates. Strategies differ in where events come from and how hits
//! become patterns, but all of them report through [`Generated`], so the
//! driver's validation, resolution and selection stay shared.

mod truth;

pub use truth::TruthGenerator;

use htt_ir::Candidate;

use crate::SourceError;

/// What a generator produced for one event.
#[derive(Clone, Debug, PartialEq)]
pub enum Generated {
    /// The upstream source is exhausted.
    EndOfInput,
    /// The event yielded no candidates.
    Empty,
    /// Candidates awaiting validation, with their wildcard count.
    Candidates {
        candidates: Vec<Candidate>,
        wildcards: usize,
    },
    /// The upstream source failed.
    Failed(SourceError),
}

/// One pattern generation strategy.
pub trait CandidateGenerator {
    /// Strategy name for logs.
    fn name(&self) -> &'static str;

    /// Pattern width produced by this generator.
    fn n_layers(&self) -> usize;

    /// Read the next event and build its candidates.
    fn next_candidates(&mut self) -> Generated;

    /// Layers with no hit at all in the last event, for strategies that
    /// derive patterns from a single track.
    fn layers_missed(&self) -> Option<usize> {
        None
    }
}

impl<G: CandidateGenerator + ?Sized> CandidateGenerator for Box<G> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn n_layers(&self) -> usize {
        (**self).n_layers()
    }

    fn next_candidates(&mut self) -> Generated {
        (**self).next_candidates()
    }

    fn layers_missed(&self) -> Option<usize> {
        (**self).layers_missed()
    }
}
