//! Pattern candidates and generated bank patterns.

use crate::{ModuleTuple, Pattern, SectorId};

/// One interpretation of an event, produced by a candidate generator.
///
/// Candidates live for a single generation step: the driver resolves their
/// sector, selects one and drops the rest.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Candidate {
    /// `SectorId::UNRESOLVED` until the driver resolves it.
    pub sector: SectorId,
    /// Number of originating tracks/events this candidate represents. Always > 0.
    pub coverage: u32,
    pub pattern: Pattern,
    /// Modules of the hits in `pattern`, for sector resolution.
    pub modules: ModuleTuple,
}

impl Candidate {
    /// Candidate with coverage 1 and no sector yet.
    pub fn unresolved(pattern: Pattern, modules: ModuleTuple) -> Self {
        Candidate {
            sector: SectorId::UNRESOLVED,
            coverage: 1,
            pattern,
            modules,
        }
    }

    #[must_use]
    pub fn with_coverage(mut self, coverage: u32) -> Self {
        self.coverage = coverage;
        self
    }
}

/// A selected pattern with its resolved sector, owned by the caller.
///
/// This is the unit handed to bank writers.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneratedPattern {
    pub sector: SectorId,
    pub coverage: u32,
    pub pattern: Pattern,
}

impl GeneratedPattern {
    #[inline]
    pub fn wildcards(&self) -> usize {
        self.pattern.wildcard_count()
    }
}

impl From<Candidate> for GeneratedPattern {
    fn from(candidate: Candidate) -> Self {
        GeneratedPattern {
            sector: candidate.sector,
            coverage: candidate.coverage,
            pattern: candidate.pattern,
        }
    }
}
