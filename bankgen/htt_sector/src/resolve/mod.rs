//! Reverse lookup from observed modules to a sector.

use std::sync::Arc;

use htt_ir::{ModuleTuple, SectorId};

use crate::SectorBank;

/// Result of a reverse sector lookup.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Exactly one sector matches.
    Unique(SectorId),
    /// Several sectors match; `sector` is the lowest id among them.
    Ambiguous { sector: SectorId, matches: usize },
    /// No sector matches: the bank does not cover these modules.
    NotFound,
}

impl Resolution {
    /// The chosen sector, if any.
    pub fn sector(self) -> Option<SectorId> {
        match self {
            Resolution::Unique(sector) | Resolution::Ambiguous { sector, .. } => Some(sector),
            Resolution::NotFound => None,
        }
    }

    pub fn is_ambiguous(self) -> bool {
        matches!(self, Resolution::Ambiguous { .. })
    }
}

/// Maps a per-layer module tuple to a sector.
///
/// Query slots holding `ModuleId::NONE` never constrain the match.
/// Implementations must be pure: the same query against an unchanged bank
/// always yields the same resolution.
pub trait SectorResolver {
    /// Number of logical layers a query must have.
    fn n_layers(&self) -> usize;

    fn resolve(&self, modules: &ModuleTuple) -> Resolution;
}

impl SectorResolver for SectorBank {
    fn n_layers(&self) -> usize {
        SectorBank::n_layers(self)
    }

    fn resolve(&self, modules: &ModuleTuple) -> Resolution {
        if modules.n_layers() != SectorBank::n_layers(self) {
            tracing::debug!(
                expected = SectorBank::n_layers(self),
                found = modules.n_layers(),
                "sector query has wrong layer count"
            );
            return Resolution::NotFound;
        }

        if modules.is_complete() {
            return self
                .exact(modules)
                .map_or(Resolution::NotFound, Resolution::Unique);
        }

        let mut constraints: Vec<_> = modules
            .concrete()
            .map(|(layer, module)| (layer, module, self.postings(layer, module)))
            .collect();

        // All layers don't-care: every sector matches.
        if constraints.is_empty() {
            return match self.len() {
                0 => Resolution::NotFound,
                1 => Resolution::Unique(SectorId::new(0)),
                matches => Resolution::Ambiguous {
                    sector: SectorId::new(0),
                    matches,
                },
            };
        }

        constraints.sort_by_key(|(_, _, postings)| postings.len());
        let (shortest, rest) = constraints.split_at(1);
        let (_, _, candidates) = shortest[0];

        let mut found = candidates.iter().copied().filter(|&sector| {
            self.modules(sector).is_some_and(|expected| {
                rest.iter()
                    .all(|&(layer, module, _)| expected.get(layer) == Some(module))
            })
        });

        // Postings are ascending, so the first match is the lowest id.
        let Some(first) = found.next() else {
            return Resolution::NotFound;
        };
        match found.count() {
            0 => Resolution::Unique(first),
            others => Resolution::Ambiguous {
                sector: first,
                matches: others + 1,
            },
        }
    }
}

impl<T: SectorResolver + ?Sized> SectorResolver for Arc<T> {
    fn n_layers(&self) -> usize {
        (**self).n_layers()
    }

    fn resolve(&self, modules: &ModuleTuple) -> Resolution {
        (**self).resolve(modules)
    }
}

impl<T: SectorResolver + ?Sized> SectorResolver for &T {
    fn n_layers(&self) -> usize {
        (**self).n_layers()
    }

    fn resolve(&self, modules: &ModuleTuple) -> Resolution {
        (**self).resolve(modules)
    }
}
