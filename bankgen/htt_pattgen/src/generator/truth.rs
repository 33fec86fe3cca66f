//! Patterns derived directly from single-track events.
//!
//! Each event holds the hits of one truth track (e.g. a single muon). The
//! pattern takes the SSID of the first hit seen in each layer; layers with
//! no hit become wildcards.
//!
//! Patterns could be built without sectors, but bank storage and pattern
//! matching are organized by sector, so the driver still resolves one.

use htt_ir::{Candidate, LayerMask, ModuleId, ModuleTuple, Pattern, Ssid};

use super::{CandidateGenerator, Generated};
use crate::{ConfigError, EventSource, LayerQuantizer};

/// Single-track candidate generator.
///
/// Produces exactly one candidate (coverage 1) per event.
#[derive(Debug)]
pub struct TruthGenerator<S, Q> {
    source: S,
    quantizer: Q,
    n_layers: usize,
    layers_missed: usize,
}

impl<S, Q> TruthGenerator<S, Q>
where
    S: EventSource,
    Q: LayerQuantizer<S::Hit>,
{
    pub fn new(source: S, quantizer: Q, n_layers: usize) -> Result<Self, ConfigError> {
        if n_layers == 0 {
            return Err(ConfigError::NoLayers);
        }
        if n_layers > LayerMask::MAX_LAYERS {
            return Err(ConfigError::TooManyLayers {
                found: n_layers,
                max: LayerMask::MAX_LAYERS,
            });
        }
        Ok(TruthGenerator {
            source,
            quantizer,
            n_layers,
            layers_missed: n_layers,
        })
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Build the pattern and module tuple for one event's hits.
    ///
    /// Multiple hits in a layer: the first one wins. Unmapped hits and hits
    /// beyond the configured layers are ignored.
    fn build(&self, hits: &[S::Hit]) -> (Pattern, ModuleTuple, usize) {
        let mut ssids = vec![Ssid::WILDCARD; self.n_layers];
        let mut modules = vec![ModuleId::NONE; self.n_layers];
        let mut missed = self.n_layers;

        for hit in hits {
            let Some(q) = self.quantizer.quantize(hit) else {
                continue;
            };
            if !q.is_mapped() || q.layer >= self.n_layers {
                continue;
            }
            if ssids[q.layer].is_wildcard() {
                ssids[q.layer] = q.ssid;
                modules[q.layer] = q.module;
                missed -= 1;
            }
        }

        (Pattern::from(ssids), ModuleTuple::from(modules), missed)
    }
}

impl<S, Q> CandidateGenerator for TruthGenerator<S, Q>
where
    S: EventSource,
    Q: LayerQuantizer<S::Hit>,
{
    fn name(&self) -> &'static str {
        "truth"
    }

    fn n_layers(&self) -> usize {
        self.n_layers
    }

    fn next_candidates(&mut self) -> Generated {
        let hits = match self.source.next_event() {
            Ok(Some(hits)) => hits,
            Ok(None) => return Generated::EndOfInput,
            Err(err) => return Generated::Failed(err),
        };

        let (pattern, modules, missed) = self.build(&hits);
        self.layers_missed = missed;
        tracing::trace!(%pattern, %modules, missed, "truth pattern");

        Generated::Candidates {
            candidates: vec![Candidate::unresolved(pattern, modules)],
            wildcards: missed,
        }
    }

    fn layers_missed(&self) -> Option<usize> {
        Some(self.layers_missed)
    }
}
