//! Sector bank storage and index construction.

use htt_ir::{LayerMask, ModuleId, ModuleTuple, SectorId};
use rustc_hash::FxHashMap;

/// Errors raised while building a sector bank.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BankError {
    #[error("sector bank needs at least one layer")]
    NoLayers,
    #[error("sector bank supports at most {max} layers, got {found}")]
    TooManyLayers { found: usize, max: usize },
    #[error("sector has {found} layers but the bank expects {expected}")]
    LayerCountMismatch { expected: usize, found: usize },
    #[error("sector {modules} has no module in layer {layer}")]
    MissingModule { modules: ModuleTuple, layer: usize },
    #[error("sector {modules} duplicates sector {existing}")]
    DuplicateSector {
        modules: ModuleTuple,
        existing: SectorId,
    },
    #[error("sector bank is full ({len} sectors)")]
    Full { len: usize },
}

/// Expected module tuple of every known sector, plus lookup indices.
///
/// Built upstream and only queried during generation; share it between
/// drivers behind an `Arc` once construction is done.
#[derive(Debug, Clone)]
pub struct SectorBank {
    n_layers: usize,
    /// Expected modules, indexed by `SectorId`.
    sectors: Vec<ModuleTuple>,
    /// Fast path for queries without don't-care slots.
    exact: FxHashMap<ModuleTuple, SectorId>,
    /// Per layer: module -> sectors expecting it, in ascending id order.
    by_layer: Vec<FxHashMap<ModuleId, Vec<SectorId>>>,
}

impl SectorBank {
    /// Create an empty bank for `n_layers` logical layers.
    pub fn new(n_layers: usize) -> Result<Self, BankError> {
        if n_layers == 0 {
            return Err(BankError::NoLayers);
        }
        if n_layers > LayerMask::MAX_LAYERS {
            return Err(BankError::TooManyLayers {
                found: n_layers,
                max: LayerMask::MAX_LAYERS,
            });
        }
        Ok(SectorBank {
            n_layers,
            sectors: Vec::new(),
            exact: FxHashMap::default(),
            by_layer: vec![FxHashMap::default(); n_layers],
        })
    }

    /// Build a bank from sector definitions. Sector ids follow iteration order.
    pub fn from_sectors(
        n_layers: usize,
        sectors: impl IntoIterator<Item = ModuleTuple>,
    ) -> Result<Self, BankError> {
        let mut bank = SectorBank::new(n_layers)?;
        for modules in sectors {
            bank.add_sector(modules)?;
        }
        Ok(bank)
    }

    /// Append a sector and return its id.
    ///
    /// Every layer must name a concrete module and the tuple must be new.
    pub fn add_sector(&mut self, modules: ModuleTuple) -> Result<SectorId, BankError> {
        if modules.n_layers() != self.n_layers {
            return Err(BankError::LayerCountMismatch {
                expected: self.n_layers,
                found: modules.n_layers(),
            });
        }
        if let Some(layer) = modules.modules().iter().position(|m| !m.is_present()) {
            return Err(BankError::MissingModule { modules, layer });
        }
        if let Some(&existing) = self.exact.get(&modules) {
            return Err(BankError::DuplicateSector { modules, existing });
        }

        let raw = u32::try_from(self.sectors.len())
            .ok()
            .filter(|&raw| raw != SectorId::UNRESOLVED.raw())
            .ok_or(BankError::Full {
                len: self.sectors.len(),
            })?;
        let sector = SectorId::new(raw);

        for (layer, module) in modules.concrete() {
            self.by_layer[layer].entry(module).or_default().push(sector);
        }
        self.exact.insert(modules.clone(), sector);
        self.sectors.push(modules);
        Ok(sector)
    }

    #[inline]
    pub fn n_layers(&self) -> usize {
        self.n_layers
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    /// Expected modules of `sector`.
    pub fn modules(&self, sector: SectorId) -> Option<&ModuleTuple> {
        self.sectors.get(sector.index())
    }

    /// Iterate over `(sector, expected modules)` in id order.
    pub fn iter(&self) -> impl Iterator<Item = (SectorId, &ModuleTuple)> {
        self.sectors
            .iter()
            .zip(0u32..)
            .map(|(modules, raw)| (SectorId::new(raw), modules))
    }

    pub(crate) fn exact(&self, modules: &ModuleTuple) -> Option<SectorId> {
        self.exact.get(modules).copied()
    }

    /// Sectors expecting `module` in `layer`, ascending.
    pub(crate) fn postings(&self, layer: usize, module: ModuleId) -> &[SectorId] {
        self.by_layer
            .get(layer)
            .and_then(|index| index.get(&module))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
