//! Per-layer patterns, module tuples and wildcard-layer bitmasks.

use std::fmt;

use crate::{ModuleId, Ssid};

/// Bitmask with one bit per logical layer.
///
/// Bit `i` is set iff layer `i` is selected (e.g. wildcarded).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct LayerMask(u32);

impl LayerMask {
    /// Maximum number of logical layers a mask (and therefore a pattern) can describe.
    pub const MAX_LAYERS: usize = 32;

    pub const EMPTY: LayerMask = LayerMask(0);

    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        LayerMask(bits)
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Return a copy with `layer` set. Layers at or above `MAX_LAYERS` are ignored.
    #[inline]
    #[must_use]
    pub const fn with(self, layer: usize) -> Self {
        if layer < Self::MAX_LAYERS {
            LayerMask(self.0 | (1 << layer))
        } else {
            self
        }
    }

    #[inline]
    pub const fn contains(self, layer: usize) -> bool {
        layer < Self::MAX_LAYERS && (self.0 >> layer) & 1 == 1
    }

    #[inline]
    pub const fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate over the set layers in ascending order.
    pub fn layers(self) -> impl Iterator<Item = usize> {
        (0..Self::MAX_LAYERS).filter(move |&layer| self.contains(layer))
    }
}

impl fmt::Debug for LayerMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LayerMask({:#b})", self.0)
    }
}

/// Fixed-width pattern: one SSID per logical layer.
///
/// Immutable once built. A slot holding `Ssid::WILDCARD` does not constrain
/// its layer.
#[derive(Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pattern {
    ssids: Box<[Ssid]>,
}

impl Pattern {
    /// Pattern with every layer wildcarded.
    pub fn all_wildcard(n_layers: usize) -> Self {
        Pattern {
            ssids: vec![Ssid::WILDCARD; n_layers].into_boxed_slice(),
        }
    }

    /// Number of logical layers (slots).
    #[inline]
    pub fn n_layers(&self) -> usize {
        self.ssids.len()
    }

    #[inline]
    pub fn ssids(&self) -> &[Ssid] {
        &self.ssids
    }

    /// SSID at `layer`, or `None` if out of range.
    #[inline]
    pub fn get(&self, layer: usize) -> Option<Ssid> {
        self.ssids.get(layer).copied()
    }

    /// True if `layer` holds a wildcard. Out-of-range layers are not wildcards.
    #[inline]
    pub fn is_wildcard(&self, layer: usize) -> bool {
        self.get(layer).is_some_and(Ssid::is_wildcard)
    }

    pub fn wildcard_count(&self) -> usize {
        self.ssids.iter().filter(|ssid| ssid.is_wildcard()).count()
    }

    /// Bitmask of wildcarded layers.
    pub fn wildcard_layers(&self) -> LayerMask {
        self.ssids
            .iter()
            .enumerate()
            .filter(|(_, ssid)| ssid.is_wildcard())
            .fold(LayerMask::EMPTY, |mask, (layer, _)| mask.with(layer))
    }
}

impl From<Vec<Ssid>> for Pattern {
    fn from(ssids: Vec<Ssid>) -> Self {
        Pattern {
            ssids: ssids.into_boxed_slice(),
        }
    }
}

impl FromIterator<Ssid> for Pattern {
    fn from_iter<I: IntoIterator<Item = Ssid>>(iter: I) -> Self {
        Pattern {
            ssids: iter.into_iter().collect(),
        }
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern{self}")
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_slots(f, '[', ']', &self.ssids)
    }
}

/// Module ids parallel to a pattern, one slot per logical layer.
///
/// Only used to resolve the pattern's sector; never persisted with it.
#[derive(Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModuleTuple {
    modules: Box<[ModuleId]>,
}

impl ModuleTuple {
    /// Tuple with no module in any layer.
    pub fn unfilled(n_layers: usize) -> Self {
        ModuleTuple {
            modules: vec![ModuleId::NONE; n_layers].into_boxed_slice(),
        }
    }

    #[inline]
    pub fn n_layers(&self) -> usize {
        self.modules.len()
    }

    #[inline]
    pub fn modules(&self) -> &[ModuleId] {
        &self.modules
    }

    #[inline]
    pub fn get(&self, layer: usize) -> Option<ModuleId> {
        self.modules.get(layer).copied()
    }

    /// True if every layer holds a concrete module.
    pub fn is_complete(&self) -> bool {
        self.modules.iter().all(|module| module.is_present())
    }

    /// Iterate over `(layer, module)` for the concrete slots only.
    pub fn concrete(&self) -> impl Iterator<Item = (usize, ModuleId)> + '_ {
        self.modules
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, module)| module.is_present())
    }
}

impl From<Vec<ModuleId>> for ModuleTuple {
    fn from(modules: Vec<ModuleId>) -> Self {
        ModuleTuple {
            modules: modules.into_boxed_slice(),
        }
    }
}

impl FromIterator<ModuleId> for ModuleTuple {
    fn from_iter<I: IntoIterator<Item = ModuleId>>(iter: I) -> Self {
        ModuleTuple {
            modules: iter.into_iter().collect(),
        }
    }
}

impl fmt::Debug for ModuleTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModuleTuple{self}")
    }
}

impl fmt::Display for ModuleTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_slots(f, '(', ')', &self.modules)
    }
}

fn write_slots<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    open: char,
    close: char,
    slots: &[T],
) -> fmt::Result {
    write!(f, "{open}")?;
    for (i, slot) in slots.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{slot}")?;
    }
    write!(f, "{close}")
}
