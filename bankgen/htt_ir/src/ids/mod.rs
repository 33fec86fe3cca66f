//! Compact identifiers for super-strips, modules and sectors.
//!
//! Each id is a 32-bit newtype. Slots that carry no value use a reserved
//! raw value (`u32::MAX`) instead of `Option`, matching the flat layout of
//! patterns and module tuples.

use std::fmt;

/// Quantized super-strip id of a hit within one logical layer.
///
/// `Ssid::WILDCARD` marks a pattern slot that does not constrain its layer.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Ssid(u32);

impl Ssid {
    /// Wildcard slot: "match any value at this layer".
    pub const WILDCARD: Ssid = Ssid(u32::MAX);

    /// Create from a raw quantized value.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Ssid(raw)
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_wildcard(self) -> bool {
        self.0 == u32::MAX
    }
}

impl fmt::Debug for Ssid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_wildcard() {
            write!(f, "Ssid(*)")
        } else {
            write!(f, "Ssid({})", self.0)
        }
    }
}

impl fmt::Display for Ssid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_wildcard() {
            f.write_str("*")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Detector module identifier, as returned by the identifier lookup service.
///
/// `ModuleId::NONE` marks a layer with no hit (or a wildcarded layer).
/// On the query side of a sector lookup it means "don't care".
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct ModuleId(u32);

impl ModuleId {
    /// No module occupies this layer.
    pub const NONE: ModuleId = ModuleId(u32::MAX);

    #[inline]
    pub const fn new(raw: u32) -> Self {
        ModuleId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Check whether this slot holds a concrete module.
    #[inline]
    pub const fn is_present(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_present() {
            write!(f, "ModuleId({})", self.0)
        } else {
            write!(f, "ModuleId(NONE)")
        }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_present() {
            write!(f, "{}", self.0)
        } else {
            f.write_str("*")
        }
    }
}

/// Index of a sector in the sector bank.
///
/// Candidates start out `UNRESOLVED`; the driver fills in the sector
/// returned by the resolver.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct SectorId(u32);

impl SectorId {
    /// Sector not (yet) resolved.
    pub const UNRESOLVED: SectorId = SectorId(u32::MAX);

    #[inline]
    pub const fn new(index: u32) -> Self {
        SectorId(index)
    }

    /// Get the index into the sector bank.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_resolved(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for SectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_resolved() {
            write!(f, "SectorId({})", self.0)
        } else {
            write!(f, "SectorId(UNRESOLVED)")
        }
    }
}

impl fmt::Display for SectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_resolved() {
            write!(f, "{}", self.0)
        } else {
            f.write_str("unresolved")
        }
    }
}

impl Default for SectorId {
    fn default() -> Self {
        Self::UNRESOLVED
    }
}
