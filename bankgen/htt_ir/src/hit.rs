//! Hits after layer quantization.

use crate::{ModuleId, Ssid};

/// A hit mapped onto a logical layer by the external layer quantizer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuantizedHit {
    /// Logical layer index. May exceed the configured layer count; such hits are ignored.
    pub layer: usize,
    pub ssid: Ssid,
    pub module: ModuleId,
}

impl QuantizedHit {
    pub const fn new(layer: usize, ssid: Ssid, module: ModuleId) -> Self {
        QuantizedHit {
            layer,
            ssid,
            module,
        }
    }

    /// A hit is usable only if both its SSID and module are concrete.
    #[inline]
    pub const fn is_mapped(&self) -> bool {
        !self.ssid.is_wildcard() && self.module.is_present()
    }
}
