//! Wildcard admissibility rules.

use std::fmt;

use htt_ir::{LayerMask, Pattern};

use crate::ConfigError;

/// Why a pattern was rejected by the constraint policy.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Violation {
    /// More wildcarded layers than the policy allows.
    TooManyWildcards { count: usize, max: usize },
    /// A wildcard in a layer that must hold a hit.
    WildcardNotAllowed { layer: usize },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::TooManyWildcards { count, max } => {
                write!(f, "{count} wildcards exceed the maximum of {max}")
            }
            Violation::WildcardNotAllowed { layer } => {
                write!(f, "wildcard not allowed in layer {layer}")
            }
        }
    }
}

/// Per-layer wildcard permissions plus a global wildcard budget.
///
/// Always holds exactly one permission per logical layer; the empty
/// "all layers allowed" shorthand is expanded on construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstraintPolicy {
    allowed: Vec<bool>,
    max_wildcards: usize,
}

impl ConstraintPolicy {
    pub fn new(
        n_layers: usize,
        allowed: Vec<bool>,
        max_wildcards: usize,
    ) -> Result<Self, ConfigError> {
        if n_layers == 0 {
            return Err(ConfigError::NoLayers);
        }
        if n_layers > LayerMask::MAX_LAYERS {
            return Err(ConfigError::TooManyLayers {
                found: n_layers,
                max: LayerMask::MAX_LAYERS,
            });
        }
        if max_wildcards > n_layers {
            return Err(ConfigError::MaxWildcardsExceedsLayers {
                max_wildcards,
                n_layers,
            });
        }
        let allowed = if allowed.is_empty() {
            vec![true; n_layers]
        } else {
            allowed
        };
        check_length(n_layers, &allowed)?;
        Ok(ConstraintPolicy {
            allowed,
            max_wildcards,
        })
    }

    /// Policy allowing a wildcard in every layer.
    pub fn permissive(n_layers: usize, max_wildcards: usize) -> Result<Self, ConfigError> {
        Self::new(n_layers, Vec::new(), max_wildcards)
    }

    /// Replace the per-layer permissions.
    ///
    /// A list of the wrong length is rejected and the policy is left unchanged.
    pub fn set_allowed(&mut self, allowed: Vec<bool>) -> Result<(), ConfigError> {
        check_length(self.n_layers(), &allowed)?;
        self.allowed = allowed;
        Ok(())
    }

    #[inline]
    pub fn n_layers(&self) -> usize {
        self.allowed.len()
    }

    #[inline]
    pub fn max_wildcards(&self) -> usize {
        self.max_wildcards
    }

    #[inline]
    pub fn allowed(&self) -> &[bool] {
        &self.allowed
    }

    /// Layers in which a wildcard is permitted.
    pub fn allowed_mask(&self) -> LayerMask {
        self.allowed
            .iter()
            .enumerate()
            .filter(|(_, &ok)| ok)
            .fold(LayerMask::EMPTY, |mask, (layer, _)| mask.with(layer))
    }

    /// Check a pattern, reporting the first rule it breaks.
    ///
    /// Per-layer permissions are checked before the wildcard budget. Slots
    /// beyond the configured layers count as disallowed wildcards.
    pub fn check(&self, pattern: &Pattern) -> Result<(), Violation> {
        for (layer, ssid) in pattern.ssids().iter().enumerate() {
            if ssid.is_wildcard() && !self.allowed.get(layer).copied().unwrap_or(false) {
                return Err(Violation::WildcardNotAllowed { layer });
            }
        }
        let count = pattern.wildcard_count();
        if count > self.max_wildcards {
            return Err(Violation::TooManyWildcards {
                count,
                max: self.max_wildcards,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn is_admissible(&self, pattern: &Pattern) -> bool {
        self.check(pattern).is_ok()
    }
}

fn check_length(n_layers: usize, allowed: &[bool]) -> Result<(), ConfigError> {
    if allowed.len() == n_layers {
        Ok(())
    } else {
        Err(ConfigError::WildcardPolicyLength {
            expected: n_layers,
            found: allowed.len(),
        })
    }
}
