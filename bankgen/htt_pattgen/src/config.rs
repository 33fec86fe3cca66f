//! Pattern generation configuration.

use crate::ConfigError;

/// How the driver picks one candidate when a generator yields several.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SelectionPolicy {
    /// Every candidate equally likely.
    #[default]
    Uniform,
    /// Probability proportional to each candidate's coverage.
    Weighted,
}

/// Configuration for a `PatternGenerator`.
///
/// Validated once, when the driver is built.
#[derive(Clone, Debug, PartialEq)]
pub struct PattGenConfig {
    /// Maximum number of wildcards allowed in a pattern.
    pub max_wildcards: usize,
    /// Per layer: may this layer hold a wildcard? Empty means all layers may.
    pub wildcard_allowed: Vec<bool>,
    /// Seed for the driver's random stream.
    pub seed: u64,
    pub selection: SelectionPolicy,
    /// Ambiguous-sector rate above which a coverage warning is logged.
    pub collision_warn_fraction: f64,
    /// Minimum number of lookups before the ambiguity rate is judged.
    pub collision_warn_min_lookups: usize,
}

impl Default for PattGenConfig {
    fn default() -> Self {
        PattGenConfig {
            max_wildcards: 2,
            wildcard_allowed: Vec::new(),
            seed: 0,
            selection: SelectionPolicy::Uniform,
            collision_warn_fraction: 0.01,
            collision_warn_min_lookups: 1000,
        }
    }
}

impl PattGenConfig {
    #[must_use]
    pub fn with_max_wildcards(mut self, max_wildcards: usize) -> Self {
        self.max_wildcards = max_wildcards;
        self
    }

    #[must_use]
    pub fn with_wildcard_allowed(mut self, allowed: Vec<bool>) -> Self {
        self.wildcard_allowed = allowed;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_selection(mut self, selection: SelectionPolicy) -> Self {
        self.selection = selection;
        self
    }

    #[must_use]
    pub fn with_collision_warning(mut self, fraction: f64, min_lookups: usize) -> Self {
        self.collision_warn_fraction = fraction;
        self.collision_warn_min_lookups = min_lookups;
        self
    }

    /// Check the settings that do not depend on the layer count.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if (0.0..=1.0).contains(&self.collision_warn_fraction) {
            Ok(())
        } else {
            Err(ConfigError::CollisionFraction(self.collision_warn_fraction))
        }
    }
}
