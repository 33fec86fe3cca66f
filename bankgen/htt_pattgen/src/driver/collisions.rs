//! Sector-collision accounting.

use htt_ir::ModuleTuple;
use htt_sector::Resolution;

/// Counts sector lookups and how many of them were ambiguous.
///
/// Frequent ambiguity means the sector bank is under-populated for the
/// generation sample; it is logged as a warning, at doubling intervals so a
/// long run does not flood the log.
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionStats {
    pub lookups: usize,
    pub ambiguous: usize,
    pub not_found: usize,
    /// Collision warnings logged so far.
    pub warnings: usize,
    warn_fraction: f64,
    min_lookups: usize,
    next_warn_at: usize,
}

impl CollisionStats {
    pub(crate) fn new(warn_fraction: f64, min_lookups: usize) -> Self {
        CollisionStats {
            lookups: 0,
            ambiguous: 0,
            not_found: 0,
            warnings: 0,
            warn_fraction,
            min_lookups,
            next_warn_at: 1,
        }
    }

    /// Fraction of lookups that matched more than one sector.
    #[allow(
        clippy::cast_precision_loss,
        reason = "lookup counts stay far below 2^52"
    )]
    pub fn ambiguous_rate(&self) -> f64 {
        if self.lookups == 0 {
            0.0
        } else {
            self.ambiguous as f64 / self.lookups as f64
        }
    }

    pub(crate) fn record(&mut self, resolution: Resolution, modules: &ModuleTuple) {
        self.lookups += 1;
        match resolution {
            Resolution::Unique(_) => {}
            Resolution::NotFound => self.not_found += 1,
            Resolution::Ambiguous { sector, matches } => {
                self.ambiguous += 1;
                tracing::debug!(%modules, %sector, matches, "modules match several sectors, using lowest id");
                if self.should_warn() {
                    tracing::warn!(
                        ambiguous = self.ambiguous,
                        lookups = self.lookups,
                        rate = self.ambiguous_rate(),
                        "frequent sector collisions: sector bank is under-populated for this sample"
                    );
                    self.warnings += 1;
                    self.next_warn_at = self.ambiguous.saturating_mul(2);
                }
            }
        }
    }

    fn should_warn(&self) -> bool {
        self.lookups >= self.min_lookups
            && self.ambiguous >= self.next_warn_at
            && self.ambiguous_rate() > self.warn_fraction
    }
}
