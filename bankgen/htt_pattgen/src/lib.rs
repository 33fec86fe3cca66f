//! Pattern generation for Hough-transform track-trigger banks.
//!
//! A [`PatternGenerator`] pulls events through a [`CandidateGenerator`],
//! checks each candidate against the [`ConstraintPolicy`], resolves its
//! sector through a shared sector bank, and picks one candidate with its
//! own random stream. Every call yields exactly one [`Outcome`].
//!
//! ```text
//! EventSource ──► CandidateGenerator ──► PatternGenerator ──► Outcome
//!                  (TruthGenerator)        │
//!                                          ├─ ConstraintPolicy
//!                                          ├─ SectorResolver
//!                                          └─ Selector + RandomSource
//! ```

mod config;
mod constraint;
mod driver;
mod error;
mod generator;
mod outcome;
mod random;
mod select;
mod source;

pub use config::{PattGenConfig, SelectionPolicy};
pub use constraint::{ConstraintPolicy, Violation};
pub use driver::{CollisionStats, PatternGenerator};
pub use error::{ConfigError, SourceError};
pub use generator::{CandidateGenerator, Generated, TruthGenerator};
pub use outcome::{FatalReason, Outcome};
pub use random::{RandomSource, RngSource};
pub use select::Selector;
pub use source::{EventSource, LayerQuantizer, PreQuantized, VecSource};
