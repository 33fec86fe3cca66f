//! HTT IR - Core data model for pattern-bank generation.
//!
//! This crate contains the value types shared by every stage of bank
//! generation:
//! - Compact ids for super-strips (`Ssid`), modules (`ModuleId`) and sectors (`SectorId`)
//! - Per-layer patterns and module tuples, with sentinel slots for unfilled layers
//! - Quantized hits as produced by the external layer quantizer
//! - Pattern candidates and the final generated pattern handed to bank writers
//!
//! # Design Philosophy
//!
//! - **Sentinels over options**: a wildcard SSID or an absent module is a
//!   reserved raw value, so a pattern is a flat `[Ssid]` slice.
//! - **Immutable once built**: patterns and tuples are boxed slices with no
//!   mutating API; generators fill a `Vec` and freeze it.

mod candidate;
mod hit;
mod ids;
mod pattern;

pub use candidate::{Candidate, GeneratedPattern};
pub use hit::QuantizedHit;
pub use ids::{ModuleId, SectorId, Ssid};
pub use pattern::{LayerMask, ModuleTuple, Pattern};
