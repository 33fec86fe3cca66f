//! HTT Sector - read-only sector bank and reverse sector lookup.
//!
//! A sector is identified by the module it expects in every logical layer.
//! Bank generation needs the inverse: given the modules a track actually
//! crossed, which sector does it belong to?
//!
//! # Lookup
//!
//! - Fully-populated queries hit an exact-tuple hash map.
//! - Queries with "don't care" layers (`ModuleId::NONE`) go through a
//!   per-layer inverted index, starting from the shortest posting list.
//!
//! When several sectors match a partially-wildcarded query the lowest
//! sector id wins, and the match is reported as `Resolution::Ambiguous` so
//! callers can flag an under-populated bank.

mod bank;
mod resolve;

pub use bank::{BankError, SectorBank};
pub use resolve::{Resolution, SectorResolver};
