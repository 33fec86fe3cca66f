//! Bank generation: run pattern generators to completion and monitor them.
//!
//! # Tracing
//!
//! Call [`init_tracing`] once at startup, then control output with
//! `RUST_LOG`:
//! - `RUST_LOG=htt_bankgen=info`: progress lines and run summaries.
//! - `RUST_LOG=htt_pattgen=debug`: per-event rejections and sector collisions.
//! - `RUST_LOG=htt_pattgen=trace`: every truth pattern (very verbose).

mod run;
mod sink;
mod stats;

use std::sync::Once;

pub use run::{seed_for_worker, BankGenRun, PartitionedReport, RunConfig, WorkerReport};
pub use sink::PatternSink;
pub use stats::GenerationStats;

static TRACING_INIT: Once = Once::new();

/// Install a `RUST_LOG`-filtered tracing subscriber.
///
/// Does nothing when `RUST_LOG` is unset or on repeated calls.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
