use std::sync::Arc;

use htt_ir::{GeneratedPattern, ModuleId, QuantizedHit, SectorId, Ssid};
use htt_pattgen::{
    EventSource, PattGenConfig, PatternGenerator, PreQuantized, SourceError, TruthGenerator,
    VecSource,
};
use htt_sector::SectorBank;
use pretty_assertions::assert_eq;

use super::*;

fn hit(layer: usize, ssid: u32, module: u32) -> QuantizedHit {
    QuantizedHit::new(layer, Ssid::new(ssid), ModuleId::new(module))
}

fn bank() -> Arc<SectorBank> {
    let sectors = [[10, 11, 12], [20, 21, 22]]
        .into_iter()
        .map(|sector| sector.into_iter().map(ModuleId::new).collect());
    match SectorBank::from_sectors(3, sectors) {
        Ok(bank) => Arc::new(bank),
        Err(err) => panic!("bank rejected: {err}"),
    }
}

/// Sector 0 fully hit, sector 1 missing layer 1, and an unknown module.
fn events() -> Vec<Vec<QuantizedHit>> {
    vec![
        vec![hit(0, 1, 10), hit(1, 2, 11), hit(2, 3, 12)],
        vec![hit(0, 4, 20), hit(2, 6, 22)],
        vec![hit(0, 1, 10), hit(1, 2, 99), hit(2, 3, 12)],
        vec![hit(0, 4, 20)],
    ]
}

fn driver<S: EventSource<Hit = QuantizedHit>>(
    source: S,
    seed: u64,
) -> PatternGenerator<TruthGenerator<S, PreQuantized>> {
    let Ok(generator) = TruthGenerator::new(source, PreQuantized, 3) else {
        panic!("generator rejected");
    };
    let config = PattGenConfig::default().with_max_wildcards(1).with_seed(seed);
    match PatternGenerator::new(generator, bank(), &config) {
        Ok(driver) => driver,
        Err(err) => panic!("driver rejected: {err}"),
    }
}

#[test]
fn test_run_collects_patterns_and_counts() {
    let mut driver = driver(VecSource::new(events()), 1);
    let mut sink: Vec<GeneratedPattern> = Vec::new();
    let stats = BankGenRun::default().run(&mut driver, &mut sink);

    assert_eq!(stats.trials, 4);
    assert_eq!(stats.patterns, 2);
    assert_eq!(stats.failed, 2);
    assert_eq!(stats.sector_not_found, 1);
    assert_eq!(stats.constraint, 1);
    assert_eq!(stats.patterns_by_wildcards, vec![1, 1, 1, 0]);
    assert_eq!(stats.wildcards_per_layer, vec![0, 1, 0]);
    assert_eq!(stats.truth_misses, vec![2, 1, 1, 0]);

    let sectors: Vec<_> = sink.iter().map(|p| p.sector).collect();
    assert_eq!(sectors, [SectorId::new(0), SectorId::new(1)]);
    assert!(driver.is_exhausted());
}

/// Serves events in order, failing once at `fail_at`.
struct Flaky {
    events: Vec<Vec<QuantizedHit>>,
    fail_at: usize,
    position: usize,
}

impl EventSource for Flaky {
    type Hit = QuantizedHit;

    fn next_event(&mut self) -> Result<Option<Vec<QuantizedHit>>, SourceError> {
        let position = self.position;
        self.position += 1;
        if position == self.fail_at {
            return Err(SourceError::new(position, "corrupt record"));
        }
        let index = if position > self.fail_at { position - 1 } else { position };
        Ok(self.events.get(index).cloned())
    }

    fn position(&self) -> usize {
        self.position
    }
}

fn flaky() -> Flaky {
    Flaky {
        events: events(),
        fail_at: 1,
        position: 0,
    }
}

#[test]
fn test_source_error_stops_run() {
    let mut driver = driver(flaky(), 1);
    let mut sink: Vec<GeneratedPattern> = Vec::new();
    let stats = BankGenRun::default().run(&mut driver, &mut sink);

    assert_eq!(stats.trials, 2);
    assert_eq!(stats.source_errors, 1);
    assert_eq!(sink.len(), 1);
    assert!(!driver.is_exhausted());
}

#[test]
fn test_source_error_can_be_skipped() {
    let mut driver = driver(flaky(), 1);
    let mut sink: Vec<GeneratedPattern> = Vec::new();
    let config = RunConfig::default()
        .with_stop_on_source_error(false)
        .with_progress_interval(1);
    let stats = BankGenRun::new(config).run(&mut driver, &mut sink);

    assert_eq!(stats.trials, 5);
    assert_eq!(stats.source_errors, 1);
    assert_eq!(stats.patterns, 2);
}

#[test]
fn test_sink_finished_once() {
    #[derive(Default)]
    struct Counting {
        added: usize,
        finished: usize,
    }
    impl PatternSink for Counting {
        fn add_pattern(&mut self, _: &GeneratedPattern) {
            self.added += 1;
        }
        fn finish(&mut self) {
            self.finished += 1;
        }
    }

    let mut driver = driver(VecSource::new(events()), 1);
    let mut sink = Counting::default();
    BankGenRun::new(RunConfig::default().with_progress_interval(0)).run(&mut driver, &mut sink);
    assert_eq!((sink.added, sink.finished), (2, 1));
}

#[test]
fn test_partitioned_run_keeps_order_and_merges() {
    let workers: Vec<_> = (0..4)
        .map(|index| {
            let mut slice = events();
            slice.truncate(index + 1);
            let seed = seed_for_worker(42, index);
            (driver(VecSource::new(slice), seed), Vec::<GeneratedPattern>::new())
        })
        .collect();

    let report = BankGenRun::default().run_partitioned(workers);

    let indices: Vec<_> = report.workers.iter().map(|w| w.index).collect();
    assert_eq!(indices, [0, 1, 2, 3]);
    let trials: Vec<_> = report.workers.iter().map(|w| w.stats.trials).collect();
    assert_eq!(trials, [1, 2, 3, 4]);
    let patterns: Vec<_> = report.workers.iter().map(|w| w.sink.len()).collect();
    assert_eq!(patterns, [1, 2, 2, 2]);

    assert_eq!(report.total.trials, 10);
    assert_eq!(report.total.patterns, 7);
    assert_eq!(report.total.sector_not_found, 2);
    assert_eq!(report.total.constraint, 1);
}

#[test]
fn test_worker_seeds_differ() {
    let seeds: Vec<_> = (0..64).map(|index| seed_for_worker(7, index)).collect();
    let mut unique = seeds.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), seeds.len());
    assert_eq!(seed_for_worker(7, 3), seeds[3]);
    assert_ne!(seed_for_worker(8, 3), seeds[3]);
}
