use std::sync::Arc;

use htt_ir::{Candidate, ModuleId, ModuleTuple, Pattern, QuantizedHit, SectorId, Ssid};
use htt_sector::SectorBank;
use pretty_assertions::assert_eq;

use super::*;
use crate::{EventSource, PreQuantized, SelectionPolicy, SourceError, TruthGenerator, VecSource};

type Truth = TruthGenerator<VecSource<QuantizedHit>, PreQuantized>;

fn hit(layer: usize, ssid: u32, module: u32) -> QuantizedHit {
    QuantizedHit::new(layer, Ssid::new(ssid), ModuleId::new(module))
}

fn modules(raw: &[Option<u32>]) -> ModuleTuple {
    raw.iter()
        .map(|slot| slot.map_or(ModuleId::NONE, ModuleId::new))
        .collect()
}

fn pattern(raw: &[Option<u32>]) -> Pattern {
    raw.iter()
        .map(|slot| slot.map_or(Ssid::WILDCARD, Ssid::new))
        .collect()
}

fn bank(sectors: &[[u32; 4]]) -> Arc<SectorBank> {
    let tuples = sectors
        .iter()
        .map(|sector| sector.iter().copied().map(ModuleId::new).collect());
    match SectorBank::from_sectors(4, tuples) {
        Ok(bank) => Arc::new(bank),
        Err(err) => panic!("bank rejected: {err}"),
    }
}

fn truth(events: Vec<Vec<QuantizedHit>>) -> Truth {
    match TruthGenerator::new(VecSource::new(events), PreQuantized, 4) {
        Ok(generator) => generator,
        Err(err) => panic!("generator rejected: {err}"),
    }
}

fn driver(
    events: Vec<Vec<QuantizedHit>>,
    sectors: Arc<SectorBank>,
    config: &PattGenConfig,
) -> PatternGenerator<Truth> {
    match PatternGenerator::new(truth(events), sectors, config) {
        Ok(driver) => driver,
        Err(err) => panic!("driver rejected: {err}"),
    }
}

/// Hits in layers 0, 1 and 3; layer 2 is empty.
fn three_layer_event() -> Vec<QuantizedHit> {
    vec![hit(0, 5, 100), hit(1, 9, 101), hit(3, 2, 103)]
}

fn full_event() -> Vec<QuantizedHit> {
    vec![hit(0, 5, 100), hit(1, 9, 101), hit(2, 7, 102), hit(3, 2, 103)]
}

#[test]
fn test_missing_layer_resolves_to_sector() {
    let config = PattGenConfig::default().with_max_wildcards(1);
    let mut driver = driver(
        vec![three_layer_event()],
        bank(&[[1, 2, 3, 4], [100, 101, 102, 103]]),
        &config,
    );

    let Outcome::Ok { pattern: got, wildcards } = driver.next() else {
        panic!("expected a pattern");
    };
    assert_eq!(got.pattern, pattern(&[Some(5), Some(9), None, Some(2)]));
    assert_eq!(got.sector, SectorId::new(1));
    assert_eq!(got.coverage, 1);
    assert_eq!(wildcards, 1);

    assert_eq!(driver.pattern(), Some(&got.pattern));
    assert_eq!(driver.sector(), Some(SectorId::new(1)));
    assert_eq!(driver.wildcards(), Some(1));
    assert_eq!(driver.current(), Some(&got));
}

#[test]
fn test_wildcard_budget_exceeded() {
    let config = PattGenConfig::default().with_max_wildcards(0);
    let mut driver = driver(
        vec![three_layer_event()],
        bank(&[[100, 101, 102, 103]]),
        &config,
    );

    assert_eq!(
        driver.next(),
        Outcome::ConstraintViolated {
            violation: Violation::TooManyWildcards { count: 1, max: 0 },
            wildcards: 1,
        }
    );
    assert_eq!(driver.pattern(), None);
    assert_eq!(driver.collisions().lookups, 0, "violations never reach the bank");
}

#[test]
fn test_unknown_modules_are_fatal() {
    let mut driver = driver(
        vec![full_event()],
        bank(&[[100, 101, 102, 999]]),
        &PattGenConfig::default(),
    );

    assert_eq!(
        driver.next(),
        Outcome::Fatal(FatalReason::SectorNotFound {
            modules: modules(&[Some(100), Some(101), Some(102), Some(103)]),
            pattern: pattern(&[Some(5), Some(9), Some(7), Some(2)]),
        })
    );
    assert_eq!(driver.sector(), None);
    assert_eq!(driver.collisions().not_found, 1);
}

#[test]
fn test_end_of_input_repeats() {
    let mut driver = driver(
        vec![full_event()],
        bank(&[[100, 101, 102, 103]]),
        &PattGenConfig::default(),
    );

    assert!(driver.next().is_ok());
    assert!(!driver.is_exhausted());
    for _ in 0..3 {
        assert_eq!(driver.next(), Outcome::EndOfInput);
        assert_eq!(driver.current(), None);
    }
    assert!(driver.is_exhausted());
    assert_eq!(driver.iteration(), 4);
    assert_eq!(driver.generator().source().position(), 1);
}

#[test]
fn test_iteration_counts_every_call() {
    let config = PattGenConfig::default().with_max_wildcards(0);
    let mut driver = driver(
        vec![full_event(), three_layer_event(), full_event()],
        bank(&[[100, 101, 102, 103]]),
        &config,
    );

    let kinds: Vec<_> = (0..4).map(|_| driver.next().kind()).collect();
    assert_eq!(kinds, ["ok", "constraint", "ok", "end-of-input"]);
    assert_eq!(driver.iteration(), 4);
}

#[test]
fn test_accessors_cleared_after_failure() {
    let config = PattGenConfig::default().with_max_wildcards(0);
    let mut driver = driver(
        vec![full_event(), three_layer_event()],
        bank(&[[100, 101, 102, 103]]),
        &config,
    );

    assert!(driver.next().is_ok());
    assert!(driver.pattern().is_some());
    assert!(!driver.next().is_ok());
    assert_eq!(driver.pattern(), None);
    assert_eq!(driver.wildcards(), None);
}

#[test]
fn test_wildcard_policy_update() {
    let config = PattGenConfig::default().with_max_wildcards(1);
    let mut driver = driver(
        vec![three_layer_event(), three_layer_event()],
        bank(&[[100, 101, 102, 103]]),
        &config,
    );

    assert_eq!(
        driver.set_wildcard_policy(vec![true, false]),
        Err(ConfigError::WildcardPolicyLength {
            expected: 4,
            found: 2
        })
    );
    assert_eq!(driver.policy().allowed(), &[true; 4]);
    assert!(driver.next().is_ok());

    assert_eq!(driver.set_wildcard_policy(vec![true, true, false, true]), Ok(()));
    assert_eq!(
        driver.next(),
        Outcome::ConstraintViolated {
            violation: Violation::WildcardNotAllowed { layer: 2 },
            wildcards: 1,
        }
    );
}

#[test]
fn test_bank_layer_mismatch_rejected() {
    let Ok(small) = SectorBank::from_sectors(3, [modules(&[Some(1), Some(2), Some(3)])]) else {
        panic!("bank rejected");
    };
    let result = PatternGenerator::new(truth(vec![]), Arc::new(small), &PattGenConfig::default());
    assert!(matches!(
        result,
        Err(ConfigError::LayerMismatch {
            component: "sector bank",
            expected: 4,
            found: 3
        })
    ));
}

#[test]
fn test_invalid_config_rejected() {
    let sectors = bank(&[[100, 101, 102, 103]]);
    let too_many = PattGenConfig::default().with_max_wildcards(5);
    assert!(matches!(
        PatternGenerator::new(truth(vec![]), Arc::clone(&sectors), &too_many),
        Err(ConfigError::MaxWildcardsExceedsLayers {
            max_wildcards: 5,
            n_layers: 4
        })
    ));

    let bad_fraction = PattGenConfig::default().with_collision_warning(1.5, 10);
    assert!(matches!(
        PatternGenerator::new(truth(vec![]), sectors, &bad_fraction),
        Err(ConfigError::CollisionFraction(_))
    ));
}

#[test]
fn test_ambiguous_sector_uses_lowest_id() {
    let config = PattGenConfig::default()
        .with_max_wildcards(1)
        .with_collision_warning(0.0, 1);
    let events = vec![three_layer_event(); 4];
    let mut driver = driver(
        events,
        bank(&[[100, 101, 202, 103], [100, 101, 102, 103]]),
        &config,
    );

    for _ in 0..4 {
        let Outcome::Ok { pattern, .. } = driver.next() else {
            panic!("expected a pattern");
        };
        assert_eq!(pattern.sector, SectorId::new(0));
    }
    let collisions = driver.collisions();
    assert_eq!(collisions.lookups, 4);
    assert_eq!(collisions.ambiguous, 4);
    // Warned at the 1st, 2nd and 4th collision.
    assert_eq!(collisions.warnings, 3);
}

/// Replays a fixed list of generator results.
struct Scripted(Vec<Generated>);

impl CandidateGenerator for Scripted {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn n_layers(&self) -> usize {
        4
    }

    fn next_candidates(&mut self) -> Generated {
        if self.0.is_empty() {
            Generated::EndOfInput
        } else {
            self.0.remove(0)
        }
    }
}

fn candidate(sector_modules: [u32; 4], coverage: u32) -> Candidate {
    let ssids = sector_modules.map(|m| Some(m % 10));
    Candidate::unresolved(
        pattern(&ssids),
        sector_modules.into_iter().map(ModuleId::new).collect(),
    )
    .with_coverage(coverage)
}

#[test]
fn test_weighted_selection_skips_zero_coverage() {
    let sectors = bank(&[[100, 101, 102, 103], [200, 201, 202, 203]]);
    let script = (0..20)
        .map(|_| Generated::Candidates {
            candidates: vec![candidate([100, 101, 102, 103], 0), candidate([200, 201, 202, 203], 3)],
            wildcards: 0,
        })
        .collect();
    let config = PattGenConfig::default()
        .with_selection(SelectionPolicy::Weighted)
        .with_seed(7);
    let Ok(mut driver) = PatternGenerator::new(Scripted(script), sectors, &config) else {
        panic!("driver rejected");
    };

    for _ in 0..20 {
        assert!(driver.next().is_ok());
        assert_eq!(driver.sector(), Some(SectorId::new(1)));
        assert_eq!(driver.current().map(|p| p.coverage), Some(3));
    }
}

#[test]
fn test_empty_and_failed_events() {
    let script = vec![
        Generated::Empty,
        Generated::Candidates {
            candidates: vec![],
            wildcards: 0,
        },
        Generated::Failed(SourceError::new(2, "bad record")),
    ];
    let Ok(mut driver) = PatternGenerator::new(
        Scripted(script),
        bank(&[[100, 101, 102, 103]]),
        &PattGenConfig::default(),
    ) else {
        panic!("driver rejected");
    };

    assert_eq!(driver.next(), Outcome::Empty);
    assert_eq!(driver.next(), Outcome::Empty);
    assert_eq!(
        driver.next(),
        Outcome::Fatal(FatalReason::SourceRead(SourceError::new(2, "bad record")))
    );
    assert!(!driver.is_exhausted(), "a source failure is not end of input");
    assert_eq!(driver.next(), Outcome::EndOfInput);
}

#[test]
fn test_same_seed_same_choices() {
    let run = |seed| {
        let script = (0..50)
            .map(|_| Generated::Candidates {
                candidates: vec![candidate([100, 101, 102, 103], 1), candidate([200, 201, 202, 203], 1)],
                wildcards: 0,
            })
            .collect();
        let config = PattGenConfig::default().with_seed(seed);
        let sectors = bank(&[[100, 101, 102, 103], [200, 201, 202, 203]]);
        let Ok(mut driver) = PatternGenerator::new(Scripted(script), sectors, &config) else {
            panic!("driver rejected");
        };
        (0..50)
            .filter_map(|_| {
                driver.next();
                driver.sector()
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(run(11), run(11));
    assert_eq!(run(11).len(), 50);
}

#[test]
fn test_direct_resolve_leaves_counts_alone() {
    let driver = driver(vec![], bank(&[[100, 101, 102, 103]]), &PattGenConfig::default());
    assert_eq!(
        driver.resolve(&modules(&[Some(100), None, None, Some(103)])),
        Some(SectorId::new(0))
    );
    assert_eq!(driver.resolve(&modules(&[Some(1), None, None, None])), None);
    assert_eq!(driver.collisions().lookups, 0);
    assert_eq!(driver.n_layers(), 4);
    assert_eq!(driver.max_wildcards(), 2);
}

#[test]
fn test_configured_wildcard_layers() {
    let config = PattGenConfig::default()
        .with_max_wildcards(2)
        .with_wildcard_allowed(vec![false, true, false, true]);
    let mut driver = driver(
        vec![three_layer_event()],
        bank(&[[100, 101, 102, 103]]),
        &config,
    );

    assert_eq!(driver.policy().allowed_mask().bits(), 0b1010);
    assert_eq!(
        driver.next(),
        Outcome::ConstraintViolated {
            violation: Violation::WildcardNotAllowed { layer: 2 },
            wildcards: 1,
        }
    );
}
