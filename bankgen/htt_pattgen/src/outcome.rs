//! Per-event result of the generation driver.

use std::fmt;

use htt_ir::{GeneratedPattern, ModuleTuple, Pattern};

use crate::{SourceError, Violation};

/// Result of one `PatternGenerator::next` call.
///
/// Exactly one outcome is produced per call; none of them abort the run.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// A pattern was generated, resolved and selected.
    Ok {
        pattern: GeneratedPattern,
        wildcards: usize,
    },
    /// The event produced no candidates.
    Empty,
    /// The candidate broke the wildcard policy.
    ConstraintViolated {
        violation: Violation,
        wildcards: usize,
    },
    /// No more events. Returned again on every later call.
    EndOfInput,
    /// Data or coverage problem that needs operator attention.
    Fatal(FatalReason),
}

impl Outcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok { .. })
    }

    pub fn is_end_of_input(&self) -> bool {
        matches!(self, Outcome::EndOfInput)
    }

    /// Short name used in logs and statistics.
    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Ok { .. } => "ok",
            Outcome::Empty => "empty",
            Outcome::ConstraintViolated { .. } => "constraint",
            Outcome::EndOfInput => "end-of-input",
            Outcome::Fatal(_) => "fatal",
        }
    }
}

/// Why an event ended in `Outcome::Fatal`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FatalReason {
    /// The bank has no sector for these modules; more training sectors are needed.
    SectorNotFound {
        modules: ModuleTuple,
        pattern: Pattern,
    },
    /// The event source failed to deliver the event.
    SourceRead(SourceError),
}

impl fmt::Display for FatalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FatalReason::SectorNotFound { modules, pattern } => {
                write!(f, "pattern {pattern} with modules {modules} matched no sector")
            }
            FatalReason::SourceRead(err) => write!(f, "{err}"),
        }
    }
}
