//! Setup and upstream error types.

/// Illegal setup, rejected before any event is processed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("number of logical layers not set")]
    NoLayers,
    #[error("{found} logical layers exceed the supported maximum of {max}")]
    TooManyLayers { found: usize, max: usize },
    #[error("max wildcards ({max_wildcards}) exceeds the number of layers ({n_layers})")]
    MaxWildcardsExceedsLayers { max_wildcards: usize, n_layers: usize },
    #[error("wildcard policy has {found} entries but expected {expected} layers")]
    WildcardPolicyLength { expected: usize, found: usize },
    #[error("{component} has {found} layers but the generator produces {expected}")]
    LayerMismatch {
        component: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("collision warning fraction {0} is outside [0, 1]")]
    CollisionFraction(f64),
}

/// Failure reading the next event from the upstream source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("event source failed at event {position}: {message}")]
pub struct SourceError {
    pub position: usize,
    pub message: String,
}

impl SourceError {
    #[cold]
    pub fn new(position: usize, message: impl Into<String>) -> Self {
        SourceError {
            position,
            message: message.into(),
        }
    }
}
