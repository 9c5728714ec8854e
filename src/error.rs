use thiserror::Error;

/// Errors raised while building or querying a tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VPTreeError {
    #[error("cannot build a tree from empty data")]
    EmptyData,

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    /// Asked for more samples than the population holds.
    #[error("cannot sample {requested} items from a population of {population}")]
    SampleSizeError { requested: usize, population: usize },
}

pub type Result<T> = std::result::Result<T, VPTreeError>;
