//! Error types for blockfit operations

use thiserror::Error;

/// blockfit operation errors
///
/// Only [`BlockfitError::InvalidInput`], [`BlockfitError::UnknownStrategy`] and
/// [`BlockfitError::LimitExceeded`] can surface from a request. A process that
/// does not fit any block is not an error: it is reported as
/// [`crate::AllocationOutcome::Rejected`].
#[derive(Error, Debug)]
pub enum BlockfitError {
    /// A supplied size or list is malformed (negative, fractional, non-numeric)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Allocation type is not one of the five known strategies
    #[error("Unknown allocation type '{0}' (expected first-fit, best-fit, worst-fit, next-fit or last-fit)")]
    UnknownStrategy(String),

    /// Request exceeds a configured service limit
    #[error("Too many {what}: {len} (max {max})")]
    LimitExceeded {
        what: &'static str,
        len: usize,
        max: usize,
    },

    /// Block index does not exist in the pool
    #[error("Invalid block index: {0}")]
    BlockIndexOutOfRange(usize),

    /// Block does not have enough free space for the requested size
    #[error("Block {index} has {remaining} free, cannot place {size}")]
    InsufficientCapacity {
        index: usize,
        remaining: u64,
        size: u64,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl BlockfitError {
    /// True for every error the caller can fix by correcting the request
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            BlockfitError::InvalidInput(_)
                | BlockfitError::UnknownStrategy(_)
                | BlockfitError::LimitExceeded { .. }
        )
    }

    /// Short machine-readable kind, used in HTTP error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            BlockfitError::InvalidInput(_) => "invalid_input",
            BlockfitError::UnknownStrategy(_) => "unknown_strategy",
            BlockfitError::LimitExceeded { .. } => "limit_exceeded",
            BlockfitError::BlockIndexOutOfRange(_) | BlockfitError::InsufficientCapacity { .. } => {
                "internal"
            }
            BlockfitError::Config(_) | BlockfitError::Toml(_) => "config",
            BlockfitError::Io(_) => "io",
            BlockfitError::Serialization(_) => "malformed_json",
        }
    }
}

pub type Result<T> = std::result::Result<T, BlockfitError>;
