//! Placement strategy selector
//!
//! Wire names are kebab-case (`first-fit`, `best-fit`, ...) to match the
//! `allocationType` field posted by the browser form.

use crate::error::{BlockfitError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which block a process is placed into
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Lowest-indexed block with enough room
    #[default]
    FirstFit,
    /// Block with the least remaining room that still fits
    BestFit,
    /// Block with the most remaining room
    WorstFit,
    /// Like first-fit, but resumes scanning at the last block used
    NextFit,
    /// Highest-indexed block with enough room
    LastFit,
}

impl Strategy {
    /// All strategies in presentation order
    pub const ALL: [Strategy; 5] = [
        Strategy::FirstFit,
        Strategy::BestFit,
        Strategy::WorstFit,
        Strategy::NextFit,
        Strategy::LastFit,
    ];

    /// Wire name (`allocationType` value)
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::FirstFit => "first-fit",
            Strategy::BestFit => "best-fit",
            Strategy::WorstFit => "worst-fit",
            Strategy::NextFit => "next-fit",
            Strategy::LastFit => "last-fit",
        }
    }

    /// One-line description shown next to the selector
    pub fn description(&self) -> &'static str {
        match self {
            Strategy::FirstFit => "Pick the first block large enough for the process.",
            Strategy::BestFit => {
                "Pick the smallest block large enough for the process, to minimise leftover space."
            }
            Strategy::WorstFit => {
                "Pick the largest block, to keep the most space available in what remains."
            }
            Strategy::NextFit => {
                "Like first-fit, but start searching from the block used for the previous process."
            }
            Strategy::LastFit => "Pick the last block large enough for the process.",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = BlockfitError;

    /// Accepts the wire names, case-insensitive, with `-` or `_` separators
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "first-fit" | "firstfit" => Ok(Strategy::FirstFit),
            "best-fit" | "bestfit" => Ok(Strategy::BestFit),
            "worst-fit" | "worstfit" => Ok(Strategy::WorstFit),
            "next-fit" | "nextfit" => Ok(Strategy::NextFit),
            "last-fit" | "lastfit" => Ok(Strategy::LastFit),
            _ => Err(BlockfitError::UnknownStrategy(s.to_string())),
        }
    }
}
