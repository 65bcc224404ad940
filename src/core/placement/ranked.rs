//! Size-driven policies: best-fit, worst-fit
//!
//! Both rank candidates by remaining free space. Ties always go to the lowest
//! block index.

use super::Placement;
use crate::core::pool::BlockPool;
use crate::core::strategy::Strategy;
use std::cmp::Reverse;

/// Candidate with the least remaining space
#[derive(Debug, Clone, Copy, Default)]
pub struct BestFit;

impl Placement for BestFit {
    fn select(&mut self, pool: &BlockPool, size: u64) -> Option<usize> {
        let remaining = pool.remaining();
        // min_by_key keeps the first of equal keys
        pool.candidates(size).min_by_key(|&index| remaining[index])
    }

    fn strategy(&self) -> Strategy {
        Strategy::BestFit
    }
}

/// Candidate with the most remaining space
#[derive(Debug, Clone, Copy, Default)]
pub struct WorstFit;

impl Placement for WorstFit {
    fn select(&mut self, pool: &BlockPool, size: u64) -> Option<usize> {
        let remaining = pool.remaining();
        // max_by_key keeps the last of equal keys, so break ties on the index
        pool.candidates(size)
            .max_by_key(|&index| (remaining[index], Reverse(index)))
    }

    fn strategy(&self) -> Strategy {
        Strategy::WorstFit
    }
}
