//! Position-driven policies: first-fit, next-fit, last-fit

use super::Placement;
use crate::core::pool::BlockPool;
use crate::core::strategy::Strategy;

/// Lowest index among blocks that fit
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstFit;

impl Placement for FirstFit {
    fn select(&mut self, pool: &BlockPool, size: u64) -> Option<usize> {
        pool.candidates(size).next()
    }

    fn strategy(&self) -> Strategy {
        Strategy::FirstFit
    }
}

/// Highest index among blocks that fit
#[derive(Debug, Clone, Copy, Default)]
pub struct LastFit;

impl Placement for LastFit {
    fn select(&mut self, pool: &BlockPool, size: u64) -> Option<usize> {
        pool.candidates(size).next_back()
    }

    fn strategy(&self) -> Strategy {
        Strategy::LastFit
    }
}

/// First fitting block scanning from the cursor, wrapping to index 0
///
/// The cursor is the block of the previous successful placement. The next
/// scan starts AT that block (inclusive), so a block that still has room keeps
/// receiving processes until it fills up.
#[derive(Debug, Clone, Copy, Default)]
pub struct NextFit {
    cursor: usize,
}

impl NextFit {
    pub fn new() -> Self {
        NextFit { cursor: 0 }
    }

    /// Index the next scan starts from
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl Placement for NextFit {
    fn select(&mut self, pool: &BlockPool, size: u64) -> Option<usize> {
        let len = pool.len();
        if len == 0 {
            return None;
        }

        let start = self.cursor.min(len - 1);
        (start..len)
            .chain(0..start)
            .find(|&index| pool.fits(index, size))
            .or_else(|| pool.candidates(size).next())
    }

    fn placed(&mut self, index: usize) {
        self.cursor = index;
    }

    fn strategy(&self) -> Strategy {
        Strategy::NextFit
    }
}
