//! Per-run working copy of block capacities
//!
//! A [`BlockPool`] is created from the caller's capacities at the start of an
//! allocation run and owned by that run alone. Blocks are never split, merged
//! or resized; the only mutation is shrinking a block's remaining free space.

use crate::error::{BlockfitError, Result};

/// Fixed-size blocks with their remaining free space
///
/// Invariant: `remaining[i] <= capacities[i]` for every block, and
/// `remaining[i]` never increases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockPool {
    capacities: Vec<u64>,
    remaining: Vec<u64>,
}

impl BlockPool {
    /// Create a pool with every block completely free
    pub fn new(capacities: &[u64]) -> Self {
        BlockPool {
            capacities: capacities.to_vec(),
            remaining: capacities.to_vec(),
        }
    }

    /// Number of blocks
    pub fn len(&self) -> usize {
        self.capacities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capacities.is_empty()
    }

    /// Original capacities, in input order
    pub fn capacities(&self) -> &[u64] {
        &self.capacities
    }

    /// Current free space per block, in input order
    pub fn remaining(&self) -> &[u64] {
        &self.remaining
    }

    /// Free space of one block
    pub fn remaining_at(&self, index: usize) -> Option<u64> {
        self.remaining.get(index).copied()
    }

    /// Check whether a block can hold `size` more units
    pub fn fits(&self, index: usize, size: u64) -> bool {
        self.remaining.get(index).is_some_and(|&free| free >= size)
    }

    /// Indices of every block that can hold `size`, in ascending order
    pub fn candidates(&self, size: u64) -> impl DoubleEndedIterator<Item = usize> + '_ {
        self.remaining
            .iter()
            .enumerate()
            .filter(move |&(_, &free)| free >= size)
            .map(|(index, _)| index)
    }

    /// Place `size` units into block `index`
    pub fn assign(&mut self, index: usize, size: u64) -> Result<()> {
        let free = self
            .remaining
            .get_mut(index)
            .ok_or(BlockfitError::BlockIndexOutOfRange(index))?;

        if *free < size {
            return Err(BlockfitError::InsufficientCapacity {
                index,
                remaining: *free,
                size,
            });
        }

        *free -= size;
        Ok(())
    }

    /// Copy of the current free space per block
    pub fn snapshot(&self) -> Vec<u64> {
        self.remaining.clone()
    }

    /// Consume the pool, returning the final free space per block
    pub fn into_remaining(self) -> Vec<u64> {
        self.remaining
    }

    /// Sum of all capacities (widened: any `u64` capacities are valid)
    pub fn total_capacity(&self) -> u128 {
        self.capacities.iter().map(|&c| u128::from(c)).sum()
    }

    /// Sum of all free space
    pub fn total_free(&self) -> u128 {
        self.remaining.iter().map(|&r| u128::from(r)).sum()
    }
}
