//! Wire shapes and derived views of an allocation run
//!
//! Request and response field names are camelCase to match the browser form:
//!
//! ```text
//! POST /allocate
//! { "blockSizes": [...], "processSizes": [...], "allocationType": "best-fit" }
//!
//! 200 OK
//! { "allocations": [3, 1, -1], "remainingBlocks": [...], "fragmentations": [[...], ...] }
//! ```

use crate::core::engine::{AllocationOutcome, AllocationResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body as posted, before validation
///
/// Sizes stay as raw JSON values so that validation can report exactly which
/// entry is malformed instead of failing the whole body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAllocationRequest {
    pub block_sizes: Vec<Value>,
    pub process_sizes: Vec<Value>,
    pub allocation_type: String,
}

/// Response body for `POST /allocate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationResponse {
    /// Block index per process, `-1` for a rejection
    pub allocations: Vec<i64>,

    /// Free space per block after the run
    pub remaining_blocks: Vec<u64>,

    /// Free space per block after each process
    pub fragmentations: Vec<Vec<u64>>,
}

/// Response body for `POST /allocate?detail=true`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedResponse {
    #[serde(flatten)]
    pub response: AllocationResponse,
    pub allocation_type: String,
    pub stats: AllocationStats,
    pub blocks: Vec<BlockUsage>,
}

/// One block in the block diagram
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockUsage {
    pub index: usize,
    pub capacity: u64,
    pub remaining: u64,
    /// 0-based indices of the processes placed in this block, in input order
    pub processes: Vec<usize>,
}

impl BlockUsage {
    pub fn used(&self) -> u64 {
        self.capacity - self.remaining
    }

    /// Diagram label, e.g. `"P1, P3"` (processes are numbered from 1)
    pub fn label(&self) -> String {
        self.processes
            .iter()
            .map(|p| format!("P{}", p + 1))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Totals over an allocation run
///
/// Byte totals are `u128` since the sum of `u64` capacities can exceed `u64::MAX`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationStats {
    pub total_capacity: u128,
    pub total_allocated: u128,
    pub total_free: u128,
    pub assigned: usize,
    pub rejected: usize,
    /// Largest single free block after the run (0 for an empty pool)
    pub largest_free_block: u64,
    /// Allocated / capacity, 0.0 for an empty or zero-capacity pool
    pub utilization: f64,
}

impl AllocationResult {
    /// Wire response
    pub fn to_response(&self) -> AllocationResponse {
        AllocationResponse {
            allocations: self.outcomes.iter().map(AllocationOutcome::to_wire).collect(),
            remaining_blocks: self.remaining.clone(),
            fragmentations: self.fragmentations.clone(),
        }
    }

    /// Wire response with statistics and the block diagram
    pub fn to_detailed_response(&self) -> DetailedResponse {
        DetailedResponse {
            response: self.to_response(),
            allocation_type: self.strategy.as_str().to_string(),
            stats: self.stats(),
            blocks: self.block_usage(),
        }
    }

    /// Per-block view: capacity, what is left, and which processes landed there
    pub fn block_usage(&self) -> Vec<BlockUsage> {
        let mut usage: Vec<BlockUsage> = self
            .capacities
            .iter()
            .zip(&self.remaining)
            .enumerate()
            .map(|(index, (&capacity, &remaining))| BlockUsage {
                index,
                capacity,
                remaining,
                processes: Vec::new(),
            })
            .collect();

        for (process, outcome) in self.outcomes.iter().enumerate() {
            if let Some(block) = outcome.block().and_then(|b| usage.get_mut(b)) {
                block.processes.push(process);
            }
        }

        usage
    }

    /// Totals over the run
    pub fn stats(&self) -> AllocationStats {
        let total_capacity: u128 = self.capacities.iter().map(|&c| u128::from(c)).sum();
        let total_free: u128 = self.remaining.iter().map(|&r| u128::from(r)).sum();
        let total_allocated = total_capacity.saturating_sub(total_free);
        let assigned = self.outcomes.iter().filter(|o| o.is_assigned()).count();

        let utilization = if total_capacity == 0 {
            0.0
        } else {
            total_allocated as f64 / total_capacity as f64
        };

        AllocationStats {
            total_capacity,
            total_allocated,
            total_free,
            assigned,
            rejected: self.rejected(),
            largest_free_block: self.remaining.iter().copied().max().unwrap_or(0),
            utilization,
        }
    }

    /// Number of processes that fit nowhere
    pub fn rejected(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_assigned()).count()
    }

    /// Sum of the sizes of every assigned process
    pub fn assigned_size(&self) -> u128 {
        self.outcomes
            .iter()
            .zip(&self.process_sizes)
            .filter(|(outcome, _)| outcome.is_assigned())
            .map(|(_, &size)| u128::from(size))
            .sum()
    }
}
