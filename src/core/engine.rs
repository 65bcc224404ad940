//! Allocation engine
//!
//! Runs one single pass over the process list, placing each process into a
//! block chosen by the active [`Strategy`]. Every run builds its own
//! [`BlockPool`] and placement policy, so concurrent runs never share state.

use crate::core::placement::{self, Placement};
use crate::core::pool::BlockPool;
use crate::core::strategy::Strategy;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// What happened to one process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AllocationOutcome {
    /// Placed into the block with this 0-based index
    Assigned(usize),
    /// No block had enough free space; the run continued
    Rejected,
}

impl AllocationOutcome {
    /// Block index, if assigned
    pub fn block(&self) -> Option<usize> {
        match self {
            AllocationOutcome::Assigned(index) => Some(*index),
            AllocationOutcome::Rejected => None,
        }
    }

    pub fn is_assigned(&self) -> bool {
        matches!(self, AllocationOutcome::Assigned(_))
    }

    /// Wire encoding: block index, or `-1` for a rejection
    pub fn to_wire(&self) -> i64 {
        match self {
            AllocationOutcome::Assigned(index) => *index as i64,
            AllocationOutcome::Rejected => -1,
        }
    }
}

/// Result of one allocation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationResult {
    /// Strategy the run used
    pub strategy: Strategy,

    /// Block capacities the run started from
    pub capacities: Vec<u64>,

    /// Process sizes, in input order
    pub process_sizes: Vec<u64>,

    /// One outcome per process, in input order
    pub outcomes: Vec<AllocationOutcome>,

    /// Free space of every block after each process (one snapshot per process)
    pub fragmentations: Vec<Vec<u64>>,

    /// Free space of every block after the whole run
    pub remaining: Vec<u64>,
}

/// Places processes into fixed-size blocks
///
/// The engine holds no state between runs; [`AllocationEngine::run`] can
/// be called any number of times, from any number of threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllocationEngine {
    strategy: Strategy,
}

impl AllocationEngine {
    /// Create an engine for one strategy
    pub fn new(strategy: Strategy) -> Self {
        AllocationEngine { strategy }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Place every process, in order, into `blocks`
    ///
    /// Sizes are already validated (unsigned), so a run never fails for
    /// well-formed input: a process that fits nowhere is recorded as
    /// [`AllocationOutcome::Rejected`] and the run moves on.
    pub fn run(&self, blocks: &[u64], processes: &[u64]) -> Result<AllocationResult> {
        let mut pool = BlockPool::new(blocks);
        let mut policy = placement::for_strategy(self.strategy);

        let mut outcomes = Vec::with_capacity(processes.len());
        let mut fragmentations = Vec::with_capacity(processes.len());

        for &size in processes {
            let outcome = place(policy.as_mut(), &mut pool, size)?;
            outcomes.push(outcome);
            fragmentations.push(pool.snapshot());
        }

        Ok(AllocationResult {
            strategy: self.strategy,
            capacities: blocks.to_vec(),
            process_sizes: processes.to_vec(),
            outcomes,
            fragmentations,
            remaining: pool.into_remaining(),
        })
    }
}

/// Handle one process against the pool
fn place(policy: &mut dyn Placement, pool: &mut BlockPool, size: u64) -> Result<AllocationOutcome> {
    match policy.select(pool, size) {
        Some(index) => {
            pool.assign(index, size)?;
            policy.placed(index);
            Ok(AllocationOutcome::Assigned(index))
        }
        None => Ok(AllocationOutcome::Rejected),
    }
}

/// Run one allocation with the given strategy
///
/// Shorthand for `AllocationEngine::new(strategy).run(blocks, processes)`.
pub fn allocate(blocks: &[u64], processes: &[u64], strategy: Strategy) -> Result<AllocationResult> {
    AllocationEngine::new(strategy).run(blocks, processes)
}
