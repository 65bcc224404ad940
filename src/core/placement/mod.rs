//! Placement policies for fixed-size blocks
//!
//! Each [`Strategy`] maps to one [`Placement`] implementation:
//! - [`sequential`]: position-driven policies (first-fit, next-fit, last-fit)
//! - [`ranked`]: size-driven policies (best-fit, worst-fit)
//!
//! Policies are created fresh for every allocation run. Only next-fit keeps
//! state (its cursor), and that state dies with the run.

pub mod ranked;
pub mod sequential;

use crate::core::pool::BlockPool;
use crate::core::strategy::Strategy;

pub use ranked::{BestFit, WorstFit};
pub use sequential::{FirstFit, LastFit, NextFit};

/// Block selection policy
///
/// Defines how a block is chosen for one process request.
pub trait Placement {
    /// Choose a block with at least `size` free, or `None` if no block fits
    ///
    /// Must not return an index whose block cannot hold `size`.
    fn select(&mut self, pool: &BlockPool, size: u64) -> Option<usize>;

    /// Called after the process was placed into `index`
    fn placed(&mut self, _index: usize) {}

    /// Strategy this policy implements
    fn strategy(&self) -> Strategy;
}

/// Build a fresh policy for one allocation run
pub fn for_strategy(strategy: Strategy) -> Box<dyn Placement> {
    match strategy {
        Strategy::FirstFit => Box::new(FirstFit),
        Strategy::BestFit => Box::new(BestFit),
        Strategy::WorstFit => Box::new(WorstFit),
        Strategy::NextFit => Box::new(NextFit::new()),
        Strategy::LastFit => Box::new(LastFit),
    }
}
