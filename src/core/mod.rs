//! Allocation core
//!
//! - [`strategy`] - the five placement strategies and their wire names
//! - [`pool`] - per-run block capacities and remaining free space
//! - [`placement`] - one selection policy per strategy
//! - [`engine`] - the single-pass allocation run
//! - [`validation`] - fail-fast input validation
//! - [`report`] - wire shapes, statistics and the block diagram view

pub mod engine;
pub mod placement;
pub mod pool;
pub mod report;
pub mod strategy;
pub mod validation;
