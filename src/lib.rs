//! # blockfit - Fixed-Block Memory Placement
//!
//! `blockfit` places an ordered list of process requests into a set of
//! fixed-size memory blocks using one of the classic placement strategies,
//! and reports, for every step, where each process went and how much free
//! space every block has left.
//!
//! - **Five strategies**: first-fit, best-fit, worst-fit, next-fit, last-fit
//! - **Per-step fragmentation snapshots**: free space of every block after each process
//! - **Fail-fast validation** of loosely-typed input before any placement happens
//! - **HTTP service** (`blockfit-server`) exposing `POST /allocate`
//! - **CLI** (`blockfit`) printing the allocation table and block diagram
//!
//! ## Quick Start
//!
//! ```rust
//! use blockfit::{allocate, AllocationOutcome, Strategy};
//!
//! # fn main() -> blockfit::Result<()> {
//! let blocks = [100, 500, 200, 300, 600];
//! let processes = [212, 417, 112, 426];
//!
//! let result = allocate(&blocks, &processes, Strategy::BestFit)?;
//!
//! assert_eq!(result.outcomes[0], AllocationOutcome::Assigned(3));
//! assert_eq!(result.remaining, vec![100, 83, 88, 88, 174]);
//! assert_eq!(result.fragmentations.len(), processes.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Validating Wire Input
//!
//! ```rust
//! use blockfit::{AllocationRequest, RawAllocationRequest};
//!
//! let raw: RawAllocationRequest = serde_json::from_str(
//!     r#"{ "blockSizes": [100, -1], "processSizes": [], "allocationType": "first-fit" }"#,
//! ).unwrap();
//!
//! let err = AllocationRequest::try_from(raw).unwrap_err();
//! assert!(err.is_invalid_input());
//! ```
//!
//! A process that fits nowhere is not an error: it shows up as
//! [`AllocationOutcome::Rejected`] (`-1` on the wire) and the run continues.

pub mod config;
pub mod core;
pub mod error;
pub mod service;

pub use crate::config::{BlockfitConfig, Limits};
pub use crate::core::{
    engine::{allocate, AllocationEngine, AllocationOutcome, AllocationResult},
    placement::Placement,
    pool::BlockPool,
    report::{AllocationResponse, AllocationStats, BlockUsage, DetailedResponse, RawAllocationRequest},
    strategy::Strategy,
    validation::{parse_size_list, AllocationRequest},
};
pub use crate::error::{BlockfitError, Result};
pub use crate::service::AllocationService;
