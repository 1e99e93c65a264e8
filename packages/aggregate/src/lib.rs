#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Aggregation cycles and snapshot publication.
//!
//! A cycle fans one fetch out per catalog area, waits for every outcome
//! (successes and failures alike), and assembles a complete `Snapshot`.
//! Snapshots are published as atomic whole-value replacements through a
//! watch channel; the recurring scheduler owns the cycle cadence and its
//! own teardown.

pub mod cycle;
pub mod feed;
pub mod scheduler;

pub use cycle::{AreaFailure, CycleOutcome, run_cycle};
pub use feed::SnapshotFeed;
pub use scheduler::Scheduler;
