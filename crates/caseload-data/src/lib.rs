//! Data layer for caseload-monitor.
//!
//! Responsible for discovering and loading the collaborator JSON exports,
//! aggregating count rows into period tables, assembling snapshot series,
//! ranking movers, and running the top-level report pipeline.

pub mod aggregator;
pub mod analysis;
pub mod dates;
pub mod movers;
pub mod reader;
pub mod snapshots;

pub use caseload_core as core;
