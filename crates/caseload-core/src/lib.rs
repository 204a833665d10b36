//! Core computational engine for caseload-monitor.
//!
//! Pure, request-scoped logic: operator-name normalization, identity
//! reconciliation against the per-process directories, and the regression /
//! trend-classification math. Nothing here performs I/O or holds state
//! between calls; the data layer hands in already-resolved rows and consumes
//! plain values back.

pub mod error;
pub mod formatting;
pub mod matcher;
pub mod models;
pub mod normalize;
pub mod regression;
pub mod settings;
pub mod trend;
