//! Top-level report pipeline.
//!
//! Orchestrates classification, aggregation, series assembly, trend badges,
//! and movers ranking over one set of collaborator rows, returning a
//! [`ReportResult`] ready for the presentation layer.

use std::collections::HashSet;

use caseload_core::matcher::IdentityMatcher;
use caseload_core::models::{Classification, DirectoryEntry, Granularity, HistoricalSeriesRow, RawCountRow};
use caseload_core::normalize::normalize;
use caseload_core::trend::{classify_trend, Trend};
use chrono::Utc;
use tracing::debug;

use crate::aggregator::{PeriodAggregator, PeriodReport};
use crate::movers::{MoversConfig, MoversRanker, MoversReport};
use crate::snapshots::build_series;

// ── Public types ──────────────────────────────────────────────────────────────

/// Everything one report run consumes, as supplied by the collaborators.
#[derive(Debug, Clone, Default)]
pub struct ReportInput {
    pub own_directory: Vec<DirectoryEntry>,
    pub other_directory: Vec<DirectoryEntry>,
    pub count_rows: Vec<RawCountRow>,
    pub historical: Vec<HistoricalSeriesRow>,
}

/// One distinct operator from the raw rows with its reconciliation outcome.
#[derive(Debug, Clone)]
pub struct ClassifiedOperator {
    /// First-seen raw spelling of the name.
    pub raw_name: String,
    /// Normalized comparison key.
    pub operator_key: String,
    pub classification: Classification,
}

/// One operator's trend badge derived from its snapshot series.
#[derive(Debug, Clone)]
pub struct OperatorTrend {
    pub operator_key: String,
    pub trend: Trend,
}

/// Metadata produced alongside the report result.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ReportMetadata {
    /// ISO-8601 timestamp when this result was generated.
    pub generated_at: String,
    /// Total number of raw count rows supplied.
    pub rows_supplied: usize,
    /// Count rows rejected as malformed.
    pub rows_skipped: usize,
    /// Snapshot date entries rejected as malformed.
    pub snapshot_entries_skipped: usize,
    /// Number of distinct operators classified.
    pub operators_classified: usize,
    /// Wall-clock seconds spent classifying and aggregating.
    pub aggregate_time_seconds: f64,
    /// Wall-clock seconds spent on series assembly, trends, and movers.
    pub trend_time_seconds: f64,
}

/// The complete output of [`run_report`].
#[derive(Debug, Clone)]
pub struct ReportResult {
    /// Period table at the requested granularity.
    pub periods: PeriodReport,
    /// Reconciliation outcome per distinct operator, in first-seen order.
    pub operators: Vec<ClassifiedOperator>,
    /// Trend badge per operator with snapshot history, in key order.
    pub trends: Vec<OperatorTrend>,
    /// Top movers over the recent window.
    pub movers: MoversReport,
    pub metadata: ReportMetadata,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full report pipeline.
///
/// 1. Classify every distinct operator in the raw rows against both
///    directories.
/// 2. Aggregate the parseable rows into the period table.
/// 3. Assemble snapshot series and compute a trend badge per operator.
/// 4. Rank movers over the configured window.
///
/// Purely computational: the caller supplies already-resolved rows and owns
/// cancellation. Malformed rows degrade to skip counts in the metadata,
/// never to a failure.
pub fn run_report(
    input: &ReportInput,
    granularity: Granularity,
    movers_config: MoversConfig,
) -> ReportResult {
    // ── Step 1: Classification ───────────────────────────────────────────────
    let aggregate_start = std::time::Instant::now();
    let matcher = IdentityMatcher::with_defaults();
    let mut seen: HashSet<String> = HashSet::new();
    let mut operators: Vec<ClassifiedOperator> = Vec::new();
    for row in &input.count_rows {
        let key = normalize(&row.operator);
        if !seen.insert(key.clone()) {
            continue;
        }
        let classification =
            matcher.classify(&row.operator, &input.own_directory, &input.other_directory);
        operators.push(ClassifiedOperator {
            raw_name: row.operator.clone(),
            operator_key: key,
            classification,
        });
    }

    // ── Step 2: Period table ─────────────────────────────────────────────────
    let periods = PeriodAggregator::aggregate(&input.count_rows, granularity);
    let aggregate_time = aggregate_start.elapsed().as_secs_f64();

    // ── Step 3: Series and trends ────────────────────────────────────────────
    let trend_start = std::time::Instant::now();
    let snapshot_result = build_series(&input.historical);
    let trends: Vec<OperatorTrend> = snapshot_result
        .series
        .iter()
        .map(|s| OperatorTrend {
            operator_key: s.operator_key.clone(),
            trend: classify_trend(&s.values()),
        })
        .collect();

    // ── Step 4: Movers ───────────────────────────────────────────────────────
    let movers = MoversRanker::new(movers_config).rank(&snapshot_result.series);
    let trend_time = trend_start.elapsed().as_secs_f64();

    debug!(
        "Report: {} operators, {} period rows, {} trends, {}+{} movers",
        operators.len(),
        periods.summaries.len(),
        trends.len(),
        movers.top_increasing.len(),
        movers.top_decreasing.len()
    );

    let metadata = ReportMetadata {
        generated_at: Utc::now().to_rfc3339(),
        rows_supplied: input.count_rows.len(),
        rows_skipped: periods.rows_skipped,
        snapshot_entries_skipped: snapshot_result.entries_skipped,
        operators_classified: operators.len(),
        aggregate_time_seconds: aggregate_time,
        trend_time_seconds: trend_time,
    };

    ReportResult {
        periods,
        operators,
        trends,
        movers,
        metadata,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
