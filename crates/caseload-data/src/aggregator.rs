//! Period aggregation of per-operator count rows.
//!
//! Buckets dated count records into calendar periods at the requested
//! granularity and produces per-operator summaries, per-period column totals,
//! and a global grand total. Malformed rows are skipped and counted, never
//! fatal.

use std::collections::BTreeMap;

use caseload_core::models::{CountRecord, Granularity, RawCountRow};
use caseload_core::normalize::normalize;
use tracing::warn;

use crate::dates::parse_iso_date;

// ── OperatorPeriodSummary ─────────────────────────────────────────────────────

/// All period totals for one operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorPeriodSummary {
    /// Normalized operator key.
    pub operator_key: String,
    /// Period key → summed count. Keys sort lexicographically, which for the
    /// fixed-width formats produced by [`Granularity::period_key`] is also
    /// chronological order.
    pub totals_by_period: BTreeMap<String, u64>,
    /// Sum across all of this operator's periods.
    pub grand_total: u64,
}

// ── PeriodReport ──────────────────────────────────────────────────────────────

/// The full aggregation output for one report run.
#[derive(Debug, Clone, Default)]
pub struct PeriodReport {
    /// One summary per distinct operator, sorted by operator key.
    pub summaries: Vec<OperatorPeriodSummary>,
    /// Period key → sum across all operators for that period.
    pub column_totals: BTreeMap<String, u64>,
    /// Sum of every cell in the report.
    pub grand_total: u64,
    /// Rows rejected for a blank operator, unparsable date, or negative count.
    pub rows_skipped: usize,
}

// ── PeriodAggregator ──────────────────────────────────────────────────────────

/// Stateless helper that groups count rows by operator and calendar period.
pub struct PeriodAggregator;

impl PeriodAggregator {
    /// Aggregate `rows` at the given granularity.
    ///
    /// Operator names are normalized before keying, so spelling variants of
    /// the same person land in one summary. Duplicate (operator, period)
    /// cells sum. Explicit zero-count rows keep an operator present in the
    /// output; only operators entirely absent from the input are omitted.
    pub fn aggregate(rows: &[RawCountRow], granularity: Granularity) -> PeriodReport {
        let mut per_operator: BTreeMap<String, BTreeMap<String, u64>> = BTreeMap::new();
        let mut rows_skipped = 0usize;

        for row in rows {
            let Some(record) = Self::validate_row(row) else {
                rows_skipped += 1;
                continue;
            };
            let period = granularity.period_key(record.date);
            *per_operator
                .entry(record.operator_key)
                .or_default()
                .entry(period)
                .or_insert(0) += record.count;
        }

        let mut column_totals: BTreeMap<String, u64> = BTreeMap::new();
        let mut grand_total = 0u64;
        let mut summaries = Vec::with_capacity(per_operator.len());

        for (operator_key, totals_by_period) in per_operator {
            let operator_total: u64 = totals_by_period.values().sum();
            for (period, count) in &totals_by_period {
                *column_totals.entry(period.clone()).or_insert(0) += count;
            }
            grand_total += operator_total;
            summaries.push(OperatorPeriodSummary {
                operator_key,
                totals_by_period,
                grand_total: operator_total,
            });
        }

        PeriodReport {
            summaries,
            column_totals,
            grand_total,
            rows_skipped,
        }
    }

    /// Validate a single raw row, normalizing the operator name.
    ///
    /// Returns `None` (after logging) for a blank operator, a negative count,
    /// or an unparsable date.
    fn validate_row(row: &RawCountRow) -> Option<CountRecord> {
        let operator_key = normalize(&row.operator);
        if operator_key.is_empty() {
            warn!("Skipping count row with blank operator (date {})", row.date);
            return None;
        }
        if row.count < 0 {
            warn!(
                "Skipping count row with negative count {} for \"{}\"",
                row.count, row.operator
            );
            return None;
        }
        let date = parse_iso_date(&row.date)?;
        Some(CountRecord {
            operator_key,
            date,
            count: row.count as u64,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn row(operator: &str, date: &str, count: i64) -> RawCountRow {
        RawCountRow {
            operator: operator.to_string(),
            date: date.to_string(),
            count,
        }
    }

    // ── Grouping ──────────────────────────────────────────────────────────────

    #[test]
    fn test_groups_by_month() {
        let rows = vec![
            row("A", "2024-01-05", 3),
            row("A", "2024-01-20", 2),
            row("A", "2024-02-01", 7),
            row("B", "2024-01-10", 1),
        ];
        let report = PeriodAggregator::aggregate(&rows, Granularity::Month);

        assert_eq!(report.summaries.len(), 2);
        let a = &report.summaries[0];
        assert_eq!(a.operator_key, "A");
        assert_eq!(a.totals_by_period.get("2024-01"), Some(&5));
        assert_eq!(a.totals_by_period.get("2024-02"), Some(&7));
        assert_eq!(a.grand_total, 12);
        assert_eq!(report.summaries[1].grand_total, 1);
    }

    #[test]
    fn test_duplicate_date_cells_sum_not_overwrite() {
        // Two rows for the same operator and day must sum to 5, not
        // overwrite to 2.
        let rows = vec![row("A", "2024-01-05", 3), row("A", "2024-01-05", 2)];
        let report = PeriodAggregator::aggregate(&rows, Granularity::Day);

        assert_eq!(
            report.summaries[0].totals_by_period.get("2024-01-05"),
            Some(&5)
        );
    }

    #[test]
    fn test_quarter_and_year_keys() {
        let rows = vec![
            row("A", "2024-02-10", 4),
            row("A", "2024-11-01", 6),
            row("A", "2025-01-15", 1),
        ];
        let quarterly = PeriodAggregator::aggregate(&rows, Granularity::Quarter);
        let q = &quarterly.summaries[0].totals_by_period;
        assert_eq!(q.get("2024-Q1"), Some(&4));
        assert_eq!(q.get("2024-Q4"), Some(&6));
        assert_eq!(q.get("2025-Q1"), Some(&1));

        let yearly = PeriodAggregator::aggregate(&rows, Granularity::Year);
        let y = &yearly.summaries[0].totals_by_period;
        assert_eq!(y.get("2024"), Some(&10));
        assert_eq!(y.get("2025"), Some(&1));
    }

    #[test]
    fn test_operator_names_are_normalized_and_merged() {
        // Spelling variants of the same person share one summary.
        let rows = vec![
            row("Juan Pérez", "2024-01-05", 3),
            row("  JUAN   PEREZ ", "2024-01-06", 4),
        ];
        let report = PeriodAggregator::aggregate(&rows, Granularity::Month);
        assert_eq!(report.summaries.len(), 1);
        assert_eq!(report.summaries[0].operator_key, "JUAN PEREZ");
        assert_eq!(report.summaries[0].grand_total, 7);
    }

    // ── Zero rows and empty input ─────────────────────────────────────────────

    #[test]
    fn test_explicit_zero_rows_keep_operator_present() {
        let rows = vec![row("A", "2024-01-05", 0)];
        let report = PeriodAggregator::aggregate(&rows, Granularity::Day);
        assert_eq!(report.summaries.len(), 1);
        assert_eq!(report.summaries[0].grand_total, 0);
        assert_eq!(
            report.summaries[0].totals_by_period.get("2024-01-05"),
            Some(&0)
        );
    }

    #[test]
    fn test_empty_input() {
        let report = PeriodAggregator::aggregate(&[], Granularity::Month);
        assert!(report.summaries.is_empty());
        assert!(report.column_totals.is_empty());
        assert_eq!(report.grand_total, 0);
        assert_eq!(report.rows_skipped, 0);
    }

    // ── Malformed rows ────────────────────────────────────────────────────────

    #[test]
    fn test_malformed_rows_skipped_not_fatal() {
        let rows = vec![
            row("A", "2024-01-05", 3),
            row("", "2024-01-05", 1),        // blank operator
            row("B", "garbage", 2),          // bad date
            row("C", "2024-01-05", -4),      // negative count
            row("A", "2024-01-06", 2),
        ];
        let report = PeriodAggregator::aggregate(&rows, Granularity::Month);

        assert_eq!(report.rows_skipped, 3);
        assert_eq!(report.summaries.len(), 1);
        assert_eq!(report.summaries[0].grand_total, 5);
    }

    // ── Conservation invariant ────────────────────────────────────────────────

    #[test]
    fn test_totals_conservation() {
        let rows = vec![
            row("A", "2024-01-05", 3),
            row("A", "2024-02-05", 4),
            row("B", "2024-01-10", 7),
            row("B", "2024-03-01", 2),
            row("C", "2024-02-14", 11),
        ];
        let report = PeriodAggregator::aggregate(&rows, Granularity::Month);

        let cell_sum: u64 = report
            .summaries
            .iter()
            .flat_map(|s| s.totals_by_period.values())
            .sum();
        let operator_sum: u64 = report.summaries.iter().map(|s| s.grand_total).sum();
        let column_sum: u64 = report.column_totals.values().sum();

        assert_eq!(report.grand_total, 27);
        assert_eq!(cell_sum, report.grand_total);
        assert_eq!(operator_sum, report.grand_total);
        assert_eq!(column_sum, report.grand_total);
    }

    #[test]
    fn test_column_totals_per_period() {
        let rows = vec![
            row("A", "2024-01-05", 3),
            row("B", "2024-01-10", 7),
            row("B", "2024-02-01", 2),
        ];
        let report = PeriodAggregator::aggregate(&rows, Granularity::Month);
        assert_eq!(report.column_totals.get("2024-01"), Some(&10));
        assert_eq!(report.column_totals.get("2024-02"), Some(&2));
    }
}
