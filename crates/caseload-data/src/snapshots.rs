//! Time-series assembly from historical snapshot rows.
//!
//! The snapshot store delivers, per operator, a map of ISO dates to backlog
//! counts captured at those dates. This module turns that shape into ordered
//! series suitable for the trend engine and the movers ranking.

use std::collections::BTreeMap;

use caseload_core::models::HistoricalSeriesRow;
use caseload_core::normalize::normalize;
use chrono::NaiveDate;
use tracing::warn;

use crate::dates::parse_iso_date;

// ── OperatorSeries ────────────────────────────────────────────────────────────

/// One dated backlog observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: u64,
}

/// An operator's backlog history, sorted ascending by date with no duplicate
/// dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorSeries {
    /// Normalized operator key.
    pub operator_key: String,
    pub points: Vec<SeriesPoint>,
}

impl OperatorSeries {
    /// The values alone, in date order, as the regression input.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value as f64).collect()
    }
}

// ── SeriesBuildResult ─────────────────────────────────────────────────────────

/// Output of [`build_series`].
#[derive(Debug, Clone, Default)]
pub struct SeriesBuildResult {
    /// One series per distinct operator, sorted by operator key.
    pub series: Vec<OperatorSeries>,
    /// Date entries rejected for an unparsable date or negative count, plus
    /// whole rows rejected for a blank operator.
    pub entries_skipped: usize,
}

/// Assemble per-operator time series from raw snapshot rows.
///
/// Duplicate dates for the same operator are summed, not overwritten — this
/// also covers the same operator appearing in multiple input rows under
/// spelling variants, since keys are normalized first.
pub fn build_series(rows: &[HistoricalSeriesRow]) -> SeriesBuildResult {
    let mut per_operator: BTreeMap<String, BTreeMap<NaiveDate, u64>> = BTreeMap::new();
    let mut entries_skipped = 0usize;

    for row in rows {
        let key = normalize(&row.operator);
        if key.is_empty() {
            warn!(
                "Skipping snapshot row with blank operator ({} date entries)",
                row.date_to_count.len()
            );
            entries_skipped += 1;
            continue;
        }
        let dates = per_operator.entry(key).or_default();
        for (date_str, count) in &row.date_to_count {
            let Some(date) = parse_iso_date(date_str) else {
                entries_skipped += 1;
                continue;
            };
            if *count < 0 {
                warn!(
                    "Skipping negative snapshot count {} for \"{}\" on {}",
                    count, row.operator, date_str
                );
                entries_skipped += 1;
                continue;
            }
            *dates.entry(date).or_insert(0) += *count as u64;
        }
    }

    let series = per_operator
        .into_iter()
        .map(|(operator_key, dates)| OperatorSeries {
            operator_key,
            // BTreeMap iteration is already date-ascending.
            points: dates
                .into_iter()
                .map(|(date, value)| SeriesPoint { date, value })
                .collect(),
        })
        .collect();

    SeriesBuildResult {
        series,
        entries_skipped,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_row(operator: &str, entries: &[(&str, i64)]) -> HistoricalSeriesRow {
        HistoricalSeriesRow {
            operator: operator.to_string(),
            date_to_count: entries
                .iter()
                .map(|(d, c)| (d.to_string(), *c))
                .collect(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ── Ordering and shape ────────────────────────────────────────────────────

    #[test]
    fn test_series_sorted_ascending_by_date() {
        let rows = vec![snapshot_row(
            "A",
            &[("2024-01-20", 5), ("2024-01-05", 3), ("2024-01-10", 4)],
        )];
        let result = build_series(&rows);

        assert_eq!(result.series.len(), 1);
        let dates: Vec<NaiveDate> = result.series[0].points.iter().map(|p| p.date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 1, 5), date(2024, 1, 10), date(2024, 1, 20)]
        );
    }

    #[test]
    fn test_values_extracted_in_date_order() {
        let rows = vec![snapshot_row("A", &[("2024-01-02", 7), ("2024-01-01", 3)])];
        let result = build_series(&rows);
        assert_eq!(result.series[0].values(), vec![3.0, 7.0]);
    }

    // ── Duplicate handling ────────────────────────────────────────────────────

    #[test]
    fn test_duplicate_rows_for_one_operator_sum_by_date() {
        // Same person under two spellings: counts on the shared date sum.
        let rows = vec![
            snapshot_row("Juan Pérez", &[("2024-01-05", 3), ("2024-01-06", 1)]),
            snapshot_row("JUAN PEREZ", &[("2024-01-05", 2)]),
        ];
        let result = build_series(&rows);

        assert_eq!(result.series.len(), 1);
        let s = &result.series[0];
        assert_eq!(s.operator_key, "JUAN PEREZ");
        assert_eq!(s.points[0].value, 5);
        assert_eq!(s.points[1].value, 1);
    }

    // ── Malformed entries ─────────────────────────────────────────────────────

    #[test]
    fn test_malformed_entries_skipped_and_counted() {
        let rows = vec![
            snapshot_row("A", &[("2024-01-05", 3), ("bogus", 9), ("2024-01-06", -1)]),
            snapshot_row("", &[("2024-01-05", 1)]),
        ];
        let result = build_series(&rows);

        assert_eq!(result.entries_skipped, 3);
        assert_eq!(result.series.len(), 1);
        assert_eq!(result.series[0].points.len(), 1);
        assert_eq!(result.series[0].points[0].value, 3);
    }

    #[test]
    fn test_empty_input() {
        let result = build_series(&[]);
        assert!(result.series.is_empty());
        assert_eq!(result.entries_skipped, 0);
    }
}
