//! Qualitative trend classification for short backlog series.
//!
//! Produces the "increasing / decreasing / stable" badge shown on an
//! operator's detail view. Single-day spikes are trimmed away before the
//! first-third / last-third comparison so that one unusual day does not flip
//! the badge.

use serde::{Deserialize, Serialize};

use crate::regression::{ols_fit, percentile_nearest_rank};

/// Threshold on the relative first-third / last-third change. Strictly
/// greater than `+0.15` is up, strictly less than `-0.15` is down.
const TREND_PCT_THRESHOLD: f64 = 0.15;

/// Direction of a classified trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

/// The result of classifying one operator's series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    /// OLS slope over the raw (untrimmed) series; `None` when the series has
    /// fewer than 2 points.
    pub slope: Option<f64>,
    pub direction: TrendDirection,
}

/// Classify the momentum of `series`.
///
/// 1. Series of length ≤ 1 are `Flat` with no slope.
/// 2. Trim values outside the inclusive `[p10, p90]` nearest-rank band.
/// 3. Average the first and last thirds of what remains (divisor
///    `max(1, n/3)` guards tiny samples).
/// 4. `pct = (avg_last − avg_first) / max(1, avg_first)`; classify with
///    strict inequality at ±0.15.
///
/// The reported slope is the OLS slope of the raw series, matching the
/// fitted line drawn alongside it.
pub fn classify_trend(series: &[f64]) -> Trend {
    if series.len() <= 1 {
        return Trend {
            slope: None,
            direction: TrendDirection::Flat,
        };
    }

    let mut sorted = series.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let p10 = percentile_nearest_rank(&sorted, 0.10);
    let p90 = percentile_nearest_rank(&sorted, 0.90);

    let filtered: Vec<f64> = series
        .iter()
        .copied()
        .filter(|v| *v >= p10 && *v <= p90)
        .collect();

    let n = filtered.len();
    let third = n / 3;
    let divisor = third.max(1) as f64;
    let sum_first: f64 = filtered.iter().take(third).sum();
    let sum_last: f64 = filtered.iter().skip(n.saturating_sub(third)).sum();
    let avg_first = sum_first / divisor;
    let avg_last = sum_last / divisor;

    let diff = avg_last - avg_first;
    let pct = diff / avg_first.max(1.0);

    let direction = if pct > TREND_PCT_THRESHOLD {
        TrendDirection::Up
    } else if pct < -TREND_PCT_THRESHOLD {
        TrendDirection::Down
    } else {
        TrendDirection::Flat
    };

    Trend {
        slope: ols_fit(series).map(|fit| fit.slope),
        direction,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
