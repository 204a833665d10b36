//! Ordinary least-squares regression and percentile helpers.
//!
//! These are the numeric primitives shared by the trend classifier and the
//! movers ranking: an OLS fit over the series index, and a nearest-rank
//! percentile used for outlier trimming.

// ── Percentile helper ─────────────────────────────────────────────────────────

/// Compute the `p`-th percentile (as a fraction in `0.0..=1.0`) of a
/// **sorted** slice using the nearest-rank method: index = `floor(n * p)`,
/// clamped to the last element.
///
/// Returns `0.0` for an empty slice.
pub fn percentile_nearest_rank(sorted_data: &[f64], p: f64) -> f64 {
    if sorted_data.is_empty() {
        return 0.0;
    }
    let idx = (sorted_data.len() as f64 * p).floor() as usize;
    sorted_data[idx.min(sorted_data.len() - 1)]
}

// ── LinearFit ─────────────────────────────────────────────────────────────────

/// A fitted line `y = slope * x + intercept` over the series index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Predicted value at index `x`, clamped to a minimum of 0 because case
    /// counts cannot be negative.
    pub fn predict(&self, x: f64) -> f64 {
        (self.slope * x + self.intercept).max(0.0)
    }
}

// ── OLS fit ───────────────────────────────────────────────────────────────────

/// Fit an ordinary least-squares line to `values`, using the index
/// `0..n-1` as the independent variable.
///
/// Returns `None` when fewer than 2 points are supplied, or when the
/// denominator `n·Σx² − (Σx)²` degenerates (cannot happen for evenly spaced
/// indices with n > 1, but guarded anyway).
pub fn ols_fit(values: &[f64]) -> Option<LinearFit> {
    let n = values.len();
    if n <= 1 {
        return None;
    }

    let nf = n as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let denominator = nf * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return None;
    }

    let slope = (nf * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / nf;
    Some(LinearFit { slope, intercept })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
