//! Momentum ranking: which operators' backlogs are moving fastest.
//!
//! Scores each operator by the OLS slope of its backlog over a recent
//! window and surfaces the extremes in both directions. A shrinking backlog
//! (negative slope) is operationally positive; a growing one is the list
//! the coordinators actually worry about.

use caseload_core::regression::ols_fit;
use serde::{Deserialize, Serialize};

use crate::snapshots::OperatorSeries;

// ── Config ────────────────────────────────────────────────────────────────────

/// Configuration for the movers ranking.
#[derive(Debug, Clone)]
pub struct MoversConfig {
    /// How many most-recent periods of each series to score.
    pub window: usize,
    /// How many operators to list per direction.
    pub top_n: usize,
}

impl Default for MoversConfig {
    fn default() -> Self {
        Self { window: 15, top_n: 5 }
    }
}

// ── Mover ─────────────────────────────────────────────────────────────────────

/// One ranked operator with the windowed series attached for visualization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mover {
    pub operator_key: String,
    pub slope: f64,
    pub series: Vec<f64>,
}

/// Both ends of the ranking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoversReport {
    /// Steepest backlog growth, most positive slope first.
    pub top_increasing: Vec<Mover>,
    /// Steepest backlog reduction, most negative slope first.
    pub top_decreasing: Vec<Mover>,
}

// ── MoversRanker ──────────────────────────────────────────────────────────────

/// Ranks operators by rate-of-change over the recent window.
pub struct MoversRanker {
    config: MoversConfig,
}

impl MoversRanker {
    pub fn new(config: MoversConfig) -> Self {
        Self { config }
    }

    /// Ranker with the production window (15) and list size (5).
    pub fn with_defaults() -> Self {
        Self::new(MoversConfig::default())
    }

    /// Rank `series` by windowed OLS slope.
    ///
    /// Operators whose windowed series has non-zero entries on fewer than
    /// 50% of the window length are dropped — a single active day must not
    /// dominate the ranking. Ties keep input order (stable sort). Returns
    /// empty lists when nothing qualifies; never an error.
    pub fn rank(&self, series: &[OperatorSeries]) -> MoversReport {
        let mut scored: Vec<Mover> = Vec::new();

        for s in series {
            let values = s.values();
            let start = values.len().saturating_sub(self.config.window);
            let windowed = &values[start..];

            let active = windowed.iter().filter(|v| **v != 0.0).count();
            if active * 2 < self.config.window {
                continue;
            }

            let Some(fit) = ols_fit(windowed) else {
                continue;
            };
            scored.push(Mover {
                operator_key: s.operator_key.clone(),
                slope: fit.slope,
                series: windowed.to_vec(),
            });
        }

        // Stable ascending sort: ties stay in input order.
        scored.sort_by(|a, b| a.slope.partial_cmp(&b.slope).unwrap());

        let take = self.config.top_n.min(scored.len());
        let top_decreasing: Vec<Mover> = scored[..take].to_vec();
        let mut top_increasing: Vec<Mover> = scored[scored.len() - take..].to_vec();
        top_increasing.reverse();

        MoversReport {
            top_increasing,
            top_decreasing,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
