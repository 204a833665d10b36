use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ReportError;
use crate::normalize::normalize;

/// Team assignment of an operator within the authoritative directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Team {
    Evaluacion,
    Reasignados,
    Suspendida,
    Responsable,
    #[default]
    Unknown,
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Team::Evaluacion => "EVALUACION",
            Team::Reasignados => "REASIGNADOS",
            Team::Suspendida => "SUSPENDIDA",
            Team::Responsable => "RESPONSABLE",
            Team::Unknown => "UNKNOWN",
        };
        f.pad(name)
    }
}

/// Reconciliation outcome of matching a raw operator name against the
/// directories.
///
/// * `General` — found in the own-process directory.
/// * `Otros` — not found anywhere.
/// * `PorRevisar` — found only in the other process's directory
///   (cross-process candidate, needs manual review).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    General,
    Otros,
    PorRevisar,
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Bucket::General => "general",
            Bucket::Otros => "otros",
            Bucket::PorRevisar => "por_revisar",
        };
        f.pad(name)
    }
}

/// The result of classifying one raw operator name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub bucket: Bucket,
    pub team: Team,
}

/// One entry of an operator directory, immutable within a report run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Name as stored by the upstream directory.
    pub display_name: String,
    /// Canonical comparison key derived from `display_name`.
    pub normalized_key: String,
    /// Team assignment within the owning process.
    #[serde(default)]
    pub team: Team,
}

impl DirectoryEntry {
    /// Build an entry, deriving the normalized comparison key from the
    /// display name.
    pub fn new(display_name: impl Into<String>, team: Team) -> Self {
        let display_name = display_name.into();
        let normalized_key = normalize(&display_name);
        Self {
            display_name,
            normalized_key,
            team,
        }
    }
}

/// A raw per-operator per-date count as delivered by the report-query
/// collaborator. Not yet validated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCountRow {
    /// Free-text operator name.
    pub operator: String,
    /// ISO-8601 date (or date-time) string.
    pub date: String,
    /// Case count. Signed so that malformed negative exports are detectable.
    pub count: i64,
}

/// A validated count record keyed by normalized operator name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountRecord {
    pub operator_key: String,
    pub date: NaiveDate,
    pub count: u64,
}

/// One operator's historical backlog counts as delivered by the
/// snapshot-store collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalSeriesRow {
    /// Free-text operator name.
    pub operator: String,
    /// ISO date string → backlog count on that date.
    pub date_to_count: BTreeMap<String, i64>,
}

// ── Granularity ───────────────────────────────────────────────────────────────

/// Calendar bucket size for period aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Year,
    Quarter,
    Month,
    Day,
}

impl Granularity {
    /// Render the period key for `date` at this granularity.
    ///
    /// * `Year`    → `"2024"`
    /// * `Quarter` → `"2024-Q1"` (quarter = ceil(month / 3))
    /// * `Month`   → `"2024-01"`
    /// * `Day`     → `"2024-01-05"`
    pub fn period_key(&self, date: NaiveDate) -> String {
        match self {
            Granularity::Year => format!("{:04}", date.year()),
            Granularity::Quarter => {
                format!("{:04}-Q{}", date.year(), date.month().div_ceil(3))
            }
            Granularity::Month => format!("{:04}-{:02}", date.year(), date.month()),
            Granularity::Day => date.format("%Y-%m-%d").to_string(),
        }
    }
}

impl FromStr for Granularity {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "year" => Ok(Granularity::Year),
            "quarter" => Ok(Granularity::Quarter),
            "month" => Ok(Granularity::Month),
            "day" | "date" => Ok(Granularity::Day),
            other => Err(ReportError::UnknownGranularity(other.to_string())),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Granularity::Year => "year",
            Granularity::Quarter => "quarter",
            Granularity::Month => "month",
            Granularity::Day => "day",
        };
        f.write_str(name)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ── DirectoryEntry ────────────────────────────────────────────────────────

    #[test]
    fn test_directory_entry_derives_normalized_key() {
        let entry = DirectoryEntry::new("  Juan   Pérez ", Team::Evaluacion);
        assert_eq!(entry.display_name, "  Juan   Pérez ");
        assert_eq!(entry.normalized_key, "JUAN PEREZ");
        assert_eq!(entry.team, Team::Evaluacion);
    }

    // ── Team / Bucket serde ───────────────────────────────────────────────────

    #[test]
    fn test_team_deserializes_from_uppercase() {
        let team: Team = serde_json::from_str("\"EVALUACION\"").unwrap();
        assert_eq!(team, Team::Evaluacion);
    }

    #[test]
    fn test_team_defaults_to_unknown() {
        assert_eq!(Team::default(), Team::Unknown);
    }

    #[test]
    fn test_bucket_serializes_snake_case() {
        let json = serde_json::to_string(&Bucket::PorRevisar).unwrap();
        assert_eq!(json, "\"por_revisar\"");
    }

    // ── Granularity period keys ───────────────────────────────────────────────

    #[test]
    fn test_period_key_year() {
        assert_eq!(Granularity::Year.period_key(date(2024, 7, 15)), "2024");
    }

    #[test]
    fn test_period_key_quarter_boundaries() {
        assert_eq!(Granularity::Quarter.period_key(date(2024, 1, 1)), "2024-Q1");
        assert_eq!(Granularity::Quarter.period_key(date(2024, 3, 31)), "2024-Q1");
        assert_eq!(Granularity::Quarter.period_key(date(2024, 4, 1)), "2024-Q2");
        assert_eq!(Granularity::Quarter.period_key(date(2024, 9, 30)), "2024-Q3");
        assert_eq!(Granularity::Quarter.period_key(date(2024, 12, 31)), "2024-Q4");
    }

    #[test]
    fn test_period_key_month_zero_padded() {
        assert_eq!(Granularity::Month.period_key(date(2024, 3, 5)), "2024-03");
    }

    #[test]
    fn test_period_key_day_iso() {
        assert_eq!(Granularity::Day.period_key(date(2024, 1, 5)), "2024-01-05");
    }

    // ── Granularity FromStr ───────────────────────────────────────────────────

    #[test]
    fn test_granularity_from_str() {
        assert_eq!("year".parse::<Granularity>().unwrap(), Granularity::Year);
        assert_eq!("Quarter".parse::<Granularity>().unwrap(), Granularity::Quarter);
        assert_eq!("month".parse::<Granularity>().unwrap(), Granularity::Month);
        assert_eq!("day".parse::<Granularity>().unwrap(), Granularity::Day);
        // "date" is accepted as an alias for day-level keys.
        assert_eq!("date".parse::<Granularity>().unwrap(), Granularity::Day);
    }

    #[test]
    fn test_granularity_from_str_rejects_unknown() {
        let err = "fortnight".parse::<Granularity>().unwrap_err();
        assert!(err.to_string().contains("fortnight"));
    }
}
