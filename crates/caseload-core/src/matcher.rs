//! Operator-identity reconciliation against the per-process directories.

use tracing::warn;

use crate::models::{Bucket, Classification, DirectoryEntry, Team};
use crate::normalize::{normalize, normalize_simple};

// ── MatchStrategy ─────────────────────────────────────────────────────────────

/// Pluggable fuzzy comparison for the cross-process lookup.
///
/// Both arguments are simple-normalized keys (uppercase alphanumerics, no
/// spaces). The strategy decides only whether two keys refer to the same
/// person; bucket assignment stays in [`IdentityMatcher`] so the heuristic
/// can be tightened (e.g. an edit-distance threshold) without touching it.
pub trait MatchStrategy {
    fn matches(&self, a: &str, b: &str) -> bool;
}

/// Default strategy: either key is a prefix of the other.
///
/// This tolerates truncation in either direction, which the upstream sources
/// are known to produce. It is deliberately loose and can confuse short names
/// ("ANA" vs "ANA MARIA"); such ambiguity is logged by the matcher.
/// Empty keys never match.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixOverlap;

impl MatchStrategy for PrefixOverlap {
    fn matches(&self, a: &str, b: &str) -> bool {
        !a.is_empty() && !b.is_empty() && (a.starts_with(b) || b.starts_with(a))
    }
}

// ── IdentityMatcher ───────────────────────────────────────────────────────────

/// Resolves a raw operator name against the own-process and cross-process
/// directories, producing a total, mutually exclusive classification.
pub struct IdentityMatcher<S: MatchStrategy = PrefixOverlap> {
    strategy: S,
}

impl IdentityMatcher<PrefixOverlap> {
    /// Matcher with the production prefix-containment strategy.
    pub fn with_defaults() -> Self {
        Self::new(PrefixOverlap)
    }
}

impl<S: MatchStrategy> IdentityMatcher<S> {
    pub fn new(strategy: S) -> Self {
        Self { strategy }
    }

    /// Classify `raw_name` into exactly one reconciliation bucket.
    ///
    /// 1. Exact match of the strict-normalized name in `own` →
    ///    [`Bucket::General`] with the entry's team.
    /// 2. Otherwise, simple-key containment against `other` →
    ///    [`Bucket::PorRevisar`] with [`Team::Unknown`]. The first matching
    ///    entry wins; additional candidates are logged as a caveat.
    /// 3. Otherwise → [`Bucket::Otros`] with [`Team::Unknown`].
    ///
    /// An empty raw name always classifies as `Otros`. Directory entries with
    /// an empty stored key are excluded from matching.
    pub fn classify(
        &self,
        raw_name: &str,
        own: &[DirectoryEntry],
        other: &[DirectoryEntry],
    ) -> Classification {
        let key = normalize(raw_name);
        if key.is_empty() {
            return Classification {
                bucket: Bucket::Otros,
                team: Team::Unknown,
            };
        }

        if let Some(entry) = own
            .iter()
            .find(|e| !e.normalized_key.is_empty() && e.normalized_key == key)
        {
            return Classification {
                bucket: Bucket::General,
                team: entry.team,
            };
        }

        let simple = normalize_simple(raw_name);
        let mut first_hit: Option<&DirectoryEntry> = None;
        let mut extra_hits = 0usize;
        for entry in other {
            if entry.normalized_key.is_empty() {
                continue;
            }
            let entry_simple = normalize_simple(&entry.normalized_key);
            if self.strategy.matches(&simple, &entry_simple) {
                if first_hit.is_none() {
                    first_hit = Some(entry);
                } else {
                    extra_hits += 1;
                }
            }
        }

        if let Some(entry) = first_hit {
            if extra_hits > 0 {
                warn!(
                    "Ambiguous cross-process match for \"{}\": kept \"{}\", \
                     {} other candidate(s) also matched",
                    raw_name, entry.display_name, extra_hits
                );
            }
            return Classification {
                bucket: Bucket::PorRevisar,
                team: Team::Unknown,
            };
        }

        Classification {
            bucket: Bucket::Otros,
            team: Team::Unknown,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
