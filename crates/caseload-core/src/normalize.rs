//! Operator-name canonicalization.
//!
//! Operator names arrive from several independently-maintained sources with
//! inconsistent casing, accents, and spacing. Everything downstream compares
//! operators by the key produced here, never by the raw string.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonicalize a free-text operator name into a comparison key.
///
/// NFD-decomposes the string, drops combining diacritical marks, uppercases,
/// collapses internal whitespace runs to single spaces, and trims. Idempotent.
/// Empty or blank input yields an empty string, which never matches any
/// directory entry.
///
/// # Examples
///
/// ```
/// use caseload_core::normalize::normalize;
///
/// assert_eq!(normalize("  Juan   Pérez "), "JUAN PEREZ");
/// assert_eq!(normalize("MARÍA  LÓPEZ"), "MARIA LOPEZ");
/// assert_eq!(normalize(""), "");
/// ```
pub fn normalize(raw: &str) -> String {
    let stripped: String = raw.nfd().filter(|c| !is_combining_mark(*c)).collect();
    stripped
        .to_uppercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lossier variant used for truncated-name containment checks.
///
/// Applies [`normalize`] and then retains only alphanumeric characters
/// (no spaces). Because distinct names can collapse to the same simple key,
/// this form is only ever used for prefix/containment comparison, never for
/// exact equality.
pub fn normalize_simple(raw: &str) -> String {
    normalize(raw).chars().filter(|c| c.is_alphanumeric()).collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── normalize ─────────────────────────────────────────────────────────────

    #[test]
    fn test_normalize_strips_accents() {
        assert_eq!(normalize("Pérez Núñez"), "PEREZ NUNEZ");
        assert_eq!(normalize("JOSÉ ÁLVAREZ"), "JOSE ALVAREZ");
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("  juan \t  perez\n"), "JUAN PEREZ");
    }

    #[test]
    fn test_normalize_empty_and_blank() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \t\n "), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        let samples = [
            "",
            "  Juan   Pérez ",
            "MARÍA JOSÉ ÑÁÑEZ",
            "already NORMALIZED",
            "a",
            "ünïcödé  sòup",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    // ── normalize_simple ──────────────────────────────────────────────────────

    #[test]
    fn test_simple_drops_non_alphanumeric() {
        assert_eq!(normalize_simple("J. Pérez-García"), "JPEREZGARCIA");
        assert_eq!(normalize_simple("O'BRIEN, ANA"), "OBRIENANA");
    }

    #[test]
    fn test_simple_keeps_digits() {
        assert_eq!(normalize_simple("Equipo 2"), "EQUIPO2");
    }

    #[test]
    fn test_simple_empty_for_punctuation_only() {
        assert_eq!(normalize_simple("---"), "");
    }
}
