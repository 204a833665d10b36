/// Format an integer case count with thousands separators.
///
/// # Examples
///
/// ```
/// use caseload_core::formatting::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(1234), "1,234");
/// assert_eq!(format_count(1234567), "1,234,567");
/// ```
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Format a regression slope as a signed fixed-precision string.
///
/// # Examples
///
/// ```
/// use caseload_core::formatting::format_slope;
///
/// assert_eq!(format_slope(1.25), "+1.25");
/// assert_eq!(format_slope(-0.4), "-0.40");
/// assert_eq!(format_slope(0.0), "+0.00");
/// ```
pub fn format_slope(slope: f64) -> String {
    format!("{:+.2}", slope)
}

/// Insert a comma every three digits, counting from the right.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - offset) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count_small() {
        assert_eq!(format_count(7), "7");
        assert_eq!(format_count(999), "999");
    }

    #[test]
    fn test_format_count_grouping() {
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(12_345), "12,345");
        assert_eq!(format_count(123_456_789), "123,456,789");
    }

    #[test]
    fn test_format_slope_sign_and_precision() {
        assert_eq!(format_slope(3.14159), "+3.14");
        assert_eq!(format_slope(-2.5), "-2.50");
    }
}
