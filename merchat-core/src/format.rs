//! Display formatting helpers.
//!
//! These produce the human-readable strings attached to summaries. The raw
//! numeric fields remain the source of truth; nothing parses these back.

/// Formats an integer with comma thousands separators.
pub fn group_thousands(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let mut count = 0;

    for c in s.chars().rev() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(c);
        count += 1;
    }

    result.chars().rev().collect()
}

/// Formats a USD amount with six decimal places.
///
/// Six decimals because per-call costs are fractions of a cent at
/// per-million-token rates.
pub fn format_usd(value: f64) -> String {
    format!("${value:.6}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(0.0), "$0.000000");
        assert_eq!(format_usd(0.003717), "$0.003717");
        assert_eq!(format_usd(1.5), "$1.500000");
    }
}
