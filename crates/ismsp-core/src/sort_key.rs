//! Sort key normalisation for ISMS-P control numbers.
//!
//! Control numbers are dotted decimals (`"1.1.1"`, `"2.10.3"`, `"3.2.5"`)
//! and plain string ordering puts `2.10.1` before `2.9.1`. The key pads each
//! segment so that string ordering matches checklist order.
//!
//! # Numbering conventions
//!
//! - Three levels: area, domain, control (`2.5.1`)
//! - Domains run past nine in area 2 (`2.10`, `2.11`, `2.12`)
//! - Bare numeric ids (`"1"`) appear in some exports and sort as area-only

/// Normalise a control number into a lexicographically-sortable string.
///
/// Input: `"1.1.1"`, `"2.10.3"`, `"7"`
/// Output: `"001.001.001"`, `"002.010.003"`, `"007.000.000"`
///
/// # Algorithm
///
/// 1. Split on `.`, trimming whitespace
/// 2. Parse each of the first three segments as a number (non-numeric → 999,
///    so unexpected ids sink to the end of their group)
/// 3. Pad to exactly 3 segments with "000"
/// 4. Join with "."
pub fn normalize_control_id(s: &str) -> String {
    let s = s.trim();
    if s.is_empty() {
        return "000.000.000".to_string();
    }

    let mut segments: Vec<u32> = s
        .split('.')
        .filter(|seg| !seg.trim().is_empty())
        .take(3)
        .map(|seg| seg.trim().parse().unwrap_or(999))
        .collect();

    while segments.len() < 3 {
        segments.push(0);
    }

    format!("{:03}.{:03}.{:03}", segments[0], segments[1], segments[2])
}

/// Append the raw id so distinct ids never collide on the same key.
///
/// "002.010.003" + "2.10.3" → "002.010.003~2.10.3"
pub fn with_raw(sort_key: &str, raw: &str) -> String {
    format!("{}~{}", sort_key, raw.trim())
}

/// Full ordering key for a control id.
pub fn control_sort_key(id: &str) -> String {
    with_raw(&normalize_control_id(id), id)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: assert a list of inputs produces sort keys in strictly ascending order.
    fn assert_sorted_order(inputs: &[&str]) {
        let keys: Vec<String> = inputs.iter().map(|s| control_sort_key(s)).collect();
        for i in 1..keys.len() {
            assert!(
                keys[i - 1] < keys[i],
                "Expected {:?} ({}) < {:?} ({})",
                inputs[i - 1],
                keys[i - 1],
                inputs[i],
                keys[i],
            );
        }
    }

    #[test]
    fn plain_sequence() {
        assert_sorted_order(&["1.1.1", "1.1.2", "1.1.3", "1.2.1", "2.1.1"]);
    }

    #[test]
    fn two_digit_domains_follow_single_digit() {
        assert_sorted_order(&["2.8.6", "2.9.1", "2.9.7", "2.10.1", "2.11.5", "2.12.2", "3.1.1"]);
    }

    #[test]
    fn two_digit_controls() {
        assert_sorted_order(&["2.10.9", "2.10.10", "2.10.11"]);
    }

    #[test]
    fn exact_values() {
        assert_eq!(normalize_control_id("1.1.1"), "001.001.001");
        assert_eq!(normalize_control_id("2.10.3"), "002.010.003");
        assert_eq!(normalize_control_id("7"), "007.000.000");
        assert_eq!(normalize_control_id("3.2"), "003.002.000");
        assert_eq!(normalize_control_id("1.x.1"), "001.999.001");
    }

    #[test]
    fn empty_string() {
        assert_eq!(normalize_control_id(""), "000.000.000");
        assert_eq!(normalize_control_id("  "), "000.000.000");
    }

    #[test]
    fn whitespace_trimmed() {
        assert_eq!(normalize_control_id(" 2.5.1 "), normalize_control_id("2.5.1"));
        assert_eq!(control_sort_key(" 2.5.1 "), control_sort_key("2.5.1"));
    }

    #[test]
    fn raw_suffix_separates_lookalikes() {
        assert_ne!(control_sort_key("1.1"), control_sort_key("1.1.0"));
        assert_eq!(with_raw("002.010.003", "2.10.3"), "002.010.003~2.10.3");
    }
}
