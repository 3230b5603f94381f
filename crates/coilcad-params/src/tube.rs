//! Standard copper tube sizes.

/// Nominal tube sizes as (inch label, outer diameter in mm).
pub const TUBE_OD_TABLE: [(&str, f64); 9] = [
    ("1/4", 6.35),
    ("5/16", 7.9375),
    ("3/8", 9.525),
    ("7/16", 11.1125),
    ("1/2", 12.7),
    ("5/8", 15.875),
    ("3/4", 19.05),
    ("7/8", 22.225),
    ("1", 25.4),
];

const MATCH_TOLERANCE: f64 = 0.01;

/// Inch label for an outer diameter in mm.
///
/// Standard sizes give their fraction (`15.875` -> `5/8`); anything else is
/// written as decimal inches with trailing zeros removed.
pub fn tube_label_for_diameter(diameter_mm: f64) -> String {
    if let Some((label, _)) = TUBE_OD_TABLE
        .iter()
        .find(|(_, od)| (od - diameter_mm).abs() < MATCH_TOLERANCE)
    {
        return (*label).to_string();
    }

    let inches = format!("{:.3}", diameter_mm / 25.4);
    inches.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Outer diameter in mm for a standard inch label.
pub fn diameter_for_label(label: &str) -> Option<f64> {
    let label = label.trim().trim_end_matches('"');
    TUBE_OD_TABLE
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, od)| *od)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_sizes() {
        assert_eq!(tube_label_for_diameter(15.875), "5/8");
        assert_eq!(tube_label_for_diameter(9.525), "3/8");
        assert_eq!(tube_label_for_diameter(25.4), "1");
    }

    #[test]
    fn test_nonstandard_size_uses_decimal_inches() {
        assert_eq!(tube_label_for_diameter(10.0), "0.394");
        assert_eq!(tube_label_for_diameter(12.7 * 2.5), "1.25");
    }

    #[test]
    fn test_diameter_lookup() {
        assert_eq!(diameter_for_label("5/8\""), Some(15.875));
        assert_eq!(diameter_for_label("9/16"), None);
    }
}
