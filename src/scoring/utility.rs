/// Computes the arithmetic mean of a slice of values. Returns NaN for empty
/// input; any NaN in the input carries through to the result.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sums a slice of values. Any NaN in the input carries through to the result.
pub fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// Expresses `part` out of `total` as a percentage. Returns 0.0 when `total` is zero.
pub fn pct(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

/// Rounds to three decimal places, the precision used in reports.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_of_values() {
        assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
    }

    #[test]
    fn test_mean_empty_is_nan() {
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn test_nan_propagates() {
        assert!(mean(&[1.0, f64::NAN]).is_nan());
        assert!(sum(&[1.0, f64::NAN]).is_nan());
    }

    #[test]
    fn test_pct() {
        assert_eq!(pct(10, 0), 0.0);
        assert_eq!(pct(1, 4), 25.0);
        assert_eq!(pct(24, 24), 100.0);
    }

    #[test]
    fn test_round3() {
        assert_eq!(round3(64.99951), 65.0);
        assert_eq!(round3(12.34567), 12.346);
        assert_eq!(round3(0.0), 0.0);
        assert!(round3(f64::NAN).is_nan());
    }
}
