/// Arithmetic mean. Returns `None` for an empty slice so callers decide what "no data" means.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Percentage move from `from` to `to`, e.g. 100 -> 103 is 3.0
pub fn pct_change(from: f64, to: f64) -> f64 {
    (to - from) / from * 100.0
}

/// Slope of the line through two (index, price) points.
/// `None` when both points share an index (vertical line, cannot extrapolate).
pub fn slope(x_a: usize, y_a: f64, x_b: usize, y_b: f64) -> Option<f64> {
    if x_a == x_b {
        return None;
    }
    Some((y_b - y_a) / (x_b as f64 - x_a as f64))
}

/// Value of the line through (x_b, y_b) with `slope` at index `x`.
/// Works for `x` either side of `x_b`.
pub fn extrapolate(x_b: usize, y_b: f64, slope: f64, x: usize) -> f64 {
    y_b + slope * (x as f64 - x_b as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[2.0, 4.0, 6.0]), Some(4.0));
    }

    #[test]
    fn test_pct_change() {
        assert!((pct_change(100.0, 103.0) - 3.0).abs() < 1e-12);
        assert!((pct_change(200.0, 190.0) + 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_slope_and_extrapolate() {
        let m = slope(5, 100.0, 15, 120.0).unwrap();
        assert!((m - 2.0).abs() < 1e-12);
        assert!((extrapolate(15, 120.0, m, 25) - 140.0).abs() < 1e-12);
        // Backwards along the same line lands on the first anchor
        assert!((extrapolate(15, 120.0, m, 5) - 100.0).abs() < 1e-12);
        assert_eq!(slope(7, 1.0, 7, 2.0), None);
    }
}
