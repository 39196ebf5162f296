//! Weight-based scaling
//!
//! Nutrition values are stored for a reference weight. Logging a different
//! amount rescales them linearly by `target / base`.

/// Scale `value` from `base_weight` to `target_weight`.
///
/// A base weight of zero or less has no meaningful ratio, so the value is
/// returned unchanged.
///
/// Examples:
/// - `scale(10.0, 100.0, 250.0)` -> `25.0`
/// - `scale(10.0, 0.0, 250.0)` -> `10.0`
pub fn scale(value: f64, base_weight: f64, target_weight: f64) -> f64 {
    if base_weight <= 0.0 {
        return value;
    }
    value * (target_weight / base_weight)
}

/// Scale a calorie count, rounded to the nearest whole calorie
pub fn scale_calories(calories: i64, base_weight: f64, target_weight: f64) -> i64 {
    if base_weight <= 0.0 {
        return calories;
    }
    (calories as f64 * (target_weight / base_weight)).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_weight_is_identity() {
        for &w in &[0.5, 1.0, 33.3, 100.0, 250.0] {
            for &v in &[0.0, 1.25, 17.0, 999.9] {
                assert_eq!(scale(v, w, w), v);
            }
            assert_eq!(scale_calories(437, w, w), 437);
        }
    }

    #[test]
    fn test_non_positive_base_is_identity() {
        assert_eq!(scale(12.5, 0.0, 300.0), 12.5);
        assert_eq!(scale(12.5, -5.0, 300.0), 12.5);
        assert_eq!(scale_calories(210, 0.0, 80.0), 210);
        assert_eq!(scale_calories(210, -1.0, 80.0), 210);
    }

    #[test]
    fn test_linear_ratio() {
        assert!((scale(20.0, 100.0, 150.0) - 30.0).abs() < 1e-9);
        assert!((scale(20.0, 100.0, 0.0)).abs() < 1e-9);
    }

    #[test]
    fn test_calories_round_to_nearest() {
        // 333 * 1.5 = 499.5
        assert_eq!(scale_calories(333, 100.0, 150.0), 500);
        // 100 * 0.333 = 33.3
        assert_eq!(scale_calories(100, 300.0, 99.9), 33);
    }
}
