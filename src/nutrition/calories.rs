//! Calorie estimation from macros

/// kcal per gram of protein
pub const PROTEIN_KCAL_PER_GRAM: f64 = 4.0;
/// kcal per gram of carbohydrate
pub const CARBS_KCAL_PER_GRAM: f64 = 4.0;
/// kcal per gram of fat
pub const FAT_KCAL_PER_GRAM: f64 = 9.0;

/// Energy content of the given macros, rounded down to a whole calorie
pub fn estimate_calories(protein: f64, carbs: f64, fat: f64) -> i64 {
    let kcal = protein * PROTEIN_KCAL_PER_GRAM
        + carbs * CARBS_KCAL_PER_GRAM
        + fat * FAT_KCAL_PER_GRAM;
    kcal.floor() as i64
}

/// Calorie hint for a form whose macros were just edited.
///
/// Only a positive estimate is worth suggesting. The caller decides whether
/// to use it; an explicitly entered calorie value is never replaced here.
pub fn suggest_calories(protein: f64, carbs: f64, fat: f64) -> Option<i64> {
    let estimate = estimate_calories(protein, carbs, fat);
    (estimate > 0).then_some(estimate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_calories() {
        assert_eq!(estimate_calories(50.0, 200.0, 70.0), 1630);
        assert_eq!(estimate_calories(0.0, 0.0, 0.0), 0);
        assert_eq!(estimate_calories(0.0, 0.0, 1.0), 9);
    }

    #[test]
    fn test_estimate_floors_fractions() {
        // 4.4 + 0 + 4.5 = 8.9
        assert_eq!(estimate_calories(1.1, 0.0, 0.5), 8);
    }

    #[test]
    fn test_suggest_only_positive() {
        assert_eq!(suggest_calories(0.0, 0.0, 0.0), None);
        assert_eq!(suggest_calories(0.1, 0.0, 0.0), None);
        assert_eq!(suggest_calories(10.0, 0.0, 0.0), Some(40));
    }
}
