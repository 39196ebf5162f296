//! Shared nutrition data structure
//!
//! Used across food entries, presets, and daily totals.

use serde::{Deserialize, Serialize};

use crate::nutrition::scaler;

/// Calories plus the three tracked macros
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: i64,
    #[serde(default)]
    pub protein: f64, // grams
    #[serde(default)]
    pub carbs: f64, // grams
    #[serde(default)]
    pub fat: f64, // grams
}

/// Summed nutrition for one calendar day
pub type DailyTotals = Nutrition;

impl Nutrition {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Rescale from `base_weight` grams to `target_weight` grams.
    ///
    /// A non-positive base weight leaves every value untouched.
    pub fn scaled(&self, base_weight: f64, target_weight: f64) -> Self {
        Self {
            calories: scaler::scale_calories(self.calories, base_weight, target_weight),
            protein: scaler::scale(self.protein, base_weight, target_weight),
            carbs: scaler::scale(self.carbs, base_weight, target_weight),
            fat: scaler::scale(self.fat, base_weight, target_weight),
        }
    }

    pub fn add(&self, other: &Nutrition) -> Self {
        Self {
            calories: self.calories.saturating_add(other.calories),
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fat: self.fat + other.fat,
        }
    }

    /// First field that is negative, if any
    pub fn first_negative(&self) -> Option<&'static str> {
        if self.calories < 0 {
            Some("calories")
        } else if self.protein < 0.0 {
            Some("protein")
        } else if self.carbs < 0.0 {
            Some("carbs")
        } else if self.fat < 0.0 {
            Some("fat")
        } else {
            None
        }
    }
}

impl std::ops::Add for Nutrition {
    type Output = Nutrition;

    fn add(self, other: Nutrition) -> Nutrition {
        Nutrition::add(&self, &other)
    }
}

impl std::iter::Sum for Nutrition {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Nutrition::zero(), |acc, n| acc + n)
    }
}

impl<'a> std::iter::Sum<&'a Nutrition> for Nutrition {
    fn sum<I: Iterator<Item = &'a Nutrition>>(iter: I) -> Self {
        iter.fold(Nutrition::zero(), |acc, n| acc + *n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_doubles_every_value() {
        let n = Nutrition { calories: 250, protein: 10.0, carbs: 30.0, fat: 8.0 };
        let doubled = n.scaled(100.0, 200.0);
        assert_eq!(doubled.calories, 500);
        assert!((doubled.protein - 20.0).abs() < 1e-9);
        assert!((doubled.carbs - 60.0).abs() < 1e-9);
        assert!((doubled.fat - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_scaled_without_weight_basis_is_identity() {
        let n = Nutrition { calories: 300, protein: 0.0, carbs: 0.0, fat: 0.0 };
        assert_eq!(n.scaled(0.0, 150.0), n);
    }

    #[test]
    fn test_first_negative() {
        let mut n = Nutrition { calories: 10, protein: 1.0, carbs: 1.0, fat: 1.0 };
        assert_eq!(n.first_negative(), None);
        n.carbs = -0.5;
        assert_eq!(n.first_negative(), Some("carbs"));
    }
}
