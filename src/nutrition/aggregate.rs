//! Daily totals

use crate::models::{DailyTotals, FoodEntry};

/// Sum the nutrition of every entry. An empty day totals to zero.
pub fn aggregate<'a, I>(entries: I) -> DailyTotals
where
    I: IntoIterator<Item = &'a FoodEntry>,
{
    entries.into_iter().map(|e| &e.nutrition).sum()
}
