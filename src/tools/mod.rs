//! Calio Tools module
//!
//! Tool implementations behind the MCP server. Each tool takes the database
//! plus plain parameters and returns a serializable response or a message.

pub mod days;
pub mod goals;
pub mod presets;
pub mod status;
pub mod weekly;

use chrono::{Local, NaiveDate};

use crate::models::DATE_FORMAT;

/// Today's date in local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse an optional ISO date, defaulting to today
pub fn parse_date(date: Option<&str>) -> Result<NaiveDate, String> {
    match date.map(str::trim).filter(|d| !d.is_empty()) {
        Some(d) => NaiveDate::parse_from_str(d, DATE_FORMAT)
            .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD", d)),
        None => Ok(today()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date(Some("2025-01-09")).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 9).unwrap()
        );
        assert_eq!(parse_date(None).unwrap(), today());
        assert_eq!(parse_date(Some("  ")).unwrap(), today());
        assert!(parse_date(Some("09/01/2025")).is_err());
    }
}
