use anyhow::{anyhow, Result};
use cadence_core::models::{weekday_ordinal, WeekdaySet};
use chrono::{NaiveDate, Utc, Weekday};
use chrono_english::{parse_date_string, Dialect};

/// Parses an ISO date, falling back to natural language ("tomorrow", "next friday").
pub fn parse_date(date_str: &str) -> Result<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d") {
        return Ok(date);
    }
    parse_date_string(date_str, Utc::now(), Dialect::Us)
        .map(|dt| dt.date_naive())
        .map_err(|e| anyhow!("Failed to parse date '{}': {}", date_str, e))
}

/// Parses a comma-separated weekday list into Monday-based ordinals.
///
/// Accepts names ("mon", "Tuesday") and raw ordinals ("0".."6"). Raw
/// ordinals are passed through unchecked so rule validation reports them.
pub fn parse_weekdays(list: &str) -> Result<WeekdaySet> {
    let mut days = WeekdaySet::new();
    for part in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let ordinal = match part.parse::<u8>() {
            Ok(n) => n,
            Err(_) => part
                .parse::<Weekday>()
                .map(weekday_ordinal)
                .map_err(|_| anyhow!("Unknown weekday '{}'", part))?,
        };
        days.insert(ordinal);
    }
    Ok(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_dates() {
        assert_eq!(
            parse_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(parse_date("2023-02-29").is_err());
    }

    #[test]
    fn test_relative_dates() {
        let today = Utc::now().date_naive();
        assert_eq!(parse_date("today").unwrap(), today);
        assert_eq!(parse_date("tomorrow").unwrap(), today.succ_opt().unwrap());
    }

    #[test]
    fn test_weekday_names_and_ordinals() {
        let days = parse_weekdays("mon, Friday,6").unwrap();
        assert_eq!(days.into_iter().collect::<Vec<_>>(), vec![0, 4, 6]);
    }

    #[test]
    fn test_weekday_errors() {
        assert!(parse_weekdays("mon,funday").is_err());
        // Out-of-range ordinals are left for rule validation.
        assert!(parse_weekdays("9").unwrap().contains(&9));
        assert!(parse_weekdays("").unwrap().is_empty());
    }
}
