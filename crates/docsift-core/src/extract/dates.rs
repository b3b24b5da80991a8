//! Date normalization for extracted invoice dates.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ISO_YMD: Regex =
        Regex::new(r"^(\d{4})[./-](\d{1,2})[./-](\d{1,2})$").unwrap();
    static ref NUMERIC_DMY: Regex =
        Regex::new(r"^(\d{1,2})[./-](\d{1,2})[./-](\d{2,4})$").unwrap();
    static ref DAY_MONTH_NAME: Regex =
        Regex::new(r"^(\d{1,2})\s+([A-Za-z]{3,9})\.?,?\s+(\d{2,4})$").unwrap();
    static ref MONTH_NAME_DAY: Regex =
        Regex::new(r"^([A-Za-z]{3,9})\.?\s+(\d{1,2}),?\s+(\d{2,4})$").unwrap();
}

/// Normalize a matched date string to a calendar date.
///
/// Candidate surface forms are tried in order: ISO year-first, numeric
/// day-first (with a month-first retry for US-style inputs), and the two
/// month-name layouts. Returns `None` when nothing normalizes to a real
/// calendar date, so callers can fall through to the next candidate match.
pub fn normalize_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    if let Some(caps) = ISO_YMD.captures(s) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let day: u32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = NUMERIC_DMY.captures(s) {
        let first: u32 = caps[1].parse().ok()?;
        let second: u32 = caps[2].parse().ok()?;
        let year = parse_year(&caps[3]);
        // Day-first preferred; swap when that is not a real date.
        return NaiveDate::from_ymd_opt(year, second, first)
            .or_else(|| NaiveDate::from_ymd_opt(year, first, second));
    }

    if let Some(caps) = DAY_MONTH_NAME.captures(s) {
        let day: u32 = caps[1].parse().ok()?;
        let month = month_from_name(&caps[2])?;
        let year = parse_year(&caps[3]);
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = MONTH_NAME_DAY.captures(s) {
        let month = month_from_name(&caps[1])?;
        let day: u32 = caps[2].parse().ok()?;
        let year = parse_year(&caps[3]);
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    None
}

fn parse_year(s: &str) -> i32 {
    let year: i32 = s.parse().unwrap_or(0);
    if year < 100 {
        // Two-digit year: assume 2000s for 00-50, 1900s for 51-99
        if year <= 50 { 2000 + year } else { 1900 + year }
    } else {
        year
    }
}

fn month_from_name(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    let month = match lower.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_iso() {
        assert_eq!(normalize_date("2024-01-15"), Some(date(2024, 1, 15)));
        assert_eq!(normalize_date("2024/1/5"), Some(date(2024, 1, 5)));
    }

    #[test]
    fn test_numeric_day_first() {
        assert_eq!(normalize_date("15.01.2024"), Some(date(2024, 1, 15)));
        assert_eq!(normalize_date("15/01/24"), Some(date(2024, 1, 15)));
    }

    #[test]
    fn test_numeric_swaps_when_day_first_is_invalid() {
        // 01/25/2024 cannot be day-first (month 25); falls back to US order.
        assert_eq!(normalize_date("01/25/2024"), Some(date(2024, 1, 25)));
    }

    #[test]
    fn test_month_names() {
        assert_eq!(normalize_date("15 January 2024"), Some(date(2024, 1, 15)));
        assert_eq!(normalize_date("15 Jan 2024"), Some(date(2024, 1, 15)));
        assert_eq!(normalize_date("January 15, 2024"), Some(date(2024, 1, 15)));
        assert_eq!(normalize_date("Aug 3 2025"), Some(date(2025, 8, 3)));
    }

    #[test]
    fn test_two_digit_year_window() {
        assert_eq!(normalize_date("01.01.99"), Some(date(1999, 1, 1)));
        assert_eq!(normalize_date("01.01.25"), Some(date(2025, 1, 1)));
    }

    #[test]
    fn test_impossible_dates_are_rejected() {
        assert_eq!(normalize_date("31.02.2024"), None);
        assert_eq!(normalize_date("15 Frobnary 2024"), None);
        assert_eq!(normalize_date("not a date"), None);
    }
}
