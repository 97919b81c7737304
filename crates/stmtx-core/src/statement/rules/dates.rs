//! Date parsing for statement text.

use chrono::NaiveDate;

use super::patterns::{
    DATE_DAY_MONTH_NAME, DATE_DAY_MONTH_NUM, DATE_MONTH_NAME_DAY, DATE_TOKEN, ORDINAL_SUFFIX,
};

/// Parse a short candidate string into a calendar date.
///
/// Shapes are tried in order: `15 Jan 2024`, `15/01/2024`, `Jan 15, 2024`.
/// The first shape that matches decides the result: if it names an impossible
/// date (`30 Feb 2024`) the answer is `None`, later shapes are not consulted.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let src = ORDINAL_SUFFIX.replace_all(s, "$1");
    let src = src.trim();

    if let Some(caps) = DATE_DAY_MONTH_NAME.captures(src) {
        return ymd(&caps[3], month_number(&caps[2])?, &caps[1]);
    }

    if let Some(caps) = DATE_DAY_MONTH_NUM.captures(src) {
        let month: u32 = caps[2].parse().ok()?;
        return ymd(&caps[3], month, &caps[1]);
    }

    if let Some(caps) = DATE_MONTH_NAME_DAY.captures(src) {
        return ymd(&caps[3], month_number(&caps[1])?, &caps[2]);
    }

    None
}

/// The first date-shaped token in `s`, whether or not it validates.
pub fn first_date_token(s: &str) -> Option<&str> {
    DATE_TOKEN.find(s).map(|m| m.as_str())
}

/// Parse the first date-shaped token in `s`.
pub fn first_date(s: &str) -> Option<NaiveDate> {
    first_date_token(s).and_then(parse_date)
}

fn ymd(year: &str, month: u32, day: &str) -> Option<NaiveDate> {
    let year = parse_year(year)?;
    let day: u32 = day.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Two-digit years are always 20yy.
fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    Some(if year < 100 { 2000 + year } else { year })
}

fn month_number(name: &str) -> Option<u32> {
    let stem = name.get(..3)?.to_ascii_lowercase();
    let month = match stem.as_str() {
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
