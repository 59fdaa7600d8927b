use once_cell::sync::Lazy;
use regex::Regex;
use time::{Date, Month};

const MONTH_NAMES: &str = "january|february|march|april|may|june|july|august|september|october|november|december";
const MONTH_ABBREVS: &str = "jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec";

/// Date-shaped substring patterns, in priority order. Matches from every
/// pattern are unioned; duplicate literal substrings are suppressed.
static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // MM/DD/YYYY or MM-DD-YYYY
        r"\b\d{1,2}[/-]\d{1,2}[/-]\d{4}\b".to_string(),
        // YYYY/MM/DD or YYYY-MM-DD
        r"\b\d{4}[/-]\d{1,2}[/-]\d{1,2}\b".to_string(),
        // Month DD, YYYY
        format!(r"(?i)\b(?:{MONTH_NAMES})\s+\d{{1,2}},?\s+\d{{4}}\b"),
        // DD Month YYYY
        format!(r"(?i)\b\d{{1,2}}\s+(?:{MONTH_NAMES})\s+\d{{4}}\b"),
        // Mon DD, YYYY
        format!(r"(?i)\b(?:{MONTH_ABBREVS})\.?\s+\d{{1,2}},?\s+\d{{4}}\b"),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("date pattern must compile"))
    .collect()
});

static NUMERIC_MDY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})[/-](\d{1,2})[/-](\d{4})$").expect("pattern must compile"));
static NUMERIC_YMD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})[/-](\d{1,2})[/-](\d{1,2})$").expect("pattern must compile"));
static MONTH_FIRST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)([a-z]+)\.?\s+(\d{1,2}),?\s+(\d{4})$").expect("pattern must compile")
});
static DAY_FIRST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?i)(\d{1,2})\s+([a-z]+)\.?\s+(\d{4})$").expect("pattern must compile")
});

/// All date-like substrings of `text`, in pattern-priority order; the first
/// occurrence of a literal substring wins.
pub fn extract_date_strings(text: &str) -> Vec<String> {
    extract_date_matches(text)
        .into_iter()
        .map(|(_, s)| s)
        .collect()
}

/// Like [`extract_date_strings`], keeping the byte offset of each match for
/// keyword-window positioning.
pub(crate) fn extract_date_matches(text: &str) -> Vec<(usize, String)> {
    let mut seen = std::collections::HashSet::new();
    let mut dates = Vec::new();
    for pattern in DATE_PATTERNS.iter() {
        for matched in pattern.find_iter(text) {
            let s = matched.as_str();
            if seen.insert(s.to_string()) {
                dates.push((matched.start(), s.to_string()));
            }
        }
    }
    dates
}

/// Parse one extracted substring into a calendar date, trying the same
/// shapes the extraction patterns match, in the same order. Full month
/// names and the standard 3-letter abbreviations share one lookup table.
pub fn parse_date(raw: &str) -> Option<Date> {
    let raw = raw.trim();

    if let Some(caps) = NUMERIC_MDY.captures(raw) {
        return build_date(&caps[3], caps[1].parse().ok()?, &caps[2]);
    }
    if let Some(caps) = NUMERIC_YMD.captures(raw) {
        return build_date(&caps[1], caps[2].parse().ok()?, &caps[3]);
    }
    if let Some(caps) = MONTH_FIRST.captures(raw) {
        return build_date(&caps[3], month_number(&caps[1])?, &caps[2]);
    }
    if let Some(caps) = DAY_FIRST.captures(raw) {
        return build_date(&caps[3], month_number(&caps[2])?, &caps[1]);
    }
    None
}

/// YYYY-MM-DD.
pub fn format_iso(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

fn build_date(year: &str, month: u8, day: &str) -> Option<Date> {
    let year: i32 = year.parse().ok()?;
    let day: u8 = day.parse().ok()?;
    let month = Month::try_from(month).ok()?;
    Date::from_calendar_date(year, month, day).ok()
}

fn month_number(name: &str) -> Option<u8> {
    let number = match name.to_lowercase().as_str() {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sep" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(number)
}
