use time::{Date, OffsetDateTime};

use crate::ocr::dates::{extract_date_matches, parse_date};

/// Keyword lists searched in order; plain substring matches, so short
/// entries like "to" and "exp" can hit inside longer words. That looseness
/// is intentional, the list order puts the precise keywords first.
const ISSUE_KEYWORDS: &[&str] = &[
    "issued",
    "issue date",
    "date issued",
    "effective",
    "start date",
    "from",
    "valid from",
];
const EXPIRATION_KEYWORDS: &[&str] = &[
    "expires",
    "expiration",
    "exp",
    "valid until",
    "valid through",
    "end date",
    "to",
    "expiry",
];

const WINDOW_BEFORE: usize = 20;
const WINDOW_AFTER: usize = 100;

/// Assign issue and expiration dates from raw OCR text.
///
/// Keyword-window search runs first for each side independently; whatever
/// is still unassigned falls back to temporal inference over all extracted
/// dates (earliest wins issue, the latest still-future date wins
/// expiration), and a lone date is classified by past/future alone.
pub fn classify_dates(
    text: &str,
    all_dates: &[String],
    now: OffsetDateTime,
) -> (Option<Date>, Option<Date>) {
    let lower = text.to_lowercase();
    let mut issue = keyword_window_date(&lower, ISSUE_KEYWORDS);
    let mut expiration = keyword_window_date(&lower, EXPIRATION_KEYWORDS);

    if issue.is_none() || expiration.is_none() {
        let today = now.date();
        let mut parsed: Vec<Date> = all_dates.iter().filter_map(|s| parse_date(s)).collect();
        parsed.sort_unstable();

        match parsed.as_slice() {
            [] => {}
            [only] => {
                if *only > today {
                    if expiration.is_none() {
                        expiration = Some(*only);
                    }
                } else if issue.is_none() {
                    issue = Some(*only);
                }
            }
            [earliest, .., latest] => {
                if issue.is_none() {
                    issue = Some(*earliest);
                }
                if expiration.is_none() {
                    let latest_future = parsed.iter().rev().find(|d| **d > today).copied();
                    expiration = latest_future.or(Some(*latest));
                }
            }
        }
    }

    (issue, expiration)
}

/// First parseable date near a keyword: a window from 20 characters before
/// the keyword to 100 characters after its end. Keywords are tried in list
/// order until one yields a date. Dates at or after the keyword itself are
/// preferred; the 20-character lead is only consulted when nothing follows,
/// so "Issued: <date> Expires: <date>" never bleeds the issue date into the
/// expiration slot.
fn keyword_window_date(lower: &str, keywords: &[&str]) -> Option<Date> {
    for keyword in keywords {
        let Some(idx) = lower.find(keyword) else {
            continue;
        };
        let start = floor_char_boundary(lower, idx.saturating_sub(WINDOW_BEFORE));
        let end = floor_char_boundary(lower, (idx + keyword.len() + WINDOW_AFTER).min(lower.len()));
        let matches = extract_date_matches(&lower[start..end]);

        let keyword_offset = idx - start;
        let after_keyword = matches
            .iter()
            .filter(|(offset, _)| *offset >= keyword_offset)
            .find_map(|(_, s)| parse_date(s));
        let candidate =
            after_keyword.or_else(|| matches.iter().find_map(|(_, s)| parse_date(s)));
        if candidate.is_some() {
            return candidate;
        }
    }
    None
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::dates::extract_date_strings;
    use time::macros::{date, datetime};

    const NOW: OffsetDateTime = datetime!(2024-06-15 10:30 UTC);

    fn classify(text: &str) -> (Option<Date>, Option<Date>) {
        let all_dates = extract_date_strings(text);
        classify_dates(text, &all_dates, NOW)
    }

    #[test]
    fn keywords_assign_both_sides() {
        let (issue, expiration) = classify("Issued: 01/15/2024  Expires: 01/15/2026");
        assert_eq!(issue, Some(date!(2024 - 01 - 15)));
        assert_eq!(expiration, Some(date!(2026 - 01 - 15)));
    }

    #[test]
    fn keyword_window_reaches_backwards() {
        // Date sits before the keyword, within the 20-character lead window.
        let (issue, _) = classify("01/15/2024 issued by the Red Cross");
        assert_eq!(issue, Some(date!(2024 - 01 - 15)));
    }

    #[test]
    fn date_outside_window_is_not_claimed() {
        let padding = "x".repeat(120);
        let text = format!("Issued {padding} 01/15/2024");
        let all_dates = extract_date_strings(&text);
        let (issue, _) = classify_dates(&text, &all_dates, NOW);
        // Out of keyword reach; the single past date is claimed by the
        // fallback instead.
        assert_eq!(issue, Some(date!(2024 - 01 - 15)));
    }

    #[test]
    fn single_future_date_becomes_expiration() {
        let (issue, expiration) = classify("Valid until 12/31/2099");
        assert_eq!(issue, None);
        assert_eq!(expiration, Some(date!(2099 - 12 - 31)));
    }

    #[test]
    fn single_past_date_becomes_issue() {
        let (issue, expiration) = classify("Certificate 03/01/2020");
        assert_eq!(issue, Some(date!(2020 - 03 - 01)));
        assert_eq!(expiration, None);
    }

    #[test]
    fn two_unlabeled_past_dates_split_earliest_latest() {
        let (issue, expiration) = classify("03/01/2020 03/01/2023");
        assert_eq!(issue, Some(date!(2020 - 03 - 01)));
        // No future date exists, so the overall latest is used.
        assert_eq!(expiration, Some(date!(2023 - 03 - 01)));
    }

    #[test]
    fn latest_future_date_preferred_for_expiration() {
        // 2030 is the furthest future; 2023 is latest past.
        let (issue, expiration) = classify("01/01/2020 06/01/2023 01/01/2025 01/01/2030");
        assert_eq!(issue, Some(date!(2020 - 01 - 01)));
        assert_eq!(expiration, Some(date!(2030 - 01 - 01)));
    }

    #[test]
    fn keyword_match_survives_fallback() {
        // Expiration is labeled; issue comes from the earliest-date fallback.
        let (issue, expiration) =
            classify("05/10/2022 02/20/2021 certificate of record; expires 08/30/2024");
        assert_eq!(expiration, Some(date!(2024 - 08 - 30)));
        assert_eq!(issue, Some(date!(2021 - 02 - 20)));
    }

    #[test]
    fn no_dates_yields_nothing() {
        let (issue, expiration) = classify("No numbers in sight");
        assert_eq!(issue, None);
        assert_eq!(expiration, None);
    }

    #[test]
    fn keyword_list_order_wins() {
        // "valid from" appears, but "from" is earlier in the list and its
        // window already contains the date.
        let (issue, _) = classify("valid from January 15, 2024");
        assert_eq!(issue, Some(date!(2024 - 01 - 15)));
    }
}
