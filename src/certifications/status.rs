use serde::Serialize;
use time::{Date, OffsetDateTime};

/// Default warning window before expiry, in days.
pub const DEFAULT_WARNING_DAYS: i64 = 30;

const MS_PER_DAY: i128 = 86_400_000;

/// Certification validity relative to a reference time. Never stored;
/// always recomputed from the expiration date and the current timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificationStatus {
    NoExpiration,
    Valid,
    ExpiringSoon,
    Expired,
}

/// Days until the certification expires, at calendar-day granularity.
///
/// The expiration date is anchored at midnight UTC and the difference to
/// `now` is rounded up, so a certification expiring later today reports 0
/// and one that lapsed yesterday reports a negative count.
pub fn days_until_expiry(expiration: Date, now: OffsetDateTime) -> i64 {
    let expiry = expiration.midnight().assume_utc();
    let delta_ms = (expiry - now).whole_milliseconds();
    ceil_div(delta_ms, MS_PER_DAY) as i64
}

pub fn certification_status(
    expiration: Option<Date>,
    now: OffsetDateTime,
    warning_days: i64,
) -> CertificationStatus {
    let Some(expiration) = expiration else {
        return CertificationStatus::NoExpiration;
    };

    let days = days_until_expiry(expiration, now);
    if days < 0 {
        CertificationStatus::Expired
    } else if days <= warning_days {
        CertificationStatus::ExpiringSoon
    } else {
        CertificationStatus::Valid
    }
}

fn ceil_div(n: i128, d: i128) -> i128 {
    (n + d - 1).div_euclid(d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use time::macros::datetime;
    use time::Duration;

    const NOW: OffsetDateTime = datetime!(2024-06-15 10:30 UTC);

    #[test]
    fn no_expiration_regardless_of_now() {
        assert_eq!(
            certification_status(None, NOW, DEFAULT_WARNING_DAYS),
            CertificationStatus::NoExpiration
        );
        assert_eq!(
            certification_status(None, datetime!(1999-01-01 0:00 UTC), DEFAULT_WARNING_DAYS),
            CertificationStatus::NoExpiration
        );
    }

    #[test]
    fn expired_one_day_in_the_past() {
        let expiration = (NOW - Duration::days(1)).date();
        assert_matches!(
            certification_status(Some(expiration), NOW, DEFAULT_WARNING_DAYS),
            CertificationStatus::Expired
        );
    }

    #[test]
    fn expiring_soon_at_exact_warning_threshold() {
        let expiration = NOW.date() + Duration::days(DEFAULT_WARNING_DAYS);
        assert_eq!(
            certification_status(Some(expiration), NOW, DEFAULT_WARNING_DAYS),
            CertificationStatus::ExpiringSoon
        );
    }

    #[test]
    fn valid_one_day_past_warning_threshold() {
        let expiration = NOW.date() + Duration::days(DEFAULT_WARNING_DAYS + 1);
        assert_eq!(
            certification_status(Some(expiration), NOW, DEFAULT_WARNING_DAYS),
            CertificationStatus::Valid
        );
    }

    #[test]
    fn expiring_today_counts_as_zero_days() {
        // Midnight has passed but the calendar day has not.
        assert_eq!(days_until_expiry(NOW.date(), NOW), 0);
        assert_eq!(
            certification_status(Some(NOW.date()), NOW, DEFAULT_WARNING_DAYS),
            CertificationStatus::ExpiringSoon
        );
    }

    #[test]
    fn days_until_expiry_rounds_up() {
        let expiration = NOW.date() + Duration::days(10);
        assert_eq!(days_until_expiry(expiration, NOW), 10);

        let expired = NOW.date() - Duration::days(3);
        assert_eq!(days_until_expiry(expired, NOW), -3);
    }

    #[test]
    fn custom_warning_window() {
        let expiration = NOW.date() + Duration::days(45);
        assert_eq!(
            certification_status(Some(expiration), NOW, 60),
            CertificationStatus::ExpiringSoon
        );
        assert_eq!(
            certification_status(Some(expiration), NOW, DEFAULT_WARNING_DAYS),
            CertificationStatus::Valid
        );
    }
}
