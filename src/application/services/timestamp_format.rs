//! Timestamp formatting for the feed timeline.
//!
//! Posts from the last 24 hours get a short relative label ("5 min. ago"),
//! older posts an absolute month-and-day label ("Jul 4").

use chrono::{DateTime, TimeDelta, Utc};

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;

/// Formats `at` for the timeline as seen at `now`.
#[must_use]
pub fn scrapbook_format(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(at);
    if elapsed >= TimeDelta::days(1) {
        at.format("%b %-d").to_string()
    } else {
        relative_short(elapsed)
    }
}

/// Formats `at` relative to the current time.
#[must_use]
pub fn scrapbook_format_now(at: DateTime<Utc>) -> String {
    scrapbook_format(at, Utc::now())
}

fn relative_short(elapsed: TimeDelta) -> String {
    let future = elapsed < TimeDelta::zero();
    let secs = elapsed.num_seconds().unsigned_abs();

    let amount = if secs < SECS_PER_MINUTE {
        format!("{secs} sec.")
    } else if secs < SECS_PER_HOUR {
        format!("{} min.", secs / SECS_PER_MINUTE)
    } else if secs < SECS_PER_DAY {
        format!("{} hr.", secs / SECS_PER_HOUR)
    } else {
        let days = secs / SECS_PER_DAY;
        format!("{days} day{}", if days == 1 { "" } else { "s" })
    };

    if future {
        format!("in {amount}")
    } else {
        format!("{amount} ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use test_case::test_case;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 7, 10, 12, 0, 0).unwrap()
    }

    #[test_case(0, "0 sec. ago" ; "just now")]
    #[test_case(12, "12 sec. ago" ; "seconds")]
    #[test_case(59, "59 sec. ago" ; "under a minute")]
    #[test_case(60, "1 min. ago" ; "one minute")]
    #[test_case(5 * 60 + 30, "5 min. ago" ; "minutes truncate")]
    #[test_case(3 * 3600, "3 hr. ago" ; "hours")]
    #[test_case(24 * 3600 - 1, "23 hr. ago" ; "just under a day")]
    fn test_relative(seconds_ago: i64, expected: &str) {
        let at = now() - TimeDelta::seconds(seconds_ago);
        assert_eq!(scrapbook_format(at, now()), expected);
    }

    #[test_case(5 * 60, "in 5 min." ; "minutes ahead")]
    #[test_case(2 * 24 * 3600, "in 2 days" ; "days ahead")]
    fn test_future(seconds_ahead: i64, expected: &str) {
        let at = now() + TimeDelta::seconds(seconds_ahead);
        assert_eq!(scrapbook_format(at, now()), expected);
    }

    #[test]
    fn test_absolute_uses_post_timestamp() {
        let at = Utc.with_ymd_and_hms(2020, 7, 4, 18, 30, 0).unwrap();
        assert_eq!(scrapbook_format(at, now()), "Jul 4");

        let older = Utc.with_ymd_and_hms(2019, 12, 25, 8, 0, 0).unwrap();
        assert_eq!(scrapbook_format(older, now()), "Dec 25");
    }

    #[test]
    fn test_exactly_one_day_is_absolute() {
        let at = now() - TimeDelta::days(1);
        assert_eq!(scrapbook_format(at, now()), "Jul 9");
    }
}
