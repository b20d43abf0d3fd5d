//! Time windows a digest is built for.

use chrono::{DateTime, Datelike, Duration, Local, NaiveTime, TimeZone, Utc, Weekday};
use eventdigest_core::{end_of_day_time, local_instant};

/// Hour of the day the default digest window opens.
const WEEK_START_HOUR: u32 = 12;

/// A `[since, until]` window of event start times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigestRange {
    pub since: DateTime<Utc>,
    pub until: DateTime<Utc>,
}

impl DigestRange {
    /// Creates a window. An `until` before `since` is clamped to `since`.
    pub fn new(since: DateTime<Utc>, until: DateTime<Utc>) -> Self {
        Self {
            since,
            until: until.max(since),
        }
    }

    /// `days` days starting at `since`, `None` if the end is past the
    /// representable range.
    pub fn days_from(since: DateTime<Utc>, days: u32) -> Option<Self> {
        let until = Duration::try_days(i64::from(days))
            .and_then(|length| since.checked_add_signed(length))?;
        Some(Self::new(since, until))
    }

    /// The default digest week in the local time zone. See
    /// [`upcoming_week_in`](Self::upcoming_week_in).
    pub fn upcoming_week() -> Self {
        Self::upcoming_week_in(&Local, Utc::now())
    }

    /// Thursday noon through the following Wednesday 23:59 in `tz`.
    ///
    /// The week starts today when `now` falls on a Thursday, even past noon,
    /// otherwise on the next Thursday.
    pub fn upcoming_week_in<Tz: TimeZone>(tz: &Tz, now: DateTime<Utc>) -> Self {
        let today = now.with_timezone(tz).date_naive();
        let days_ahead = (7 + Weekday::Thu.num_days_from_monday()
            - today.weekday().num_days_from_monday())
            % 7;
        let start_date = today + Duration::days(i64::from(days_ahead));
        let end_date = start_date + Duration::days(6);

        let noon = NaiveTime::from_hms_opt(WEEK_START_HOUR, 0, 0).unwrap_or(NaiveTime::MIN);
        let since = local_instant(tz, start_date, noon).unwrap_or(now);
        let until = local_instant(tz, end_date, end_of_day_time())
            .unwrap_or_else(|| since + Duration::days(7));
        Self::new(since, until)
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.since <= instant && instant <= self.until
    }
}
