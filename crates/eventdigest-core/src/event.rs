//! Provider-agnostic calendar events and day splitting.
//!
//! A [`CalendarEvent`] is what every provider mapper produces. Events longer
//! than a day are expanded with [`CalendarEvent::split_by_day`] so a digest
//! can list them once per calendar day.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;
use tracing::{debug, trace};

/// Events lasting longer than this are considered multi-day.
const MULTIDAY_THRESHOLD_HOURS: i64 = 24;

/// A calendar event from any provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEvent {
    /// Provider identifier. Shared by every day segment of a split event.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Venue name, if the provider reported one.
    pub location: Option<String>,
    /// Whether the event happens online.
    pub is_online: bool,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
}

impl CalendarEvent {
    /// Creates an event.
    ///
    /// An `end_time` before `start_time` is clamped to `start_time`.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        let id = id.into();
        let end_time = if end_time < start_time {
            debug!(event_id = %id, %start_time, %end_time, "event ends before it starts, clamping");
            start_time
        } else {
            end_time
        };

        Self {
            id,
            name: name.into(),
            location: None,
            is_online: false,
            start_time,
            end_time,
        }
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Builder method to set an optional location.
    pub fn with_optional_location(mut self, location: Option<String>) -> Self {
        self.location = location;
        self
    }

    /// Builder method to flag the event as online.
    pub fn with_online(mut self, is_online: bool) -> Self {
        self.is_online = is_online;
        self
    }

    /// When the event starts.
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// When the event ends. Never before [`start_time`](Self::start_time).
    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    /// How long the event lasts.
    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    /// Returns true if the event lasts more than 24 hours.
    pub fn is_multiday(&self) -> bool {
        self.duration() > Duration::hours(MULTIDAY_THRESHOLD_HOURS)
    }

    /// Splits a multi-day event into one event per local calendar day.
    ///
    /// See [`split_by_day_in`](Self::split_by_day_in).
    pub fn split_by_day(&self) -> Option<Vec<CalendarEvent>> {
        self.split_by_day_in(&Local)
    }

    /// Splits a multi-day event into one event per calendar day of `tz`.
    ///
    /// Returns `None` for events that are not multi-day. The first segment
    /// keeps the original start and ends at 23:59, interior segments cover
    /// 00:00 to 23:59, and the last segment starts at 00:00 and keeps the
    /// original end. Segment names get a `" - Day N"` suffix.
    ///
    /// If a local day boundary does not exist (e.g. midnight skipped by a
    /// DST change) the segments built so far are returned.
    pub fn split_by_day_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<Vec<CalendarEvent>> {
        if !self.is_multiday() {
            return None;
        }

        let first_day = self.start_time.with_timezone(tz).date_naive();
        let last_day = self.end_time.with_timezone(tz).date_naive();

        let mut segments = Vec::new();
        let mut day = first_day;

        loop {
            let start = if day == first_day {
                Some(self.start_time)
            } else {
                local_instant(tz, day, NaiveTime::MIN)
            };
            let end = if day == last_day {
                Some(self.end_time)
            } else {
                local_instant(tz, day, end_of_day_time())
            };

            let (Some(start), Some(end)) = (start, end) else {
                debug!(event_id = %self.id, %day, "day boundary not representable, stopping split");
                break;
            };

            let number = segments.len() + 1;
            segments.push(self.day_segment(number, start, end));

            if day == last_day {
                break;
            }
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }

        trace!(event_id = %self.id, segments = segments.len(), "split multi-day event");
        Some(segments)
    }

    fn day_segment(&self, number: usize, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self::new(
            self.id.clone(),
            format!("{} - Day {}", self.name, number),
            start,
            end,
        )
        .with_optional_location(self.location.clone())
        .with_online(self.is_online)
    }
}

/// Sorts events ascending by start time, keeping provider order for ties.
pub fn sort_by_start(events: &mut [CalendarEvent]) {
    events.sort_by_key(CalendarEvent::start_time);
}

/// Expands every multi-day event into its day segments, in place order.
pub fn expand_multiday<Tz: TimeZone>(events: Vec<CalendarEvent>, tz: &Tz) -> Vec<CalendarEvent> {
    events
        .into_iter()
        .flat_map(|event| match event.split_by_day_in(tz) {
            Some(segments) => segments,
            None => vec![event],
        })
        .collect()
}

/// Wall-clock time used as the end of a day segment.
pub fn end_of_day_time() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN)
}

/// Converts a local date and time in `tz` to UTC.
pub fn local_instant<Tz: TimeZone>(
    tz: &Tz,
    date: NaiveDate,
    time: NaiveTime,
) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn event(start: DateTime<Utc>, end: DateTime<Utc>) -> CalendarEvent {
        CalendarEvent::new("evt-1", "Jazz Festival", start, end).with_location("Old Town Square")
    }

    mod construction {
        use super::*;

        #[test]
        fn builder_pattern() {
            let event = CalendarEvent::new("1", "Gig", utc(2024, 6, 6, 20, 0), utc(2024, 6, 6, 23, 0))
                .with_location("Blue Note")
                .with_online(true);

            assert_eq!(event.location.as_deref(), Some("Blue Note"));
            assert!(event.is_online);
            assert_eq!(event.duration(), Duration::hours(3));
        }

        #[test]
        fn end_before_start_is_clamped() {
            let event = CalendarEvent::new("1", "Gig", utc(2024, 6, 6, 20, 0), utc(2024, 6, 6, 19, 0));
            assert_eq!(event.end_time(), event.start_time());
        }

        #[test]
        fn multiday_threshold() {
            let start = utc(2024, 6, 6, 10, 0);
            assert!(!event(start, start + Duration::hours(24)).is_multiday());
            assert!(event(start, start + Duration::hours(24) + Duration::minutes(1)).is_multiday());
        }

        #[test]
        fn sort_is_stable() {
            let mut events = vec![
                CalendarEvent::new("b", "B", utc(2024, 6, 7, 9, 0), utc(2024, 6, 7, 10, 0)),
                CalendarEvent::new("a1", "A1", utc(2024, 6, 6, 9, 0), utc(2024, 6, 6, 10, 0)),
                CalendarEvent::new("a2", "A2", utc(2024, 6, 6, 9, 0), utc(2024, 6, 6, 10, 0)),
            ];
            sort_by_start(&mut events);
            let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
            assert_eq!(ids, ["a1", "a2", "b"]);
        }
    }

    mod split {
        use super::*;

        #[test]
        fn short_event_is_not_split() {
            let start = utc(2024, 6, 6, 10, 0);
            assert!(event(start, start + Duration::hours(2)).split_by_day_in(&Utc).is_none());
            assert!(event(start, start + Duration::hours(24)).split_by_day_in(&Utc).is_none());
        }

        #[test]
        fn three_day_event() {
            let ev = event(utc(2024, 6, 6, 18, 0), utc(2024, 6, 8, 14, 30));
            let segments = ev.split_by_day_in(&Utc).unwrap();

            assert_eq!(segments.len(), 3);

            assert_eq!(segments[0].name, "Jazz Festival - Day 1");
            assert_eq!(segments[0].start_time(), utc(2024, 6, 6, 18, 0));
            assert_eq!(segments[0].end_time(), utc(2024, 6, 6, 23, 59));

            assert_eq!(segments[1].name, "Jazz Festival - Day 2");
            assert_eq!(segments[1].start_time(), utc(2024, 6, 7, 0, 0));
            assert_eq!(segments[1].end_time(), utc(2024, 6, 7, 23, 59));

            assert_eq!(segments[2].name, "Jazz Festival - Day 3");
            assert_eq!(segments[2].start_time(), utc(2024, 6, 8, 0, 0));
            assert_eq!(segments[2].end_time(), utc(2024, 6, 8, 14, 30));

            for segment in &segments {
                assert_eq!(segment.id, "evt-1");
                assert_eq!(segment.location.as_deref(), Some("Old Town Square"));
                assert!(!segment.is_online);
            }
        }

        #[test]
        fn segments_cover_range_in_order() {
            let ev = event(utc(2024, 2, 27, 7, 15), utc(2024, 3, 2, 21, 0));
            let segments = ev.split_by_day_in(&Utc).unwrap();

            // Feb 27, 28, 29, Mar 1, 2
            assert_eq!(segments.len(), 5);
            assert_eq!(segments.first().unwrap().start_time(), ev.start_time());
            assert_eq!(segments.last().unwrap().end_time(), ev.end_time());

            for pair in segments.windows(2) {
                assert!(pair[0].end_time() < pair[1].start_time());
                assert_eq!(
                    pair[1].start_time() - pair[0].end_time(),
                    Duration::minutes(1)
                );
            }
        }

        #[test]
        fn days_follow_the_given_time_zone() {
            // 22:00 UTC is already the next day at UTC+3.
            let tz = FixedOffset::east_opt(3 * 3600).unwrap();
            let ev = event(utc(2024, 6, 6, 22, 0), utc(2024, 6, 8, 1, 0));

            let in_utc = ev.split_by_day_in(&Utc).unwrap();
            let in_tz = ev.split_by_day_in(&tz).unwrap();

            assert_eq!(in_utc.len(), 3);
            assert_eq!(in_tz.len(), 2);
            // Local 23:59 on June 7th at UTC+3
            assert_eq!(in_tz[0].end_time(), utc(2024, 6, 7, 20, 59));
            assert_eq!(in_tz[1].start_time(), utc(2024, 6, 7, 21, 0));
        }

        #[test]
        fn ending_at_midnight_touches_last_day() {
            let ev = event(utc(2024, 6, 6, 10, 0), utc(2024, 6, 8, 0, 0));
            let segments = ev.split_by_day_in(&Utc).unwrap();

            assert_eq!(segments.len(), 3);
            let last = segments.last().unwrap();
            assert_eq!(last.start_time(), last.end_time());
        }

        #[test]
        fn start_after_end_of_day_minute_is_clamped() {
            let ev = event(utc(2024, 6, 6, 23, 59) + Duration::seconds(30), utc(2024, 6, 8, 1, 0));
            let segments = ev.split_by_day_in(&Utc).unwrap();
            assert_eq!(segments[0].start_time(), segments[0].end_time());
        }

        #[test]
        fn expand_keeps_short_events() {
            let short = CalendarEvent::new("s", "Talk", utc(2024, 6, 6, 9, 0), utc(2024, 6, 6, 10, 0));
            let long = event(utc(2024, 6, 6, 18, 0), utc(2024, 6, 7, 20, 0));

            let expanded = expand_multiday(vec![short.clone(), long], &Utc);
            assert_eq!(expanded.len(), 3);
            assert_eq!(expanded[0], short);
            assert_eq!(expanded[2].name, "Jazz Festival - Day 2");
        }
    }
}
