//! Mapping of Graph API records.
//!
//! Graph API records are handled as untyped JSON: events and pages carry
//! optional nested objects (`place`) and the time format is not RFC 3339
//! (`2024-06-06T20:00:00+0000`).

use chrono::{DateTime, Utc};
use eventdigest_core::{Calendar, CalendarEvent, CalendarKind};
use serde_json::Value;
use tracing::debug;

use crate::mapper::{CalendarMapper, EventMapper};

const GRAPH_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Maps Graph API events and pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct FacebookMapper;

impl FacebookMapper {
    pub fn new() -> Self {
        Self
    }
}

impl EventMapper for FacebookMapper {
    type Raw = Value;

    fn map_event(&self, raw: &Value) -> Option<CalendarEvent> {
        let Some(id) = str_field(raw, "id") else {
            debug!("facebook event without id, skipping");
            return None;
        };

        let name = required(raw, id, "name", str_field)?;
        let start_time = required(raw, id, "start_time", time_field)?;
        let end_time = required(raw, id, "end_time", time_field)?;
        let is_online = required(raw, id, "is_online", |raw, key| raw.get(key)?.as_bool())?;

        let location = raw
            .get("place")
            .and_then(|place| place.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string);

        Some(
            CalendarEvent::new(id, name, start_time, end_time)
                .with_optional_location(location)
                .with_online(is_online),
        )
    }
}

impl CalendarMapper for FacebookMapper {
    type Raw = Value;

    fn map_calendar(&self, raw: &Value) -> Option<Calendar> {
        let Some(id) = str_field(raw, "id") else {
            debug!("facebook page without id, skipping");
            return None;
        };
        let name = required(raw, id, "name", str_field)?;

        Some(Calendar::new(id, name, CalendarKind::Facebook))
    }
}

fn required<'a, T>(
    raw: &'a Value,
    id: &str,
    key: &str,
    read: impl Fn(&'a Value, &str) -> Option<T>,
) -> Option<T> {
    let value = read(raw, key);
    if value.is_none() {
        debug!(record_id = id, field = key, "facebook record missing required field, skipping");
    }
    value
}

fn str_field<'a>(raw: &'a Value, key: &str) -> Option<&'a str> {
    raw.get(key)?.as_str()
}

fn time_field(raw: &Value, key: &str) -> Option<DateTime<Utc>> {
    parse_graph_time(str_field(raw, key)?)
}

/// Parses a Graph API timestamp. RFC 3339 is accepted too.
pub fn parse_graph_time(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, GRAPH_TIME_FORMAT))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    mod events {
        use super::*;

        fn payload() -> Vec<Value> {
            vec![
                json!({
                    "id": "1", "name": "Open Mic",
                    "start_time": "2024-06-06T20:00:00+0000",
                    "end_time": "2024-06-06T23:00:00+0000",
                    "is_online": false,
                    "place": {"name": "Blue Note", "id": "99"}
                }),
                json!({
                    "id": "2", "name": "Webinar",
                    "start_time": "2024-06-07T18:00:00+0200",
                    "end_time": "2024-06-07T19:00:00+0200",
                    "is_online": true
                }),
                json!({
                    "id": "3",
                    "start_time": "2024-06-08T18:00:00+0000",
                    "end_time": "2024-06-08T19:00:00+0000",
                    "is_online": false
                }),
                json!({
                    "id": "4", "name": "Brunch",
                    "start_time": "2024-06-09T10:00:00+0000",
                    "end_time": "2024-06-09T12:00:00+0000",
                    "is_online": false,
                    "place": {"id": "no-name"}
                }),
                json!({
                    "id": "5", "name": "Closing Party",
                    "start_time": "2024-06-10T21:00:00Z",
                    "end_time": "2024-06-11T02:00:00Z",
                    "is_online": false
                }),
            ]
        }

        #[test]
        fn malformed_record_is_dropped_and_order_kept() {
            let events = FacebookMapper::new().map_events(&payload());
            let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
            assert_eq!(ids, ["1", "2", "4", "5"]);
        }

        #[test]
        fn maps_fields() {
            let events = FacebookMapper::new().map_events(&payload());

            assert_eq!(events[0].name, "Open Mic");
            assert_eq!(events[0].location.as_deref(), Some("Blue Note"));
            assert!(!events[0].is_online);
            assert_eq!(events[0].start_time(), utc(2024, 6, 6, 20, 0));
            assert_eq!(events[0].end_time(), utc(2024, 6, 6, 23, 0));

            assert!(events[1].is_online);
            assert_eq!(events[1].start_time(), utc(2024, 6, 7, 16, 0));
            assert!(events[1].location.is_none());

            // place without a name
            assert!(events[2].location.is_none());
        }

        #[test]
        fn each_required_field_is_required() {
            let complete = payload().remove(0);
            for key in ["id", "name", "start_time", "end_time", "is_online"] {
                let mut raw = complete.clone();
                raw.as_object_mut().unwrap().remove(key);
                assert!(
                    FacebookMapper::new().map_event(&raw).is_none(),
                    "missing {key} should be rejected"
                );
            }
        }

        #[test]
        fn wrong_types_are_rejected() {
            let raw = json!({
                "id": "1", "name": "Gig",
                "start_time": "yesterday",
                "end_time": "2024-06-06T23:00:00+0000",
                "is_online": false
            });
            assert!(FacebookMapper::new().map_event(&raw).is_none());

            let raw = json!({
                "id": "1", "name": "Gig",
                "start_time": "2024-06-06T20:00:00+0000",
                "end_time": "2024-06-06T23:00:00+0000",
                "is_online": "no"
            });
            assert!(FacebookMapper::new().map_event(&raw).is_none());
        }
    }

    mod pages {
        use super::*;

        #[test]
        fn maps_pages() {
            let raws = vec![
                json!({"id": "10", "name": "Jazz Club"}),
                json!({"id": "11"}),
                json!({"name": "No Id"}),
                json!({"id": "12", "name": "Blues Bar", "access_token": "secret"}),
            ];
            let calendars = FacebookMapper::new().map_calendars(&raws);
            assert_eq!(
                calendars,
                vec![
                    Calendar::new("10", "Jazz Club", CalendarKind::Facebook),
                    Calendar::new("12", "Blues Bar", CalendarKind::Facebook),
                ]
            );
        }
    }

    #[test]
    fn graph_time_formats() {
        assert_eq!(
            parse_graph_time("2024-06-06T20:00:00+0000"),
            Some(utc(2024, 6, 6, 20, 0))
        );
        assert_eq!(
            parse_graph_time("2024-06-06T20:00:00-0500"),
            Some(utc(2024, 6, 7, 1, 0))
        );
        assert_eq!(
            parse_graph_time("2024-06-06T20:00:00+00:00"),
            Some(utc(2024, 6, 6, 20, 0))
        );
        assert_eq!(parse_graph_time("2024-06-06"), None);
    }
}
