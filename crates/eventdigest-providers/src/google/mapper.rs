//! Mapping of Google Calendar and Google Photos records.
//!
//! The raw types mirror the JSON of the Calendar API v3 and the Photos
//! Library API with every field optional, so that a single incomplete record
//! is dropped instead of failing the whole response.

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use eventdigest_core::{
    Calendar, CalendarEvent, CalendarKind, GooglePhoto, PhotoAlbum, PhotoSize, end_of_day_time,
    local_instant,
};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::mapper::{CalendarMapper, EventMapper};

/// An event of the Calendar API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEvent {
    pub id: Option<String>,
    pub summary: Option<String>,
    pub location: Option<String>,
    pub start: Option<ApiEventTime>,
    pub end: Option<ApiEventTime>,
    pub status: Option<String>,
}

/// Start or end of an event: `dateTime` for timed events, `date` for
/// all-day events.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEventTime {
    pub date: Option<String>,
    pub date_time: Option<String>,
    pub time_zone: Option<String>,
}

/// An entry of the calendar list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCalendar {
    pub id: Option<String>,
    pub summary: Option<String>,
    #[serde(default)]
    pub primary: bool,
}

/// An album of the Photos Library API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAlbum {
    pub id: Option<String>,
    pub title: Option<String>,
    /// int64 sent as a string.
    pub media_items_count: Option<String>,
    pub cover_photo_base_url: Option<String>,
    pub product_url: Option<String>,
}

/// A media item of the Photos Library API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMediaItem {
    pub id: Option<String>,
    pub filename: Option<String>,
    pub mime_type: Option<String>,
    pub base_url: Option<String>,
    pub product_url: Option<String>,
    pub media_metadata: Option<ApiMediaMetadata>,
}

/// Size of a media item, int64 values sent as strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMediaMetadata {
    pub width: Option<String>,
    pub height: Option<String>,
}

/// Maps Calendar API records. All-day dates resolve in `tz`.
#[derive(Debug, Clone)]
pub struct GoogleMapper<Tz: TimeZone = Local> {
    tz: Tz,
}

impl GoogleMapper<Local> {
    pub fn new() -> Self {
        Self { tz: Local }
    }
}

impl Default for GoogleMapper<Local> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Tz: TimeZone> GoogleMapper<Tz> {
    /// Mapper resolving all-day dates in `tz`.
    pub fn in_zone(tz: Tz) -> Self {
        Self { tz }
    }

    /// A timed start as is; an all-day start at midnight of its date.
    fn resolve_start(&self, start: &ApiEventTime) -> Option<DateTime<Utc>> {
        match start.date_time {
            Some(ref date_time) => parse_date_time(date_time),
            None => local_instant(&self.tz, parse_date(start)?, NaiveTime::MIN),
        }
    }

    /// A timed end as is. An all-day end date is exclusive: the event ends
    /// at 23:59 of the day before it, never earlier than its start date.
    fn resolve_end(&self, start: &ApiEventTime, end: &ApiEventTime) -> Option<DateTime<Utc>> {
        if let Some(ref date_time) = end.date_time {
            return parse_date_time(date_time);
        }

        let end_date = parse_date(end)?;
        let mut last_day = end_date.pred_opt().unwrap_or(end_date);
        if let Some(start_date) = parse_date(start) {
            last_day = last_day.max(start_date);
        }
        local_instant(&self.tz, last_day, end_of_day_time())
    }
}

fn parse_date_time(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_date(value: &ApiEventTime) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.date.as_deref()?, "%Y-%m-%d").ok()
}

impl<Tz: TimeZone> EventMapper for GoogleMapper<Tz> {
    type Raw = ApiEvent;

    fn map_event(&self, raw: &ApiEvent) -> Option<CalendarEvent> {
        let id = raw.id.as_deref();
        if raw.status.as_deref() == Some("cancelled") {
            debug!(event_id = id.unwrap_or("<none>"), "google event cancelled, skipping");
            return None;
        }

        let mapped = (|| {
            let start_raw = raw.start.as_ref()?;
            let start = self.resolve_start(start_raw)?;
            let end = self.resolve_end(start_raw, raw.end.as_ref()?)?;
            Some(
                CalendarEvent::new(id?, raw.summary.as_deref()?, start, end)
                    .with_optional_location(raw.location.clone()),
            )
        })();

        if mapped.is_none() {
            debug!(event_id = id.unwrap_or("<none>"), "google event missing required field, skipping");
        }
        mapped
    }
}

impl<Tz: TimeZone> CalendarMapper for GoogleMapper<Tz> {
    type Raw = ApiCalendar;

    fn map_calendar(&self, raw: &ApiCalendar) -> Option<Calendar> {
        match (raw.id.as_deref(), raw.summary.as_deref()) {
            (Some(id), Some(summary)) => Some(Calendar::new(id, summary, CalendarKind::Google)),
            (id, _) => {
                debug!(calendar_id = id.unwrap_or("<none>"), "google calendar missing required field, skipping");
                None
            }
        }
    }
}

/// Maps Photos Library API records.
#[derive(Debug, Clone, Copy, Default)]
pub struct GooglePhotosMapper;

impl GooglePhotosMapper {
    pub fn new() -> Self {
        Self
    }

    /// Maps one album, `None` if a field is missing or malformed.
    pub fn map_album(&self, raw: &ApiAlbum) -> Option<PhotoAlbum> {
        let mapped = (|| {
            Some(PhotoAlbum::new(
                raw.id.as_deref()?,
                raw.title.as_deref()?,
                raw.media_items_count.as_deref()?.parse().ok()?,
                Url::parse(raw.cover_photo_base_url.as_deref()?).ok()?,
                Url::parse(raw.product_url.as_deref()?).ok()?,
            ))
        })();

        if mapped.is_none() {
            debug!(album_id = raw.id.as_deref().unwrap_or("<none>"), "google album incomplete, skipping");
        }
        mapped
    }

    /// Maps albums, skipping malformed ones.
    pub fn map_albums(&self, raws: &[ApiAlbum]) -> Vec<PhotoAlbum> {
        raws.iter().filter_map(|raw| self.map_album(raw)).collect()
    }

    /// Maps one media item, `None` if a field is missing or malformed.
    pub fn map_photo(&self, raw: &ApiMediaItem) -> Option<GooglePhoto> {
        let mapped = (|| {
            let metadata = raw.media_metadata.as_ref()?;
            let width: f64 = metadata.width.as_deref()?.parse().ok()?;
            let height: f64 = metadata.height.as_deref()?.parse().ok()?;

            Some(GooglePhoto::new(
                raw.id.as_deref()?,
                raw.filename.as_deref()?,
                raw.mime_type.as_deref()?,
                PhotoSize::new(width, height),
                Url::parse(raw.base_url.as_deref()?).ok()?,
                Url::parse(raw.product_url.as_deref()?).ok()?,
            ))
        })();

        if mapped.is_none() {
            debug!(photo_id = raw.id.as_deref().unwrap_or("<none>"), "google media item incomplete, skipping");
        }
        mapped
    }

    /// Maps media items, skipping malformed ones.
    pub fn map_photos(&self, raws: &[ApiMediaItem]) -> Vec<GooglePhoto> {
        raws.iter().filter_map(|raw| self.map_photo(raw)).collect()
    }
}
