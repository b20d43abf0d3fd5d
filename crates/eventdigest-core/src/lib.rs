//! Core types: calendars, events, photos, day splitting, summary rendering

pub mod calendar;
pub mod event;
pub mod photo;
pub mod summary;
pub mod tracing;

pub use calendar::{Calendar, CalendarKind};
pub use event::{CalendarEvent, end_of_day_time, expand_multiday, local_instant, sort_by_start};
pub use photo::{GooglePhoto, MAX_PHOTO_SIZE, Orientation, PhotoAlbum, PhotoSize};
pub use summary::{SummaryPost, SummaryTemplate, date_header, ordinal_suffix, summary, summary_in};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
