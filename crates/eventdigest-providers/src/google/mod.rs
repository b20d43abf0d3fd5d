//! Google Calendar and Google Photos.
//!
//! Both APIs share the Google sign-in: one access token carrying the
//! calendar and photos scopes of [`GOOGLE_SCOPES`].

pub mod client;
pub mod mapper;
pub mod provider;

pub use client::{
    CALENDAR_API_BASE, GoogleCalendarClient, GooglePhotosClient, PHOTOS_API_BASE, PHOTOS_PAGE_SIZE,
};
pub use mapper::{
    ApiAlbum, ApiCalendar, ApiEvent, ApiEventTime, ApiMediaItem, ApiMediaMetadata, GoogleMapper,
    GooglePhotosMapper,
};
pub use provider::{GOOGLE_SCOPES, GoogleCalendar, GooglePhotos};
