//! Collaborator traits between the application and the providers.
//!
//! The traits are object-safe: async methods return a [`BoxFuture`]. They
//! never fail. Implementations log provider errors and answer `None`, `false`
//! or an empty [`PhotoPage`] instead.

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use eventdigest_core::{Calendar, CalendarEvent, CalendarKind, GooglePhoto, PhotoAlbum};
use tracing::error;

use crate::error::ProviderResult;

/// A boxed future for async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Signs the user in with a provider.
pub trait LoginService: Send + Sync {
    /// Returns true if a session with the provider is active.
    fn is_logged_in(&self) -> bool;

    /// Starts a session, asking for `permissions`.
    fn log_in<'a>(&'a self, permissions: &'a [&'a str]) -> BoxFuture<'a, bool>;

    /// Resumes a session from a previous run.
    fn restore_previous_sign_in(&self) -> BoxFuture<'_, bool>;

    /// Ends the session.
    fn log_out(&self) -> BoxFuture<'_, ()>;
}

/// Hands out the bearer token of the current session.
pub trait AccessTokenSource: Send + Sync {
    fn access_token(&self) -> Option<String>;
}

/// Lists calendars and their events.
pub trait CalendarSource: Send + Sync {
    /// Provider behind this source.
    fn kind(&self) -> CalendarKind;

    /// Permissions to request on log in.
    fn permissions(&self) -> &'static [&'static str];

    /// Calendars the user can pick from.
    fn get_calendars(&self) -> BoxFuture<'_, Option<Vec<Calendar>>>;

    /// Events of `calendar_id` between `since` and `until`.
    fn get_events<'a>(
        &'a self,
        calendar_id: &'a str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> BoxFuture<'a, Option<Vec<CalendarEvent>>>;
}

/// One page of photos of an album.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotoPage {
    pub photos: Vec<GooglePhoto>,
    /// Token of the following page, `None` on the last page.
    pub next_page_token: Option<String>,
}

impl PhotoPage {
    /// Creates a page.
    pub fn new(photos: Vec<GooglePhoto>, next_page_token: Option<String>) -> Self {
        Self {
            photos,
            next_page_token,
        }
    }

    /// A final page with no photos. Failed fetches collapse to this.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if no page follows this one.
    pub fn is_last(&self) -> bool {
        self.next_page_token.is_none()
    }
}

/// Lists albums and pages through their photos.
pub trait PhotoSource: Send + Sync {
    /// All albums of the library.
    fn get_albums(&self) -> BoxFuture<'_, Option<Vec<PhotoAlbum>>>;

    /// The page of `album_id` at `page_token`, or the first page.
    fn get_photos<'a>(
        &'a self,
        album_id: &'a str,
        page_token: Option<&'a str>,
    ) -> BoxFuture<'a, PhotoPage>;
}

/// Logs a failed provider call and turns the result into an `Option`.
pub(crate) fn ok_or_log<T>(result: ProviderResult<T>, operation: &str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            error!(
                provider = err.provider().unwrap_or("unknown"),
                code = %err.code(),
                operation,
                "{}",
                err.message()
            );
            None
        }
    }
}
