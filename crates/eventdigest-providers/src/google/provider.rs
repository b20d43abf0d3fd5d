//! Google Calendar and Google Photos sources.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use eventdigest_core::{Calendar, CalendarEvent, CalendarKind, PhotoAlbum};
use tracing::debug;

use super::client::{GoogleCalendarClient, GooglePhotosClient, PHOTOS_PAGE_SIZE};
use super::mapper::{GoogleMapper, GooglePhotosMapper};
use crate::error::{ProviderError, ProviderResult};
use crate::http::DEFAULT_TIMEOUT;
use crate::mapper::{CalendarMapper, EventMapper};
use crate::provider::{AccessTokenSource, BoxFuture, CalendarSource, PhotoPage, PhotoSource, ok_or_log};

/// OAuth scopes requested when logging in to Google.
pub const GOOGLE_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/calendar.readonly",
    "https://www.googleapis.com/auth/photoslibrary.readonly",
];

const PROVIDER: &str = "google";

fn token(tokens: &dyn AccessTokenSource) -> ProviderResult<String> {
    tokens
        .access_token()
        .ok_or_else(|| ProviderError::missing_credential("not logged in to Google"))
}

/// Calendar source backed by Google Calendar.
pub struct GoogleCalendar {
    tokens: Arc<dyn AccessTokenSource>,
    mapper: GoogleMapper,
    timeout: Duration,
}

impl std::fmt::Debug for GoogleCalendar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleCalendar")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl GoogleCalendar {
    pub fn new(tokens: Arc<dyn AccessTokenSource>) -> Self {
        Self {
            tokens,
            mapper: GoogleMapper::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Builder method to set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn client(&self) -> ProviderResult<GoogleCalendarClient> {
        GoogleCalendarClient::new(token(self.tokens.as_ref())?, self.timeout)
    }

    async fn try_get_calendars(&self) -> ProviderResult<Vec<Calendar>> {
        let raws = self.client()?.list_calendars().await?;
        Ok(self.mapper.map_calendars(&raws))
    }

    async fn try_get_events(
        &self,
        calendar_id: &str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> ProviderResult<Vec<CalendarEvent>> {
        let raws = self.client()?.list_events(calendar_id, since, until).await?;
        let events = self.mapper.map_events(&raws);
        debug!(calendar_id, received = raws.len(), mapped = events.len(), "mapped google events");
        Ok(events)
    }
}

impl CalendarSource for GoogleCalendar {
    fn kind(&self) -> CalendarKind {
        CalendarKind::Google
    }

    fn permissions(&self) -> &'static [&'static str] {
        GOOGLE_SCOPES
    }

    fn get_calendars(&self) -> BoxFuture<'_, Option<Vec<Calendar>>> {
        Box::pin(async move {
            let result = self.try_get_calendars().await;
            ok_or_log(result.map_err(|e| e.with_provider(PROVIDER)), "get_calendars")
        })
    }

    fn get_events<'a>(
        &'a self,
        calendar_id: &'a str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> BoxFuture<'a, Option<Vec<CalendarEvent>>> {
        Box::pin(async move {
            let result = self.try_get_events(calendar_id, since, until).await;
            ok_or_log(result.map_err(|e| e.with_provider(PROVIDER)), "get_events")
        })
    }
}

/// Photo source backed by the Google Photos library.
pub struct GooglePhotos {
    tokens: Arc<dyn AccessTokenSource>,
    mapper: GooglePhotosMapper,
    timeout: Duration,
    page_size: usize,
}

impl std::fmt::Debug for GooglePhotos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GooglePhotos")
            .field("timeout", &self.timeout)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

impl GooglePhotos {
    pub fn new(tokens: Arc<dyn AccessTokenSource>) -> Self {
        Self {
            tokens,
            mapper: GooglePhotosMapper::new(),
            timeout: DEFAULT_TIMEOUT,
            page_size: PHOTOS_PAGE_SIZE,
        }
    }

    /// Builder method to set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder method to set how many media items a page holds.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    fn client(&self) -> ProviderResult<GooglePhotosClient> {
        Ok(GooglePhotosClient::new(token(self.tokens.as_ref())?, self.timeout)?
            .with_page_size(self.page_size))
    }

    async fn try_get_albums(&self) -> ProviderResult<Vec<PhotoAlbum>> {
        let raws = self.client()?.list_albums().await?;
        Ok(self.mapper.map_albums(&raws))
    }

    async fn try_get_photos(
        &self,
        album_id: &str,
        page_token: Option<&str>,
    ) -> ProviderResult<PhotoPage> {
        let (raws, next_page_token) = self
            .client()?
            .search_media_items(album_id, page_token)
            .await?;
        Ok(PhotoPage::new(self.mapper.map_photos(&raws), next_page_token))
    }
}

impl PhotoSource for GooglePhotos {
    fn get_albums(&self) -> BoxFuture<'_, Option<Vec<PhotoAlbum>>> {
        Box::pin(async move {
            let result = self.try_get_albums().await;
            ok_or_log(result.map_err(|e| e.with_provider(PROVIDER)), "get_albums")
        })
    }

    fn get_photos<'a>(
        &'a self,
        album_id: &'a str,
        page_token: Option<&'a str>,
    ) -> BoxFuture<'a, PhotoPage> {
        Box::pin(async move {
            let result = self.try_get_photos(album_id, page_token).await;
            ok_or_log(result.map_err(|e| e.with_provider(PROVIDER)), "get_photos")
                .unwrap_or_else(PhotoPage::empty)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoToken;

    impl AccessTokenSource for NoToken {
        fn access_token(&self) -> Option<String> {
            None
        }
    }

    #[tokio::test]
    async fn calendar_without_token_collapses_to_none() {
        let source = GoogleCalendar::new(Arc::new(NoToken));
        assert!(source.get_calendars().await.is_none());
        assert!(source.get_events("primary", Utc::now(), Utc::now()).await.is_none());
    }

    #[tokio::test]
    async fn photos_without_token_collapse_to_empty_page() {
        let source = GooglePhotos::new(Arc::new(NoToken));
        assert!(source.get_albums().await.is_none());

        let page = source.get_photos("al-1", Some("tok")).await;
        assert_eq!(page, PhotoPage::empty());
    }

    #[test]
    fn scopes_cover_calendar_and_photos() {
        let source = GoogleCalendar::new(Arc::new(NoToken));
        assert_eq!(source.kind(), CalendarKind::Google);
        assert_eq!(source.permissions().len(), 2);
    }
}
