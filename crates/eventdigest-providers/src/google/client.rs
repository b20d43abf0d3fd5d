//! Google Calendar and Google Photos API clients.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use super::mapper::{ApiAlbum, ApiCalendar, ApiEvent, ApiMediaItem};
use crate::error::{ProviderError, ProviderResult};
use crate::http::{build_client, send_json};

/// Base URL of the Google Calendar API v3.
pub const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Base URL of the Google Photos Library API.
pub const PHOTOS_API_BASE: &str = "https://photoslibrary.googleapis.com/v1";

/// Media items requested per page.
pub const PHOTOS_PAGE_SIZE: usize = 25;

const ALBUMS_PAGE_SIZE: usize = 50;

/// Google Calendar API client.
#[derive(Debug)]
pub struct GoogleCalendarClient {
    http_client: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl GoogleCalendarClient {
    /// Creates a client authenticated with `access_token`.
    pub fn new(access_token: impl Into<String>, timeout: Duration) -> ProviderResult<Self> {
        Ok(Self {
            http_client: build_client(timeout)?,
            access_token: access_token.into(),
            base_url: CALENDAR_API_BASE.to_string(),
        })
    }

    /// Points the client at another API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Lists the calendars of the user, following every page.
    pub async fn list_calendars(&self) -> ProviderResult<Vec<ApiCalendar>> {
        let url = format!("{}/users/me/calendarList", self.base_url);
        let mut calendars = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.http_client.get(&url).bearer_auth(&self.access_token);
            if let Some(ref token) = page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let page: ListPage<ApiCalendar> = send_json(request).await?;
            calendars.extend(page.items);

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(count = calendars.len(), "fetched google calendars");
        Ok(calendars)
    }

    /// Lists the events of a calendar between `time_min` and `time_max`,
    /// recurring events expanded, following every page.
    pub async fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> ProviderResult<Vec<ApiEvent>> {
        let url = format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(calendar_id)
        );
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .http_client
                .get(&url)
                .bearer_auth(&self.access_token)
                .query(&[
                    ("timeMin", time_min.to_rfc3339()),
                    ("timeMax", time_max.to_rfc3339()),
                    ("singleEvents", "true".to_string()),
                    ("orderBy", "startTime".to_string()),
                ]);
            if let Some(ref token) = page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let page: ListPage<ApiEvent> = send_json(request).await?;
            events.extend(page.items);

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(calendar_id, count = events.len(), "fetched google events");
        Ok(events)
    }
}

/// Google Photos Library API client.
#[derive(Debug)]
pub struct GooglePhotosClient {
    http_client: reqwest::Client,
    access_token: String,
    base_url: String,
    page_size: usize,
}

impl GooglePhotosClient {
    /// Creates a client authenticated with `access_token`.
    pub fn new(access_token: impl Into<String>, timeout: Duration) -> ProviderResult<Self> {
        Ok(Self {
            http_client: build_client(timeout)?,
            access_token: access_token.into(),
            base_url: PHOTOS_API_BASE.to_string(),
            page_size: PHOTOS_PAGE_SIZE,
        })
    }

    /// Points the client at another API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets how many media items a page holds.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Lists every album of the library.
    pub async fn list_albums(&self) -> ProviderResult<Vec<ApiAlbum>> {
        let url = format!("{}/albums", self.base_url);
        let mut albums = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .http_client
                .get(&url)
                .bearer_auth(&self.access_token)
                .query(&[("pageSize", ALBUMS_PAGE_SIZE.to_string())]);
            if let Some(ref token) = page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let page: AlbumPage = send_json(request).await?;
            albums.extend(page.albums);

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(count = albums.len(), "fetched google photos albums");
        Ok(albums)
    }

    /// Fetches one page of the media items of an album.
    ///
    /// Returns the items and the token of the following page.
    pub async fn search_media_items(
        &self,
        album_id: &str,
        page_token: Option<&str>,
    ) -> ProviderResult<(Vec<ApiMediaItem>, Option<String>)> {
        let url = format!("{}/mediaItems:search", self.base_url);
        let body = SearchRequest {
            album_id,
            page_size: self.page_size,
            page_token,
        };

        let request = self
            .http_client
            .post(&url)
            .bearer_auth(&self.access_token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_json()?);

        let page: MediaItemPage = send_json(request).await?;
        debug!(
            album_id,
            count = page.media_items.len(),
            has_next = page.next_page_token.is_some(),
            "fetched google photos page"
        );
        Ok((page.media_items, page.next_page_token))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListPage<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlbumPage {
    #[serde(default)]
    albums: Vec<ApiAlbum>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MediaItemPage {
    #[serde(default)]
    media_items: Vec<ApiMediaItem>,
    next_page_token: Option<String>,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    album_id: &'a str,
    page_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_token: Option<&'a str>,
}

impl SearchRequest<'_> {
    fn to_json(&self) -> ProviderResult<String> {
        serde_json::to_string(self).map_err(|e| {
            ProviderError::parse_failure("failed to encode media item search").with_source(e)
        })
    }
}
