//! Facebook pages as calendars.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use eventdigest_core::{Calendar, CalendarEvent, CalendarKind};
use tracing::{debug, error};
use url::Url;

use super::client::{FacebookClient, PagePost};
use super::mapper::FacebookMapper;
use crate::error::{ProviderError, ProviderResult};
use crate::http::DEFAULT_TIMEOUT;
use crate::mapper::{CalendarMapper, EventMapper};
use crate::provider::{AccessTokenSource, BoxFuture, CalendarSource, ok_or_log};

/// Permissions requested when logging in to Facebook.
pub const FACEBOOK_PERMISSIONS: &[&str] =
    &["public_profile", "pages_read_engagement", "pages_manage_posts"];

const PROVIDER: &str = "facebook";

/// Calendar source backed by the pages a user manages.
pub struct FacebookCalendar {
    tokens: Arc<dyn AccessTokenSource>,
    mapper: FacebookMapper,
    timeout: Duration,
    base_url: Option<String>,
}

impl std::fmt::Debug for FacebookCalendar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FacebookCalendar")
            .field("timeout", &self.timeout)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl FacebookCalendar {
    /// Creates a source reading the user token from `tokens`.
    pub fn new(tokens: Arc<dyn AccessTokenSource>) -> Self {
        Self {
            tokens,
            mapper: FacebookMapper::new(),
            timeout: DEFAULT_TIMEOUT,
            base_url: None,
        }
    }

    /// Builder method to set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builder method to point at another Graph API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    fn client(&self) -> ProviderResult<FacebookClient> {
        let token = self
            .tokens
            .access_token()
            .ok_or_else(|| ProviderError::missing_credential("not logged in to Facebook"))?;

        let client = FacebookClient::new(token, self.timeout)?;
        Ok(match self.base_url {
            Some(ref base_url) => client.with_base_url(base_url.clone()),
            None => client,
        })
    }

    async fn try_get_calendars(&self) -> ProviderResult<Vec<Calendar>> {
        let pages = self.client()?.list_pages().await?;
        Ok(self.mapper.map_calendars(&pages))
    }

    async fn try_get_events(
        &self,
        page_id: &str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> ProviderResult<Vec<CalendarEvent>> {
        let raws = self.client()?.list_events(page_id, since, until).await?;
        let events = self.mapper.map_events(&raws);
        debug!(page_id, received = raws.len(), mapped = events.len(), "mapped facebook events");
        Ok(events)
    }

    /// Publishes `message` on the page, as a photo post when `photo_url` is
    /// set and scheduled when `scheduled_at` is set.
    ///
    /// Returns false (and logs) on failure.
    pub async fn publish_summary(
        &self,
        page_id: &str,
        message: &str,
        photo_url: Option<Url>,
        scheduled_at: Option<DateTime<Utc>>,
    ) -> bool {
        let post = PagePost::new(message)
            .with_photo_url(photo_url)
            .with_scheduled_at(scheduled_at);

        match self.try_publish(page_id, &post).await {
            Ok(_) => true,
            Err(err) => {
                let err = err.with_provider(PROVIDER);
                error!(page_id, error = %err, "failed to publish summary");
                false
            }
        }
    }

    async fn try_publish(&self, page_id: &str, post: &PagePost) -> ProviderResult<String> {
        let client = self.client()?;
        let page_token = client.page_access_token(page_id).await?;
        client.publish(page_id, &page_token, post).await
    }
}

impl CalendarSource for FacebookCalendar {
    fn kind(&self) -> CalendarKind {
        CalendarKind::Facebook
    }

    fn permissions(&self) -> &'static [&'static str] {
        FACEBOOK_PERMISSIONS
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
