//! Application state shared by every screen or command.
//!
//! [`AppState`] ties the session, the preferences and routing together and
//! runs the login and digest flows against provider collaborators.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use eventdigest_core::{SummaryPost, SummaryTemplate, expand_multiday};
use eventdigest_providers::{CalendarSource, LoginService};
use tracing::{debug, info, warn};

use crate::cache::KeyValueCache;
use crate::error::{AppResult, SessionError};
use crate::preferences::Preferences;
use crate::routes::{Route, RouteNavigator};
use crate::session::{Session, SessionManager};

pub struct AppState {
    cache: Arc<dyn KeyValueCache>,
    sessions: SessionManager,
    preferences: Preferences,
    routes: RouteNavigator,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("sessions", &self.sessions)
            .field("preferences", &self.preferences)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(cache: Arc<dyn KeyValueCache>) -> Self {
        Self {
            sessions: SessionManager::new(cache.clone()),
            preferences: Preferences::new(cache.clone()),
            routes: RouteNavigator::new(),
            cache,
        }
    }

    pub fn cache(&self) -> &Arc<dyn KeyValueCache> {
        &self.cache
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn routes(&self) -> &RouteNavigator {
        &self.routes
    }

    pub fn sessions(&mut self) -> &mut SessionManager {
        &mut self.sessions
    }

    /// The current session, restored from the cache if needed.
    pub fn session(&mut self) -> Option<&Session> {
        self.sessions.current()
    }

    /// Signs in with `login` and starts a session over the calendars of
    /// `source`. The provider of `source` becomes the preferred one.
    pub async fn log_in(&mut self, login: &dyn LoginService, source: &dyn CalendarSource) -> bool {
        let kind = source.kind();
        if !login.log_in(source.permissions()).await {
            warn!(provider = %kind, "log in failed");
            return false;
        }

        let Some(calendars) = source.get_calendars().await else {
            warn!(provider = %kind, "calendars unavailable after log in");
            return false;
        };
        if self.sessions.create(calendars).is_none() {
            warn!(provider = %kind, "no calendars to start a session with");
            return false;
        }

        if let Err(err) = self.preferences.set_uses(kind, true) {
            warn!(provider = %kind, error = %err, "failed to store provider preference");
        }
        info!(provider = %kind, "logged in");
        true
    }

    /// Resumes the previous sign in and session. Sends the user to the login
    /// screen if either is gone.
    pub async fn restore(&mut self, login: &dyn LoginService) -> bool {
        let signed_in = login.restore_previous_sign_in().await;
        let restored = signed_in && self.sessions.restore().is_some();

        if !restored {
            debug!(signed_in, "nothing to restore");
            self.routes.navigate(Route::LoginScreen);
        }
        restored
    }

    /// Signs out, forgets the session and returns to the login screen.
    pub async fn log_out(&mut self, login: &dyn LoginService) {
        login.log_out().await;
        self.sessions.clear();
        self.routes.navigate(Route::LoginScreen);
        info!("logged out");
    }

    /// Reloads the calendar list of the session from `source`.
    pub async fn refresh_calendars(&mut self, source: &dyn CalendarSource) -> bool {
        let Some(calendars) = source.get_calendars().await else {
            warn!(provider = %source.kind(), "calendar refresh failed");
            return false;
        };
        self.sessions.replace_calendars(calendars).is_some()
    }

    /// Makes the session calendar with `calendar_id` the active one.
    pub fn select_calendar(&mut self, calendar_id: &str) -> AppResult<()> {
        let session = self.sessions.current().ok_or(SessionError::NoSession)?;
        let calendar = session
            .calendars()
            .iter()
            .find(|calendar| calendar.id() == calendar_id)
            .cloned()
            .ok_or_else(|| SessionError::UnknownCalendar {
                id: calendar_id.to_string(),
            })?;
        self.sessions.set_active_calendar(calendar)?;
        Ok(())
    }

    /// Builds a post from the events of the active calendar, with multi-day
    /// events split by local day. See [`build_post_in`](Self::build_post_in).
    pub async fn build_post(
        &mut self,
        source: &dyn CalendarSource,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Option<SummaryPost> {
        self.build_post_in(&Local, source, since, until).await
    }

    /// Builds a post from the events of the active calendar between `since`
    /// and `until`, splitting multi-day events by day of `tz`.
    ///
    /// Returns `None` without a session, when the active calendar belongs to
    /// another provider, or when the events cannot be fetched.
    pub async fn build_post_in<Tz: TimeZone>(
        &mut self,
        tz: &Tz,
        source: &dyn CalendarSource,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Option<SummaryPost> {
        let Some(session) = self.sessions.current() else {
            warn!("no session, cannot build a post");
            return None;
        };
        let calendar = session.active_calendar().clone();
        if calendar.kind() != source.kind() {
            warn!(
                calendar = %calendar.id(),
                calendar_provider = %calendar.kind(),
                provider = %source.kind(),
                "active calendar belongs to another provider"
            );
            return None;
        }

        let events = source.get_events(calendar.id(), since, until).await?;
        let fetched = events.len();
        let events = expand_multiday(events, tz);
        debug!(calendar = %calendar.id(), fetched, listed = events.len(), "post built");
        Some(SummaryPost::new().with_events(events))
    }

    /// The template summaries are rendered with.
    pub fn template(&self) -> SummaryTemplate {
        self.preferences.summary_post_template()
    }

    /// Renders `post` with the preferred template in the local time zone.
    pub fn render(&self, post: &SummaryPost) -> String {
        self.render_in(&Local, post)
    }

    pub fn render_in<Tz: TimeZone>(&self, tz: &Tz, post: &SummaryPost) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        post.summary_in(tz, &self.template())
    }
}
