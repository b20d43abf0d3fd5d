//! Calendar source selection by provider kind.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use eventdigest_core::{Calendar, CalendarEvent, CalendarKind};

use crate::facebook::FacebookCalendar;
use crate::google::GoogleCalendar;
use crate::provider::{AccessTokenSource, BoxFuture, CalendarSource};

/// The calendar source of each supported provider.
#[derive(Debug)]
pub enum CalendarService {
    Facebook(FacebookCalendar),
    Google(GoogleCalendar),
}

impl CalendarService {
    /// The source for calendars of `kind`, authenticated through `tokens`.
    pub fn for_kind(kind: CalendarKind, tokens: Arc<dyn AccessTokenSource>) -> Self {
        match kind {
            CalendarKind::Facebook => Self::Facebook(FacebookCalendar::new(tokens)),
            CalendarKind::Google => Self::Google(GoogleCalendar::new(tokens)),
        }
    }

    /// Builder method to set the HTTP timeout of the underlying client.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match self {
            Self::Facebook(source) => Self::Facebook(source.with_timeout(timeout)),
            Self::Google(source) => Self::Google(source.with_timeout(timeout)),
        }
    }

    fn source(&self) -> &dyn CalendarSource {
        match self {
            Self::Facebook(source) => source,
            Self::Google(source) => source,
        }
    }
}

impl CalendarSource for CalendarService {
    fn kind(&self) -> CalendarKind {
        self.source().kind()
    }

    fn permissions(&self) -> &'static [&'static str] {
        self.source().permissions()
    }

    fn get_calendars(&self) -> BoxFuture<'_, Option<Vec<Calendar>>> {
        self.source().get_calendars()
    }

    fn get_events<'a>(
        &'a self,
        calendar_id: &'a str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> BoxFuture<'a, Option<Vec<CalendarEvent>>> {
        self.source().get_events(calendar_id, since, until)
    }
}
