//! The signed-in session: the calendars offered by the provider and the one
//! the digest is built from.
//!
//! Only the active calendar is persisted. A restored session therefore knows
//! a single calendar until the list is refreshed with
//! [`SessionManager::replace_calendars`].

use std::sync::Arc;

use eventdigest_core::Calendar;
use tracing::{debug, info, warn};

use crate::cache::{CacheKey, KeyValueCache, KeyValueCacheExt};
use crate::error::SessionError;

/// Calendars of the session and the active one.
///
/// `calendars` is never empty and always contains `active_calendar`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    calendars: Vec<Calendar>,
    active_calendar: Calendar,
}

impl Session {
    fn new(calendars: Vec<Calendar>) -> Option<Self> {
        let active_calendar = calendars.first()?.clone();
        Some(Self {
            calendars,
            active_calendar,
        })
    }

    pub fn calendars(&self) -> &[Calendar] {
        &self.calendars
    }

    pub fn active_calendar(&self) -> &Calendar {
        &self.active_calendar
    }

    fn contains(&self, calendar: &Calendar) -> bool {
        self.calendars.contains(calendar)
    }
}

/// Owns the current [`Session`] and keeps its persisted form in sync.
pub struct SessionManager {
    cache: Arc<dyn KeyValueCache>,
    session: Option<Session>,
    loaded: bool,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("session", &self.session)
            .field("loaded", &self.loaded)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    pub fn new(cache: Arc<dyn KeyValueCache>) -> Self {
        Self {
            cache,
            session: None,
            loaded: false,
        }
    }

    /// Starts a session over `calendars` with the first one active.
    ///
    /// Returns `None`, leaving any current session untouched, when
    /// `calendars` is empty.
    pub fn create(&mut self, calendars: Vec<Calendar>) -> Option<&Session> {
        let Some(session) = Session::new(calendars) else {
            debug!("no calendars, session not created");
            return None;
        };

        info!(
            calendars = session.calendars.len(),
            active = %session.active_calendar.id(),
            "session created"
        );
        self.persist_or_log(&session.active_calendar);
        self.loaded = true;
        self.session = Some(session);
        self.session.as_ref()
    }

    /// The current session, restored from the cache on first access.
    pub fn current(&mut self) -> Option<&Session> {
        if !self.loaded {
            return self.restore();
        }
        self.session.as_ref()
    }

    /// Reloads the session from the cache, discarding the in-memory one.
    pub fn restore(&mut self) -> Option<&Session> {
        self.loaded = true;
        self.session = self
            .cache
            .load::<Calendar>(CacheKey::CurrentCalendar, true)
            .and_then(|calendar| Session::new(vec![calendar]));

        match self.session {
            Some(ref session) => debug!(active = %session.active_calendar.id(), "session restored"),
            None => debug!("no session to restore"),
        }
        self.session.as_ref()
    }

    /// Makes `calendar` the active calendar and persists it.
    pub fn set_active_calendar(&mut self, calendar: Calendar) -> Result<(), SessionError> {
        self.current();
        let session = self.session.as_mut().ok_or(SessionError::NoSession)?;

        if !session.contains(&calendar) {
            return Err(SessionError::UnknownCalendar {
                id: calendar.id().to_string(),
            });
        }

        debug!(active = %calendar.id(), "active calendar changed");
        session.active_calendar = calendar;
        self.cache
            .save(CacheKey::CurrentCalendar, &session.active_calendar, true)?;
        Ok(())
    }

    /// Replaces the calendar list after a refresh from the provider.
    ///
    /// The active calendar is kept when still listed, otherwise the first
    /// calendar becomes active. An empty list is ignored. Without a current
    /// session this behaves like [`create`](Self::create).
    pub fn replace_calendars(&mut self, calendars: Vec<Calendar>) -> Option<&Session> {
        if calendars.is_empty() {
            debug!("empty calendar list ignored");
            return self.current();
        }

        self.current();
        let Some(ref mut session) = self.session else {
            return self.create(calendars);
        };

        if calendars.contains(&session.active_calendar) {
            session.calendars = calendars;
        } else {
            let Some(first) = calendars.first().cloned() else {
                return self.session.as_ref();
            };
            info!(
                previous = %session.active_calendar.id(),
                active = %first.id(),
                "active calendar no longer listed, resetting"
            );
            session.calendars = calendars;
            session.active_calendar = first;
            let active = session.active_calendar.clone();
            self.persist_or_log(&active);
        }

        self.session.as_ref()
    }

    /// Ends the session and forgets the persisted one.
    pub fn clear(&mut self) {
        if let Err(err) = self.cache.remove(CacheKey::CurrentCalendar.as_str()) {
            warn!(error = %err, "failed to remove persisted session");
        }
        self.session = None;
        self.loaded = true;
        info!("session cleared");
    }

    fn persist_or_log(&self, calendar: &Calendar) {
        if let Err(err) = self.cache.save(CacheKey::CurrentCalendar, calendar, true) {
            warn!(error = %err, "failed to persist session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use eventdigest_core::CalendarKind;

    fn cal(id: &str) -> Calendar {
        Calendar::new(id, format!("Calendar {id}"), CalendarKind::Google)
    }

    fn manager() -> (Arc<dyn KeyValueCache>, SessionManager) {
        let cache: Arc<dyn KeyValueCache> = Arc::new(MemoryCache::new());
        (cache.clone(), SessionManager::new(cache))
    }

    fn persisted(cache: &Arc<dyn KeyValueCache>) -> Option<Calendar> {
        cache.load(CacheKey::CurrentCalendar, true)
    }

    mod create {
        use super::*;

        #[test]
        fn first_calendar_is_active_and_persisted() {
            let (cache, mut sessions) = manager();
            let session = sessions.create(vec![cal("a"), cal("b")]).unwrap();
            assert_eq!(session.active_calendar(), &cal("a"));
            assert_eq!(session.calendars().len(), 2);
            assert_eq!(persisted(&cache), Some(cal("a")));
        }

        #[test]
        fn empty_list_creates_nothing() {
            let (cache, mut sessions) = manager();
            assert!(sessions.create(Vec::new()).is_none());
            assert!(sessions.current().is_none());
            assert!(persisted(&cache).is_none());
        }

        #[test]
        fn empty_list_keeps_existing_session() {
            let (_, mut sessions) = manager();
            sessions.create(vec![cal("a")]);
            assert!(sessions.create(Vec::new()).is_none());
            assert_eq!(sessions.current().unwrap().active_calendar(), &cal("a"));
        }
    }

    mod restore {
        use super::*;

        #[test]
        fn restores_singleton_list() {
            let (cache, mut sessions) = manager();
            sessions.create(vec![cal("a"), cal("b")]);
            sessions.set_active_calendar(cal("b")).unwrap();

            let mut fresh = SessionManager::new(cache);
            let session = fresh.current().unwrap();
            assert_eq!(session.active_calendar(), &cal("b"));
            assert_eq!(session.calendars(), &[cal("b")]);
        }

        #[test]
        fn nothing_persisted() {
            let (_, mut sessions) = manager();
            assert!(sessions.current().is_none());
            assert!(sessions.restore().is_none());
        }

        #[test]
        fn restore_discards_unsaved_list() {
            let (_, mut sessions) = manager();
            sessions.create(vec![cal("a"), cal("b")]);
            assert_eq!(sessions.restore().unwrap().calendars(), &[cal("a")]);
        }
    }

    mod active {
        use super::*;

        #[test]
        fn every_change_is_persisted() {
            let (cache, mut sessions) = manager();
            sessions.create(vec![cal("a"), cal("b"), cal("c")]);

            sessions.set_active_calendar(cal("c")).unwrap();
            assert_eq!(persisted(&cache), Some(cal("c")));

            sessions.set_active_calendar(cal("b")).unwrap();
            assert_eq!(persisted(&cache), Some(cal("b")));
            assert_eq!(sessions.current().unwrap().active_calendar(), &cal("b"));
        }

        #[test]
        fn unknown_calendar_is_rejected() {
            let (cache, mut sessions) = manager();
            sessions.create(vec![cal("a")]);

            let err = sessions.set_active_calendar(cal("z")).unwrap_err();
            assert!(matches!(err, SessionError::UnknownCalendar { ref id } if id == "z"));
            assert_eq!(persisted(&cache), Some(cal("a")));
        }

        #[test]
        fn no_session() {
            let (_, mut sessions) = manager();
            assert!(matches!(
                sessions.set_active_calendar(cal("a")),
                Err(SessionError::NoSession)
            ));
        }
    }

    mod replace {
        use super::*;

        #[test]
        fn keeps_active_when_listed() {
            let (cache, mut sessions) = manager();
            sessions.create(vec![cal("a"), cal("b")]);
            sessions.set_active_calendar(cal("b")).unwrap();

            let session = sessions.replace_calendars(vec![cal("c"), cal("b")]).unwrap();
            assert_eq!(session.active_calendar(), &cal("b"));
            assert_eq!(session.calendars(), &[cal("c"), cal("b")]);
            assert_eq!(persisted(&cache), Some(cal("b")));
        }

        #[test]
        fn resets_to_first_when_active_disappears() {
            let (cache, mut sessions) = manager();
            sessions.create(vec![cal("a"), cal("b")]);

            let session = sessions.replace_calendars(vec![cal("x"), cal("y")]).unwrap();
            assert_eq!(session.active_calendar(), &cal("x"));
            assert_eq!(persisted(&cache), Some(cal("x")));
        }

        #[test]
        fn widens_restored_session() {
            let (cache, mut sessions) = manager();
            sessions.create(vec![cal("a"), cal("b")]);

            let mut fresh = SessionManager::new(cache);
            let session = fresh.replace_calendars(vec![cal("a"), cal("b")]).unwrap();
            assert_eq!(session.calendars().len(), 2);
            assert_eq!(session.active_calendar(), &cal("a"));
        }

        #[test]
        fn empty_list_is_ignored() {
            let (_, mut sessions) = manager();
            sessions.create(vec![cal("a"), cal("b")]);
            let session = sessions.replace_calendars(Vec::new()).unwrap();
            assert_eq!(session.calendars().len(), 2);
        }

        #[test]
        fn creates_without_session() {
            let (_, mut sessions) = manager();
            let session = sessions.replace_calendars(vec![cal("a")]).unwrap();
            assert_eq!(session.active_calendar(), &cal("a"));
        }
    }

    #[test]
    fn clear_forgets_persisted_session() {
        let (cache, mut sessions) = manager();
        sessions.create(vec![cal("a")]);
        sessions.clear();

        assert!(sessions.current().is_none());
        assert!(persisted(&cache).is_none());
        assert!(SessionManager::new(cache).current().is_none());
    }
}
