//! User preferences backed by the cache.

use std::sync::Arc;

use eventdigest_core::{CalendarKind, SummaryTemplate};
use tracing::debug;

use crate::cache::{CacheKey, KeyValueCache, KeyValueCacheExt};
use crate::error::CacheError;

/// Preferences with registered defaults: both providers off and the empty
/// summary template.
#[derive(Clone)]
pub struct Preferences {
    cache: Arc<dyn KeyValueCache>,
}

impl std::fmt::Debug for Preferences {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preferences")
            .field("use_facebook_calendar", &self.use_facebook_calendar())
            .field("use_google_calendar", &self.use_google_calendar())
            .finish()
    }
}

impl Preferences {
    pub fn new(cache: Arc<dyn KeyValueCache>) -> Self {
        Self { cache }
    }

    pub fn use_facebook_calendar(&self) -> bool {
        self.cache
            .load(CacheKey::UseFacebookCalendar, false)
            .unwrap_or(false)
    }

    pub fn set_use_facebook_calendar(&self, enabled: bool) -> Result<(), CacheError> {
        debug!(enabled, "facebook calendar preference");
        self.cache.save(CacheKey::UseFacebookCalendar, &enabled, false)
    }

    pub fn use_google_calendar(&self) -> bool {
        self.cache
            .load(CacheKey::UseGoogleCalendar, false)
            .unwrap_or(false)
    }

    pub fn set_use_google_calendar(&self, enabled: bool) -> Result<(), CacheError> {
        debug!(enabled, "google calendar preference");
        self.cache.save(CacheKey::UseGoogleCalendar, &enabled, false)
    }

    /// Whether calendars of `kind` are enabled.
    pub fn uses(&self, kind: CalendarKind) -> bool {
        match kind {
            CalendarKind::Facebook => self.use_facebook_calendar(),
            CalendarKind::Google => self.use_google_calendar(),
        }
    }

    /// Enables or disables calendars of `kind`.
    pub fn set_uses(&self, kind: CalendarKind, enabled: bool) -> Result<(), CacheError> {
        match kind {
            CalendarKind::Facebook => self.set_use_facebook_calendar(enabled),
            CalendarKind::Google => self.set_use_google_calendar(enabled),
        }
    }

    /// The template used to render summaries.
    pub fn summary_post_template(&self) -> SummaryTemplate {
        self.cache
            .load(CacheKey::SummaryPostTemplate, true)
            .unwrap_or_else(SummaryTemplate::empty)
    }

    pub fn set_summary_post_template(&self, template: &SummaryTemplate) -> Result<(), CacheError> {
        debug!(template = %template.name, "summary template preference");
        self.cache.save(CacheKey::SummaryPostTemplate, template, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;

    fn preferences() -> Preferences {
        Preferences::new(Arc::new(MemoryCache::new()))
    }

    #[test]
    fn defaults_until_set() {
        let prefs = preferences();
        assert!(!prefs.use_facebook_calendar());
        assert!(!prefs.use_google_calendar());
        assert_eq!(prefs.summary_post_template(), SummaryTemplate::empty());
    }

    #[test]
    fn stores_flags() {
        let prefs = preferences();
        prefs.set_use_google_calendar(true).unwrap();
        assert!(prefs.use_google_calendar());
        assert!(prefs.uses(CalendarKind::Google));
        assert!(!prefs.uses(CalendarKind::Facebook));

        prefs.set_uses(CalendarKind::Facebook, true).unwrap();
        assert!(prefs.use_facebook_calendar());
    }

    #[test]
    fn stores_template() {
        let prefs = preferences();
        let template = SummaryTemplate::new("Weekly", "This week:", "See you!");
        prefs.set_summary_post_template(&template).unwrap();
        assert_eq!(prefs.summary_post_template(), template);
    }

    #[test]
    fn shared_cache_is_shared_state() {
        let cache: Arc<dyn KeyValueCache> = Arc::new(MemoryCache::new());
        let a = Preferences::new(cache.clone());
        let b = Preferences::new(cache);
        a.set_use_facebook_calendar(true).unwrap();
        assert!(b.use_facebook_calendar());
    }
}
