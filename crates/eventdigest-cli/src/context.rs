//! Per-invocation state shared by the commands.

use std::sync::Arc;

use eventdigest_app::{AppConfig, AppState, FileCache, KeyValueCache};
use eventdigest_core::CalendarKind;
use eventdigest_providers::{CalendarService, TokenLogin};
use tracing::debug;

use crate::error::{CliError, CliResult};

/// Configuration plus the application state over the cache file.
pub struct Context {
    pub config: AppConfig,
    pub app: AppState,
}

/// A restored provider sign in and the calendar source behind it.
pub struct Connection {
    pub login: Arc<TokenLogin>,
    pub source: CalendarService,
}

impl Context {
    /// Opens the cache file named by `config`.
    pub fn open(config: AppConfig) -> CliResult<Self> {
        let path = config.cache_path();
        debug!(path = %path.display(), "opening cache");
        let cache = FileCache::open(path)?;
        Ok(Self::with_cache(config, Arc::new(cache)))
    }

    pub fn with_cache(config: AppConfig, cache: Arc<dyn KeyValueCache>) -> Self {
        Self {
            config,
            app: AppState::new(cache),
        }
    }

    /// Token login for `kind`, reading the variable configured for it.
    pub fn login_for(&self, kind: CalendarKind) -> Arc<TokenLogin> {
        let providers = &self.config.providers;
        let env_var = match kind {
            CalendarKind::Facebook => &providers.facebook_token_env,
            CalendarKind::Google => &providers.google_token_env,
        };
        Arc::new(TokenLogin::from_env(env_var.clone()))
    }

    pub fn calendar_service(&self, kind: CalendarKind, login: Arc<TokenLogin>) -> CalendarService {
        CalendarService::for_kind(kind, login).with_timeout(self.config.providers.timeout())
    }

    /// Resumes the sign in of the session's provider.
    pub async fn connect(&mut self) -> CliResult<Connection> {
        let kind = self
            .app
            .session()
            .map(|session| session.active_calendar().kind())
            .ok_or(CliError::NotLoggedIn)?;

        let login = self.login_for(kind);
        if !self.app.restore(login.as_ref()).await {
            return Err(CliError::NotLoggedIn);
        }

        let source = self.calendar_service(kind, login.clone());
        Ok(Connection { login, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventdigest_app::MemoryCache;

    fn context() -> Context {
        Context::with_cache(AppConfig::default(), Arc::new(MemoryCache::new()))
    }

    #[test]
    fn login_uses_configured_variable() {
        let mut ctx = context();
        ctx.config.providers.google_token_env = "MY_GOOGLE_TOKEN".to_string();

        assert_eq!(ctx.login_for(CalendarKind::Google).env_var(), "MY_GOOGLE_TOKEN");
        assert_eq!(
            ctx.login_for(CalendarKind::Facebook).env_var(),
            "EVENTDIGEST_FACEBOOK_TOKEN"
        );
    }

    #[tokio::test]
    async fn connect_without_session() {
        let mut ctx = context();
        assert!(matches!(ctx.connect().await, Err(CliError::NotLoggedIn)));
    }

    #[test]
    fn opens_cache_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.cache.path = Some(dir.path().join("cache.json"));

        let mut ctx = Context::open(config).unwrap();
        assert!(ctx.app.session().is_none());
    }
}
