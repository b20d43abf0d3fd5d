//! Log in with a bearer token handed over through the environment.

use std::sync::{PoisonError, RwLock};

use tracing::{debug, info, warn};

use crate::provider::{AccessTokenSource, BoxFuture, LoginService};

/// A [`LoginService`] whose session is a token read from an environment
/// variable. Permissions are not negotiated: the token is trusted to carry
/// them.
#[derive(Debug)]
pub struct TokenLogin {
    env_var: String,
    token: RwLock<Option<String>>,
}

impl TokenLogin {
    /// Creates a login reading the token from `env_var`.
    pub fn from_env(env_var: impl Into<String>) -> Self {
        Self {
            env_var: env_var.into(),
            token: RwLock::new(None),
        }
    }

    /// Builder method to use `token` when the variable is unset.
    pub fn with_token(self, token: impl Into<String>) -> Self {
        self.store(Some(token.into()));
        self
    }

    /// Name of the environment variable holding the token.
    pub fn env_var(&self) -> &str {
        &self.env_var
    }

    fn read_env(&self) -> Option<String> {
        std::env::var(&self.env_var)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn current(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn store(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    fn sign_in(&self) -> bool {
        if let Some(token) = self.read_env() {
            self.store(Some(token));
        }
        self.current().is_some()
    }
}

impl LoginService for TokenLogin {
    fn is_logged_in(&self) -> bool {
        self.current().is_some()
    }

    fn log_in<'a>(&'a self, permissions: &'a [&'a str]) -> BoxFuture<'a, bool> {
        Box::pin(async move {
            let logged_in = self.sign_in();
            if logged_in {
                info!(env_var = %self.env_var, ?permissions, "logged in");
            } else {
                warn!(env_var = %self.env_var, "no access token available");
            }
            logged_in
        })
    }

    fn restore_previous_sign_in(&self) -> BoxFuture<'_, bool> {
        Box::pin(async move {
            let restored = self.sign_in();
            debug!(env_var = %self.env_var, restored, "restore previous sign in");
            restored
        })
    }

    fn log_out(&self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            self.store(None);
            debug!(env_var = %self.env_var, "logged out");
        })
    }
}

impl AccessTokenSource for TokenLogin {
    fn access_token(&self) -> Option<String> {
        self.current()
    }
}
