#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Login gate for the water map client.
//!
//! [`AuthGate::login`] posts credentials to `/api/login` and persists the
//! returned token under a fixed key of a [`KeyValueStore`];
//! [`AuthGate::load`] restores it on the next start. Authentication state
//! lives in an explicit [`Session`] value owned by the caller.

pub mod store;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use water_map_config::AuthConfig;

pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};

/// Path of the login endpoint.
pub const LOGIN_PATH: &str = "/api/login";

/// Message used when the service rejects the login without a usable
/// error message.
pub const DEFAULT_REJECTION_MESSAGE: &str = "Login failed. Check your credentials.";

/// Errors from the login gate.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The login service could not be reached.
    #[error("Failed to connect to the login service: {0}")]
    Connection(#[from] reqwest::Error),

    /// The login service answered with a body we cannot use.
    #[error("Invalid login response: {message}")]
    InvalidResponse {
        /// What was wrong with the response.
        message: String,
    },

    /// The service refused the credentials.
    #[error("{message}")]
    Rejected {
        /// First error message returned by the service.
        message: String,
    },

    /// The token could not be persisted or removed.
    #[error("Token storage error: {0}")]
    Store(#[from] StoreError),
}

/// Authentication state passed explicitly to whatever needs it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    /// An authenticated session holding `token`.
    #[must_use]
    pub fn authenticated(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// An unauthenticated session.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { token: None }
    }

    /// Whether a token is present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The session token, if authenticated.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: Option<String>,
    #[serde(default)]
    errors: Option<serde_json::Value>,
}

/// Login client plus token persistence.
pub struct AuthGate<S: KeyValueStore> {
    client: reqwest::Client,
    login_url: String,
    token_key: String,
    store: S,
}

impl<S: KeyValueStore> AuthGate<S> {
    /// Creates a gate from configuration and a token store.
    #[must_use]
    pub fn new(config: &AuthConfig, store: S) -> Self {
        Self {
            client: reqwest::Client::new(),
            login_url: format!("{}{LOGIN_PATH}", config.base_url.trim_end_matches('/')),
            token_key: config.token_key.clone(),
            store,
        }
    }

    /// The underlying token store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Restores the session persisted by a previous login.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Store`] if the store cannot be read.
    pub fn load(&self) -> Result<Session, AuthError> {
        match self.store.get(&self.token_key)? {
            Some(token) if !token.is_empty() => {
                log::debug!("Restored session from stored token");
                Ok(Session::authenticated(token))
            }
            _ => Ok(Session::anonymous()),
        }
    }

    /// Logs in and persists the returned token.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Connection`] if the service is unreachable.
    /// - [`AuthError::InvalidResponse`] if the body is not JSON, or a
    ///   success response carries no token.
    /// - [`AuthError::Rejected`] if the service refuses the credentials.
    /// - [`AuthError::Store`] if the token cannot be persisted.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let resp = self
            .client
            .post(&self.login_url)
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        let status = resp.status();
        log::info!("Login responded with status {status}");

        let body = resp.text().await?;
        let parsed: LoginResponse =
            serde_json::from_str(&body).map_err(|e| AuthError::InvalidResponse {
                message: format!("HTTP {status}: {e}"),
            })?;

        if !status.is_success() {
            let message = parsed
                .errors
                .as_ref()
                .and_then(first_error_message)
                .unwrap_or_else(|| DEFAULT_REJECTION_MESSAGE.to_string());
            log::warn!("Login rejected: {message}");
            return Err(AuthError::Rejected { message });
        }

        let token = parsed
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::InvalidResponse {
                message: "success response without a token".to_string(),
            })?;

        self.store.set(&self.token_key, &token)?;
        log::info!("Logged in as {email}");

        Ok(Session::authenticated(token))
    }

    /// Clears `session` and removes the persisted token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Store`] if the token cannot be removed. The
    /// in-memory session is cleared regardless.
    pub fn logout(&self, session: &mut Session) -> Result<(), AuthError> {
        *session = Session::anonymous();
        self.store.remove(&self.token_key)?;
        log::info!("Logged out");
        Ok(())
    }
}

/// Picks the message to show for a rejected login: `errors.email[0]`
/// first, then the first message of any other field.
fn first_error_message(errors: &serde_json::Value) -> Option<String> {
    let first_of = |field: &serde_json::Value| match field {
        serde_json::Value::Array(items) => items.first().and_then(|m| m.as_str()).map(String::from),
        serde_json::Value::String(s) => Some(s.clone()),
        _ => None,
    };

    if let Some(message) = errors.get("email").and_then(first_of) {
        return Some(message);
    }

    errors.as_object()?.values().find_map(first_of)
}
