//! Login screen and session handling.

use water_map_auth::{AuthError, AuthGate, KeyValueStore, Session};

use crate::notify::{Notification, Notifier};

/// Logs in with `email` and `password`.
///
/// # Errors
///
/// Returns [`Notification::LoginFailed`] carrying the service's message when
/// the credentials are refused, and [`Notification::LoginConnectionFailed`]
/// for every other failure.
pub async fn login<S: KeyValueStore>(
    gate: &AuthGate<S>,
    email: &str,
    password: &str,
    notifier: &dyn Notifier,
) -> Result<Session, Notification> {
    match gate.login(email.trim(), password).await {
        Ok(session) => {
            notifier.notify(&Notification::LoginSucceeded);
            Ok(session)
        }
        Err(e) => {
            let notification = match e {
                AuthError::Rejected { message } => Notification::LoginFailed { message },
                other => {
                    log::error!("Login failed: {other}");
                    Notification::LoginConnectionFailed
                }
            };
            notifier.notify(&notification);
            Err(notification)
        }
    }
}

/// Clears `session` and the persisted token.
pub fn logout<S: KeyValueStore>(
    gate: &AuthGate<S>,
    session: &mut Session,
    notifier: &dyn Notifier,
) {
    if let Err(e) = gate.logout(session) {
        log::warn!("Failed to remove stored token: {e}");
    }
    notifier.notify(&Notification::LoggedOut);
}

/// Restores the session from the token store. An unreadable store counts
/// as logged out.
#[must_use]
pub fn restore_session<S: KeyValueStore>(gate: &AuthGate<S>) -> Session {
    gate.load().unwrap_or_else(|e| {
        log::warn!("Could not restore session: {e}");
        Session::anonymous()
    })
}

/// Fails with [`Notification::LoginRequired`] unless `session` is
/// authenticated.
///
/// # Errors
///
/// Returns [`Notification::LoginRequired`] for an anonymous session.
pub fn require_session(session: &Session, notifier: &dyn Notifier) -> Result<(), Notification> {
    if session.is_authenticated() {
        return Ok(());
    }
    notifier.notify(&Notification::LoginRequired);
    Err(Notification::LoginRequired)
}
