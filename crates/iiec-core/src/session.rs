// ── Session guard ──
//
// Owns the bearer token lifecycle: login, verification on load, logout,
// and the fail-fast path every authenticated request goes through. The
// token itself lives behind an injected `TokenStore`; the observable
// session state is broadcast on a `watch` channel.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use secrecy::SecretString;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use iiec_api::ApiClient;

use crate::error::{CoreError, SESSION_EXPIRED_MESSAGE};
use crate::model::User;

/// Name the admin token is stored under.
pub const TOKEN_KEY: &str = "admin_token";

// ── TokenStore ───────────────────────────────────────────────────

/// Persistent home for the bearer token.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Result<Option<SecretString>, CoreError>;
    fn set(&self, token: &SecretString) -> Result<(), CoreError>;
    fn remove(&self) -> Result<(), CoreError>;
}

/// Process-local token store (tests, one-shot commands).
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<SecretString>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(SecretString::from(token.into()))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Result<Option<SecretString>, CoreError> {
        Ok(self
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn set(&self, token: &SecretString) -> Result<(), CoreError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
        Ok(())
    }

    fn remove(&self) -> Result<(), CoreError> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        Ok(())
    }
}

// ── SessionState ─────────────────────────────────────────────────

/// Session state observable by consumers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No session.
    #[default]
    Unauthenticated,
    /// No session, with the reason the last login failed or the last
    /// session ended.
    Rejected {
        error: String,
    },
    /// A stored token is being checked.
    Verifying,
    /// Credentials are in flight.
    LoggingIn,
    Authenticated {
        user: User,
    },
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated { user } => Some(user),
            _ => None,
        }
    }

    /// Message to show on the login screen.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Rejected { error } => Some(error),
            _ => None,
        }
    }
}

// ── SessionGuard ─────────────────────────────────────────────────

/// Bearer-token session for one backend.
///
/// Cheaply cloneable; clones share the token store and state channel.
#[derive(Clone)]
pub struct SessionGuard {
    api: ApiClient,
    store: Arc<dyn TokenStore>,
    state: Arc<watch::Sender<SessionState>>,
}

impl SessionGuard {
    pub fn new(api: ApiClient, store: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(SessionState::Unauthenticated);
        Self {
            api,
            store,
            state: Arc::new(state),
        }
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Subscribe to session state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    fn set_state(&self, next: SessionState) {
        self.state.send_replace(next);
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Exchange credentials for a token, persist it, and mark the session
    /// authenticated.
    ///
    /// On rejection the backend's `detail` message (or "Login failed")
    /// is recorded in the state and returned.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<User, CoreError> {
        self.set_state(SessionState::LoggingIn);

        let response = match self.api.login(email, password).await {
            Ok(r) => r,
            Err(e) => {
                let err = CoreError::from(e);
                let message = match &err {
                    CoreError::AuthenticationFailed { message } => message.clone(),
                    other => other.to_string(),
                };
                self.set_state(SessionState::Rejected { error: message });
                return Err(err);
            }
        };

        let token = SecretString::from(response.access_token);
        if let Err(e) = self.store.set(&token) {
            self.set_state(SessionState::Rejected {
                error: e.to_string(),
            });
            return Err(e);
        }

        let user = match response.user {
            Some(user) => User::from(user),
            None => {
                debug!("login response carried no user, verifying token");
                match self.api.verify(&token).await {
                    Ok(user) => User::from(user),
                    Err(e) => {
                        self.clear_token();
                        let err = CoreError::from(e);
                        self.set_state(SessionState::Rejected {
                            error: err.to_string(),
                        });
                        return Err(err);
                    }
                }
            }
        };

        info!(email = %user.email, "logged in");
        self.set_state(SessionState::Authenticated { user: user.clone() });
        Ok(user)
    }

    /// Check a token with the backend and return the user it belongs to.
    pub async fn verify(&self, token: &SecretString) -> Result<User, CoreError> {
        Ok(self.api.verify(token).await.map(User::from)?)
    }

    /// Restore a stored session.
    ///
    /// No stored token leaves the session unauthenticated. A token the
    /// backend won't verify is removed and the session is marked expired.
    pub async fn restore(&self) -> Result<User, CoreError> {
        let Some(token) = self.store.get()? else {
            self.set_state(SessionState::Unauthenticated);
            return Err(CoreError::NotAuthenticated);
        };

        self.set_state(SessionState::Verifying);
        match self.verify(&token).await {
            Ok(user) => {
                info!(email = %user.email, "session restored");
                self.set_state(SessionState::Authenticated { user: user.clone() });
                Ok(user)
            }
            Err(e) => {
                warn!(error = %e, "stored token failed verification");
                self.expire();
                Err(CoreError::SessionExpired)
            }
        }
    }

    /// Drop the token and the user.
    pub fn logout(&self) {
        self.clear_token();
        self.set_state(SessionState::Unauthenticated);
        info!("logged out");
    }

    /// The stored token. A missing token forces a logout.
    pub fn token(&self) -> Result<SecretString, CoreError> {
        if let Some(token) = self.store.get()? {
            return Ok(token);
        }
        self.logout();
        Err(CoreError::NotAuthenticated)
    }

    /// Run an authenticated request.
    ///
    /// A 401 from the backend ends the session on the spot: the token is
    /// cleared, the state becomes `Rejected`, and the caller gets
    /// [`CoreError::SessionExpired`]. There is no retry.
    pub async fn authorized<T, F, Fut>(&self, request: F) -> Result<T, CoreError>
    where
        F: FnOnce(SecretString) -> Fut,
        Fut: Future<Output = Result<T, iiec_api::Error>>,
    {
        let token = self.token()?;
        match request(token).await {
            Ok(value) => Ok(value),
            Err(e) if e.is_auth_expired() => {
                warn!("backend rejected the session token");
                self.expire();
                Err(CoreError::SessionExpired)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn expire(&self) {
        self.clear_token();
        self.set_state(SessionState::Rejected {
            error: SESSION_EXPIRED_MESSAGE.into(),
        });
    }

    fn clear_token(&self) {
        if let Err(e) = self.store.remove() {
            warn!(error = %e, "failed to remove stored token");
        }
    }
}

impl std::fmt::Debug for SessionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGuard")
            .field("api", &self.api.base_url().as_str())
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}
