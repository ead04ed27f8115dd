// ── Core error types ──
//
// User-facing errors from iiec-core. Consumers never match on HTTP
// transport details directly; the `From<iiec_api::Error>` impl folds
// them into domain-appropriate variants.

use thiserror::Error;

/// Message recorded when a stored session is rejected by the backend.
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please login again.";

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to backend timed out")]
    Timeout,

    // ── Session errors ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Session expired. Please login again.")]
    SessionExpired,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Local state ──────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Token storage error: {message}")]
    TokenStore { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Errors that end (or never had) a session. These never take the
    /// local-fallback path.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationFailed { .. } | Self::NotAuthenticated | Self::SessionExpired
        )
    }

    /// Returns `true` for a missing resource, whether detected locally or
    /// reported by the backend.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::Api {
                status: Some(404),
                ..
            }
        )
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::SessionExpired => Some(401),
            Self::Api { status, .. } => *status,
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<iiec_api::Error> for CoreError {
    fn from(err: iiec_api::Error) -> Self {
        match err {
            iiec_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            iiec_api::Error::Unauthorized => CoreError::SessionExpired,
            iiec_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            iiec_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            iiec_api::Error::ClientBuild(message) => CoreError::Config { message },
            iiec_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            iiec_api::Error::Deserialization { message, .. } => CoreError::Api {
                message: format!("Unexpected response: {message}"),
                status: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_becomes_session_expired() {
        let err = CoreError::from(iiec_api::Error::Unauthorized);
        assert!(matches!(err, CoreError::SessionExpired));
        assert!(err.is_auth());
        assert_eq!(err.to_string(), "Session expired. Please login again.");
    }

    #[test]
    fn backend_detail_is_kept() {
        let err = CoreError::from(iiec_api::Error::Api {
            status: 404,
            message: "Event not found".into(),
        });
        assert!(err.is_not_found());
        assert!(!err.is_auth());
        assert_eq!(err.status(), Some(404));
        assert!(err.to_string().contains("Event not found"));
    }

    #[test]
    fn server_error_is_not_auth() {
        let err = CoreError::from(iiec_api::Error::Api {
            status: 500,
            message: "boom".into(),
        });
        assert!(!err.is_auth());
        assert!(!err.is_not_found());
    }
}
