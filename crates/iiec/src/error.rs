//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use iiec_config::ConfigError;
use iiec_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const REJECTED: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to backend at {url}")]
    #[diagnostic(
        code(iiec::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             Reason: {reason}\n\
             Point at another backend with --api-url or `iiec config set api_url <url>`."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(iiec::timeout),
        help("Increase timeout with --timeout or check backend responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Login failed: {message}")]
    #[diagnostic(code(iiec::auth_failed), help("Check the email and password and try again."))]
    AuthFailed { message: String },

    #[error("Not logged in to profile '{profile}'")]
    #[diagnostic(code(iiec::not_logged_in), help("Run: iiec auth login --profile {profile}"))]
    NotLoggedIn { profile: String },

    #[error("Session expired for profile '{profile}'")]
    #[diagnostic(
        code(iiec::session_expired),
        help("The backend rejected the stored token. Run: iiec auth login --profile {profile}")
    )]
    SessionExpired { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(iiec::not_found),
        help("Run: iiec {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Backend rejected the request: {message}")]
    #[diagnostic(code(iiec::api_error))]
    ApiError { message: String, status: Option<u16> },

    #[error("{label} was not saved to the backend: {message}")]
    #[diagnostic(
        code(iiec::not_persisted),
        help(
            "The change was applied to the local copy only.\n\
             Retry the command, or set `write_policy = \"surface\"` to fail without a local copy."
        )
    )]
    NotPersisted { label: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(iiec::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(iiec::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: iiec config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(iiec::config), help("Inspect the resolved config with: iiec config show"))]
    Config { message: String },

    #[error("Token storage error: {message}")]
    #[diagnostic(
        code(iiec::token_store),
        help("Switch stores with: iiec config set token_store file")
    )]
    TokenStore { message: String },

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(iiec::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NotLoggedIn { .. } | Self::SessionExpired { .. } => {
                exit_code::AUTH
            }
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::ApiError { .. } | Self::NotPersisted { .. } => exit_code::REJECTED,
            Self::Validation { .. } | Self::ProfileNotFound { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Name `profile` in auth hints. Handlers convert core errors with
    /// `?`, which cannot know the profile.
    pub fn with_profile(self, profile: &str) -> Self {
        match self {
            Self::NotLoggedIn { .. } => Self::NotLoggedIn {
                profile: profile.into(),
            },
            Self::SessionExpired { .. } => Self::SessionExpired {
                profile: profile.into(),
            },
            other => other,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },

            CoreError::Timeout => Self::Timeout,

            CoreError::AuthenticationFailed { message } => Self::AuthFailed { message },

            CoreError::NotAuthenticated => Self::NotLoggedIn {
                profile: "current".into(),
            },

            CoreError::SessionExpired => Self::SessionExpired {
                profile: "current".into(),
            },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => Self::NotFound {
                list_command: list_command_for(&entity_type),
                resource_type: entity_type,
                identifier,
            },

            CoreError::ValidationFailed { message } => Self::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Api { message, status } => Self::ApiError { message, status },

            CoreError::Config { message } => Self::Config { message },

            CoreError::TokenStore { message } => Self::TokenStore { message },

            CoreError::Internal(message) => Self::Internal(message),
        }
    }
}

fn list_command_for(entity_type: &str) -> String {
    match entity_type.to_ascii_lowercase().as_str() {
        "section" => "sections list <project>".into(),
        other => format!("{other}s list"),
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::ProfileNotFound { name, available } => Self::ProfileNotFound {
                name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config {
                message: other.to_string(),
            },
        }
    }
}
