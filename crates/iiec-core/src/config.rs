// ── Runtime client configuration ──
//
// These types describe *where* the backend lives and how writes behave
// when it misbehaves. They never touch disk: the CLI (via iiec-config)
// builds a `ClientConfig` and hands it in.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::CoreError;

/// Backend used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// What a non-auth write failure does to local state.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WriteFailurePolicy {
    /// Merge a locally-built record flagged `LocalOnly` and report the
    /// backend error alongside it.
    #[default]
    #[serde(rename = "fallback")]
    #[strum(to_string = "fallback")]
    LocalFallback,
    /// Return the error and leave local state untouched.
    Surface,
}

/// Configuration for talking to one IIEC backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend root, e.g. `http://localhost:8080`.
    pub api_url: Url,
    /// Request timeout.
    pub timeout: Duration,
    /// Behavior of create/update/delete when the backend rejects them.
    pub write_policy: WriteFailurePolicy,
    /// Skip TLS verification (self-signed staging hosts).
    pub accept_invalid_certs: bool,
}

impl ClientConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            timeout: Duration::from_secs(30),
            write_policy: WriteFailurePolicy::default(),
            accept_invalid_certs: false,
        }
    }

    /// Parse `url` and build a config with default settings.
    pub fn parse(url: &str) -> Result<Self, CoreError> {
        let api_url = Url::parse(url).map_err(|e| CoreError::Config {
            message: format!("invalid backend URL '{url}': {e}"),
        })?;
        Ok(Self::new(api_url))
    }

    /// Config pointing at [`DEFAULT_API_URL`].
    pub fn local() -> Result<Self, CoreError> {
        Self::parse(DEFAULT_API_URL)
    }

    pub fn with_write_policy(mut self, policy: WriteFailurePolicy) -> Self {
        self.write_policy = policy;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
