//! Shared configuration for IIEC admin tools.
//!
//! TOML profiles, token store selection (file or system keyring), and
//! translation to `iiec_core::ClientConfig`. Core never reads disk; the
//! CLI loads a profile here and hands the result in.

mod token_store;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use iiec_core::{ClientConfig, DEFAULT_API_URL, TokenStore, WriteFailurePolicy};

pub use token_store::{FileTokenStore, KEYRING_SERVICE, KeyringTokenStore};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    ProfileNotFound { name: String, available: Vec<String> },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some(DEFAULT_PROFILE.into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

pub const DEFAULT_PROFILE: &str = "default";

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub token_store: TokenStoreKind,

    #[serde(default)]
    pub write_policy: WriteFailurePolicy,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
            token_store: TokenStoreKind::default(),
            write_policy: WriteFailurePolicy::default(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}

/// Where a profile keeps its admin token.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Deserialize,
    Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TokenStoreKind {
    /// A file under the platform data directory.
    #[default]
    File,
    /// The system keyring.
    Keyring,
}

/// A named backend profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Backend base URL (e.g., "http://localhost:8080").
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Admin email remembered for `auth login`.
    pub email: Option<String>,

    /// Override token store.
    pub token_store: Option<TokenStoreKind>,

    /// Override write failure policy.
    pub write_policy: Option<WriteFailurePolicy>,

    /// Accept self-signed TLS certificates.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            email: None,
            token_store: None,
            write_policy: None,
            insecure: None,
            timeout: None,
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}

impl Config {
    /// Resolve the active profile name: explicit name, then
    /// `default_profile`, then `"default"`.
    pub fn active_profile_name(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| DEFAULT_PROFILE.into())
    }

    /// Look up a profile. An unconfigured `"default"` profile resolves to
    /// the built-in local backend so a fresh install works out of the box.
    pub fn profile(&self, name: &str) -> Result<Profile, ConfigError> {
        if let Some(profile) = self.profiles.get(name) {
            return Ok(profile.clone());
        }
        if name == DEFAULT_PROFILE {
            return Ok(Profile::default());
        }
        Err(ConfigError::ProfileNotFound {
            name: name.into(),
            available: self.profiles.keys().cloned().collect(),
        })
    }

    /// Effective token store of a profile.
    pub fn token_store_kind(&self, profile: &Profile) -> TokenStoreKind {
        profile.token_store.unwrap_or(self.defaults.token_store)
    }

    /// Build a `ClientConfig` for a profile, filling gaps from `[defaults]`.
    pub fn client_config(&self, profile: &Profile) -> Result<ClientConfig, ConfigError> {
        let mut config = ClientConfig::parse(&profile.api_url).map_err(|_| {
            ConfigError::Validation {
                field: "api_url".into(),
                reason: format!("invalid URL: {}", profile.api_url),
            }
        })?;
        config.timeout = Duration::from_secs(profile.timeout.unwrap_or(self.defaults.timeout));
        config.write_policy = profile.write_policy.unwrap_or(self.defaults.write_policy);
        config.accept_invalid_certs = profile.insecure.unwrap_or(false);
        Ok(config)
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "iiec", "iiec")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory holding file-backed tokens.
pub fn data_dir() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".local/share"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

fn dirs_fallback(base: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(base);
    p.push("iiec");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. Precedence: built-in defaults, then the
/// TOML file, then `IIEC_*` variables (`__` separates nested keys, e.g.
/// `IIEC_DEFAULTS__TIMEOUT=10`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("IIEC_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Token store selection ───────────────────────────────────────────

/// Open the token store a profile is configured for.
pub fn open_token_store(kind: TokenStoreKind, profile_name: &str) -> Arc<dyn TokenStore> {
    match kind {
        TokenStoreKind::File => Arc::new(FileTokenStore::for_profile(&data_dir(), profile_name)),
        TokenStoreKind::Keyring => Arc::new(KeyringTokenStore::new(profile_name)),
    }
}
