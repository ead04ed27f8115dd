//! Profile resolution with CLI flag overrides.
//!
//! The single boundary where `iiec_config` types turn into the
//! `ClientConfig` + `TokenStore` pair that core consumes.

use std::time::Duration;

use iiec_config::{Config, Profile};
use iiec_core::{AdminClient, ClientConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// A ready client plus the profile it was built from.
pub struct Connection {
    pub client: AdminClient,
    pub profile_name: String,
    pub profile: Profile,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Translate the active profile + global flags into a `ClientConfig`.
///
/// Precedence for each setting: flag (or its `IIEC_*` env var), then
/// the profile, then `[defaults]`.
pub fn resolve_client_config(
    config: &Config,
    profile: &Profile,
    global: &GlobalOpts,
) -> Result<ClientConfig, CliError> {
    let mut client_config = config.client_config(profile)?;

    if let Some(ref url) = global.api_url {
        client_config.api_url = url.parse().map_err(|_| CliError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {url}"),
        })?;
    }
    if let Some(secs) = global.timeout {
        client_config.timeout = Duration::from_secs(secs);
    }

    Ok(client_config)
}

/// Load config, pick the profile, and build an `AdminClient` with the
/// profile's token store.
pub fn connect(global: &GlobalOpts) -> Result<Connection, CliError> {
    let config = iiec_config::load_config_or_default();
    let profile_name = active_profile_name(global, &config);
    let profile = config.profile(&profile_name)?;

    let client_config = resolve_client_config(&config, &profile, global)?;
    let tokens = iiec_config::open_token_store(config.token_store_kind(&profile), &profile_name);

    tracing::debug!(
        profile = %profile_name,
        api_url = %client_config.api_url,
        policy = %client_config.write_policy,
        "resolved client config"
    );

    let client = AdminClient::new(client_config, tokens)?;
    Ok(Connection {
        client,
        profile_name,
        profile,
    })
}
