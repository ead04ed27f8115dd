//! Config subcommand handlers.

use dialoguer::{Input, Select};

use iiec_config::{Config, Profile, TokenStoreKind};
use iiec_core::{DEFAULT_API_URL, WriteFailurePolicy};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::active_profile_name;
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn format_config(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("# failed to render config: {e}"))
}

fn load_for_update() -> Config {
    iiec_config::load_config_or_default()
}

/// Apply `key = value` to a profile.
fn set_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "api_url" | "api-url" => {
            url_check(&value)?;
            profile.api_url = value;
        }
        "email" => profile.email = Some(value),
        "token_store" | "token-store" => {
            profile.token_store =
                Some(value.parse::<TokenStoreKind>().map_err(|_| CliError::Validation {
                    field: "token_store".into(),
                    reason: "must be 'file' or 'keyring'".into(),
                })?);
        }
        "write_policy" | "write-policy" => {
            profile.write_policy =
                Some(value.parse::<WriteFailurePolicy>().map_err(|_| CliError::Validation {
                    field: "write_policy".into(),
                    reason: "must be 'fallback' or 'surface'".into(),
                })?);
        }
        "insecure" => {
            profile.insecure = Some(value.parse().map_err(|_| CliError::Validation {
                field: "insecure".into(),
                reason: "must be 'true' or 'false'".into(),
            })?);
        }
        "timeout" => {
            profile.timeout = Some(value.parse().map_err(|_| CliError::Validation {
                field: "timeout".into(),
                reason: "must be a number (seconds)".into(),
            })?);
        }
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: api_url, email, \
                     token_store, write_policy, insecure, timeout"
                ),
            });
        }
    }
    Ok(())
}

fn url_check(value: &str) -> Result<(), CliError> {
    iiec_core::ClientConfig::parse(value)?;
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = iiec_config::config_path();
            eprintln!("IIEC admin CLI configuration");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default(iiec_config::DEFAULT_PROFILE.into())
                .interact_text()
                .map_err(prompt_err)?;

            let api_url: String = Input::new()
                .with_prompt("Backend URL")
                .default(DEFAULT_API_URL.into())
                .interact_text()
                .map_err(prompt_err)?;
            url_check(&api_url)?;

            let email: String = Input::new()
                .with_prompt("Admin email (blank to ask at login)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;

            let store_choices = &[
                "File in the user data directory",
                "System keyring",
            ];
            let token_store = match Select::new()
                .with_prompt("Where to keep the session token?")
                .items(store_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?
            {
                0 => TokenStoreKind::File,
                _ => TokenStoreKind::Keyring,
            };

            let policy_choices = &[
                "Keep a local copy and report the error (fallback)",
                "Fail without touching local state (surface)",
            ];
            let write_policy = match Select::new()
                .with_prompt("When the backend rejects a write")
                .items(policy_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?
            {
                0 => WriteFailurePolicy::LocalFallback,
                _ => WriteFailurePolicy::Surface,
            };

            let mut cfg = load_for_update();
            cfg.profiles.insert(
                profile_name.clone(),
                Profile {
                    api_url,
                    email: (!email.is_empty()).then_some(email),
                    token_store: Some(token_store),
                    write_policy: Some(write_policy),
                    ..Profile::default()
                },
            );
            cfg.default_profile = Some(profile_name.clone());
            iiec_config::save_config(&cfg)?;

            eprintln!(
                "\n{}",
                output::success(
                    &format!("Configuration written to {}", config_path.display()),
                    color
                )
            );
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Next: iiec auth login");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = iiec_config::load_config_or_default();
            let out = output::render_single(&global.output, &cfg, format_config, |_| {
                "config".into()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = load_for_update();
            let profile_name = active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();
            set_key(profile, &key, value)?;

            iiec_config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!(
                    "{}",
                    output::success(&format!("Set {key} on profile '{profile_name}'"), color)
                );
            }
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = iiec_config::load_config_or_default();
            let active = active_profile_name(global, &cfg);
            let names: Vec<String> = cfg.profiles.keys().cloned().collect();
            let out = output::render_single(
                &global.output,
                &names,
                |names| {
                    if names.is_empty() {
                        return "No profiles configured. Run: iiec config init".into();
                    }
                    names
                        .iter()
                        .map(|n| {
                            let p = &cfg.profiles[n];
                            let marker = if *n == active { "*" } else { " " };
                            format!("{marker} {n:<12} {}", p.api_url)
                        })
                        .collect::<Vec<_>>()
                        .join("\n")
                },
                |names| names.join("\n"),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Use <name> ──────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = load_for_update();
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", "),
                    name,
                });
            }
            cfg.default_profile = Some(name.clone());
            iiec_config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!(
                    "{}",
                    output::success(&format!("Default profile set to '{name}'"), color)
                );
            }
            Ok(())
        }
    }
}
