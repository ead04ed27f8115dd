//! Shared helpers for command handlers.

use std::path::Path;

use serde::Serialize;

use iiec_core::{Confirm, Entity, EntityId, EntityKind, RemoveOutcome, SaveOutcome, SessionState};

use crate::cli::GlobalOpts;
use crate::config::Connection;
use crate::error::CliError;
use crate::output;

// ── Confirmation ─────────────────────────────────────────────────────

/// Terminal confirmation for deletes, auto-approving under `--yes`.
pub struct Prompter {
    yes: bool,
}

impl Prompter {
    pub fn new(global: &GlobalOpts) -> Self {
        Self { yes: global.yes }
    }
}

impl Confirm for Prompter {
    fn confirm(&self, prompt: &str) -> bool {
        if self.yes {
            return true;
        }
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "confirmation prompt failed; use --yes in scripts");
                false
            })
    }
}

// ── Input ────────────────────────────────────────────────────────────

/// Read and parse a JSON file for `--from-file` flags.
pub fn read_json_file(path: &Path) -> Result<serde_json::Value, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("invalid JSON: {e}"),
    })
}

/// Overwrite `target` when a flag was given.
pub fn set_if<T: Clone>(target: &mut T, value: Option<&T>) {
    if let Some(v) = value {
        target.clone_from(v);
    }
}

// ── Reads ────────────────────────────────────────────────────────────

/// Fail fast when the profile has no stored token, so list commands
/// report "not logged in" instead of an empty table.
pub fn require_token(conn: &Connection) -> Result<(), CliError> {
    conn.client.session().token()?;
    Ok(())
}

/// Fetch a collection, turning a session rejected mid-read into an error.
pub async fn load(conn: &Connection, kind: EntityKind) -> Result<Vec<Entity>, CliError> {
    require_token(conn)?;
    let items = conn.client.fetch_collection(kind).await;
    ensure_session(conn)?;
    Ok(items)
}

/// Reads swallow failures; a 401 still shows up as a rejected session.
pub fn ensure_session(conn: &Connection) -> Result<(), CliError> {
    if matches!(conn.client.session_state(), SessionState::Rejected { .. }) {
        return Err(CliError::SessionExpired {
            profile: conn.profile_name.clone(),
        });
    }
    Ok(())
}

/// Fetch `kind` and pick one record. Unlike list reads, a failed fetch
/// is reported as such rather than as a missing record.
pub async fn load_one(
    conn: &Connection,
    kind: EntityKind,
    id: EntityId,
) -> Result<Entity, CliError> {
    require_token(conn)?;
    conn.client.try_fetch_collection(kind).await?;
    conn.client.store().get(kind, id).ok_or_else(|| CliError::NotFound {
        resource_type: iiec_core::descriptor(kind).label.into(),
        identifier: id.to_string(),
        list_command: format!("{kind} list"),
    })
}

// ── Write results ────────────────────────────────────────────────────

/// Print a saved record. A record kept only locally is printed too, then
/// reported as an error so scripts see the failure.
pub fn finish_save<T: Serialize>(
    outcome: SaveOutcome<T>,
    label: &str,
    global: &GlobalOpts,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<(), CliError> {
    let error = outcome.error().map(str::to_owned);
    let item = outcome.into_item();

    let out = output::render_single(&global.output, &item, detail_fn, id_fn)?;
    output::print_output(&out, global.quiet);

    if let Some(message) = error {
        return Err(CliError::NotPersisted {
            label: label.into(),
            message,
        });
    }
    if !global.quiet {
        let color = output::should_color(&global.color);
        eprintln!("{}", output::success(&format!("{label} saved"), color));
    }
    Ok(())
}

pub fn finish_remove(
    outcome: RemoveOutcome,
    label: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    match outcome {
        RemoveOutcome::Removed => {
            if !global.quiet {
                eprintln!("{}", output::success(&format!("{label} deleted"), color));
            }
            Ok(())
        }
        RemoveOutcome::RemovedLocally { error } => Err(CliError::NotPersisted {
            label: label.into(),
            message: error,
        }),
        RemoveOutcome::Cancelled => {
            if !global.quiet {
                eprintln!("{}", output::warning("Cancelled", color));
            }
            Ok(())
        }
    }
}
