//! Session command handlers.

use dialoguer::Input;
use secrecy::SecretString;

use iiec_core::User;

use crate::cli::{AuthArgs, AuthCommand, GlobalOpts};
use crate::config::Connection;
use crate::error::CliError;
use crate::output;

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn detail(u: &User) -> String {
    match u.name {
        Some(ref name) => format!("{name} <{}> (id {})", u.email, u.id),
        None => format!("{} (id {})", u.email, u.id),
    }
}

fn resolve_email(conn: &Connection, flag: Option<String>) -> Result<String, CliError> {
    if let Some(email) = flag.or_else(|| conn.profile.email.clone()) {
        return Ok(email);
    }
    Input::new()
        .with_prompt("Email")
        .interact_text()
        .map_err(prompt_err)
}

fn resolve_password(password_env: Option<&str>) -> Result<SecretString, CliError> {
    if let Some(var) = password_env {
        let value = std::env::var(var).map_err(|_| CliError::Validation {
            field: "password-env".into(),
            reason: format!("environment variable '{var}' is not set"),
        })?;
        return Ok(SecretString::from(value));
    }
    let pass = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
    Ok(SecretString::from(pass))
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    conn: &Connection,
    args: AuthArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    match args.command {
        AuthCommand::Login {
            email,
            password_env,
        } => {
            let email = resolve_email(conn, email)?;
            let password = resolve_password(password_env.as_deref())?;
            let user = conn.client.login(&email, &password).await?;
            if !global.quiet {
                eprintln!(
                    "{}",
                    output::success(
                        &format!(
                            "Logged in as {} (profile '{}')",
                            user.display_name(),
                            conn.profile_name
                        ),
                        color
                    )
                );
            }
            Ok(())
        }

        AuthCommand::Logout => {
            conn.client.logout();
            if !global.quiet {
                eprintln!(
                    "{}",
                    output::success(&format!("Logged out of '{}'", conn.profile_name), color)
                );
            }
            Ok(())
        }

        AuthCommand::Whoami => {
            let user = conn.client.restore_session().await?;
            let out = output::render_single(&global.output, &user, detail, |u| u.email.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
