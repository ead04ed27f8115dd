//! Command dispatch: bridges CLI args -> core client calls -> output formatting.

pub mod auth;
pub mod config_cmd;
pub mod events;
pub mod orders;
pub mod products;
pub mod projects;
pub mod sections;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::config::Connection;
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    conn: &Connection,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Auth(args) => auth::handle(conn, args, global).await,
        Command::Projects(args) => projects::handle(conn, args, global).await,
        Command::Sections(args) => sections::handle(conn, args, global).await,
        Command::Events(args) => events::handle(conn, args, global).await,
        Command::Products(args) => products::handle(conn, args, global).await,
        Command::Orders(args) => orders::handle(conn, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "config and completions are handled before dispatch".into(),
        )),
    }
}
