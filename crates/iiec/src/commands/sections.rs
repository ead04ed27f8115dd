//! Project section command handlers.

use std::fmt::Write as _;

use tabled::Tabled;

use iiec_core::{EntityId, Section, SectionDraft};

use crate::cli::{GlobalOpts, SectionFields, SectionsArgs, SectionsCommand};
use crate::config::Connection;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SectionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Project")]
    project: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&Section> for SectionRow {
    fn from(s: &Section) -> Self {
        Self {
            id: s.id.to_string(),
            project: s.project_id.to_string(),
            title: s.title.clone(),
            description: output::truncate(&s.description, 50),
        }
    }
}

fn detail(s: &Section) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ID:          {}", s.id);
    let _ = writeln!(out, "Project:     {}", s.project_id);
    let _ = writeln!(out, "Title:       {}", s.title);
    if s.sync.is_local_only() {
        let _ = writeln!(out, "Sync:        local only");
    }
    if !s.description.is_empty() {
        let _ = writeln!(out, "Description: {}", s.description);
    }
    if !s.details.is_empty() {
        let _ = writeln!(out, "Details:     {}", s.details);
    }
    if !s.image_url.is_empty() {
        let _ = writeln!(out, "Image:       {}", s.image_url);
    }
    out.trim_end().to_owned()
}

fn apply(fields: &SectionFields, draft: &mut SectionDraft) {
    util::set_if(&mut draft.title, fields.title.as_ref());
    util::set_if(&mut draft.description, fields.description.as_ref());
    util::set_if(&mut draft.details, fields.details.as_ref());
    util::set_if(&mut draft.image_url, fields.image_url.as_ref());
}

/// Sections of `project`, loaded into the cached project when present.
async fn load_sections(conn: &Connection, project: EntityId) -> Result<Vec<Section>, CliError> {
    util::require_token(conn)?;
    let sections = conn.client.fetch_sections(project).await;
    util::ensure_session(conn)?;
    Ok(sections)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    conn: &Connection,
    args: SectionsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SectionsCommand::List { project } => {
            let sections = load_sections(conn, project).await?;
            let out = output::render_list(
                &global.output,
                &sections,
                |s| SectionRow::from(s),
                |s| s.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SectionsCommand::Get { id } => {
            let section = conn.client.get_section(id).await?;
            let out =
                output::render_single(&global.output, &section, detail, |s| s.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SectionsCommand::Create { project, fields } => {
            let mut draft = SectionDraft::default();
            apply(&fields, &mut draft);
            if draft.title.trim().is_empty() {
                return Err(CliError::Validation {
                    field: "title".into(),
                    reason: "a section needs a --title".into(),
                });
            }
            let outcome = conn.client.save_section(project, &draft, None).await?;
            util::finish_save(outcome, "section", global, detail, |s| s.id.to_string())
        }

        SectionsCommand::Update {
            project,
            id,
            fields,
        } => {
            util::require_token(conn)?;
            let sections = conn.client.try_fetch_sections(project).await?;
            let current = sections
                .iter()
                .find(|s| s.id == id)
                .ok_or_else(|| CliError::NotFound {
                    resource_type: "section".into(),
                    identifier: id.to_string(),
                    list_command: format!("sections list {project}"),
                })?;
            let mut draft = SectionDraft::from(current);
            apply(&fields, &mut draft);
            let outcome = conn.client.save_section(project, &draft, Some(id)).await?;
            util::finish_save(outcome, "section", global, detail, |s| s.id.to_string())
        }

        SectionsCommand::Delete { project, id } => {
            let outcome = conn
                .client
                .remove_section(project, id, &util::Prompter::new(global))
                .await?;
            util::finish_remove(outcome, "section", global)
        }
    }
}
