//! Project command handlers.

use std::fmt::Write as _;

use tabled::Tabled;

use iiec_core::{Draft, Entity, EntityKind, Project, ProjectDraft};

use crate::cli::{GlobalOpts, ProjectFields, ProjectsArgs, ProjectsCommand};
use crate::config::Connection;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProjectRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Sections")]
    sections: usize,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&Project> for ProjectRow {
    fn from(p: &Project) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
            status: p.status.to_string(),
            sections: p.sections.len(),
            description: output::truncate(&p.description, 40),
            updated: output::date_cell(p.updated_at.as_ref().or(p.created_at.as_ref())),
        }
    }
}

fn detail(p: &Project) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ID:          {}", p.id);
    let _ = writeln!(out, "Name:        {}", p.name);
    let _ = writeln!(out, "Status:      {}", p.status);
    if p.sync.is_local_only() {
        let _ = writeln!(out, "Sync:        local only");
    }
    if !p.description.is_empty() {
        let _ = writeln!(out, "Description: {}", p.description);
    }
    if !p.overview.is_empty() {
        let _ = writeln!(out, "Overview:    {}", p.overview);
    }
    if !p.main_image_url.is_empty() {
        let _ = writeln!(out, "Image:       {}", p.main_image_url);
    }
    let _ = writeln!(out, "Created:     {}", output::date_cell(p.created_at.as_ref()));
    let _ = writeln!(out, "Updated:     {}", output::date_cell(p.updated_at.as_ref()));
    if !p.sections.is_empty() {
        let _ = writeln!(out, "Sections:");
        for s in &p.sections {
            let _ = writeln!(out, "  [{}] {}", s.id, s.title);
        }
    }
    out.trim_end().to_owned()
}

fn projects_of(items: &[Entity]) -> Vec<Project> {
    items.iter().filter_map(Entity::as_project).cloned().collect()
}

// ── Drafts ──────────────────────────────────────────────────────────

fn apply(fields: &ProjectFields, draft: &mut ProjectDraft) {
    util::set_if(&mut draft.name, fields.name.as_ref());
    util::set_if(&mut draft.description, fields.description.as_ref());
    util::set_if(&mut draft.overview, fields.overview.as_ref());
    util::set_if(&mut draft.main_image_url, fields.image_url.as_ref());
    util::set_if(&mut draft.status, fields.status.as_ref());
}

fn base_draft(fields: &ProjectFields, current: ProjectDraft) -> Result<ProjectDraft, CliError> {
    let mut draft = match fields.from_file {
        Some(ref path) => serde_json::from_value(util::read_json_file(path)?)?,
        None => current,
    };
    apply(fields, &mut draft);
    Ok(draft)
}

fn save_result(
    outcome: iiec_core::SaveOutcome<Entity>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::finish_save(
        outcome,
        "project",
        global,
        |e| e.as_project().map(detail).unwrap_or_default(),
        |e| e.id().to_string(),
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    conn: &Connection,
    args: ProjectsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ProjectsCommand::List => {
            let projects = projects_of(&util::load(conn, EntityKind::Projects).await?);
            let out = output::render_list(
                &global.output,
                &projects,
                |p| ProjectRow::from(p),
                |p| p.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProjectsCommand::Get { id } => {
            let project = conn.client.get_project(id).await?;
            let out = output::render_single(&global.output, &project, detail, |p| {
                p.id.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProjectsCommand::Create(fields) => {
            let draft = base_draft(&fields, ProjectDraft::default())?;
            if draft.name.trim().is_empty() {
                return Err(CliError::Validation {
                    field: "name".into(),
                    reason: "a project needs a name (--name or --from-file)".into(),
                });
            }
            let outcome = conn.client.save(&Draft::Project(draft), None).await?;
            save_result(outcome, global)
        }

        ProjectsCommand::Update { id, fields } => {
            let current = util::load_one(conn, EntityKind::Projects, id).await?;
            let current = current.as_project().map(ProjectDraft::from).unwrap_or_default();
            let draft = base_draft(&fields, current)?;
            let outcome = conn.client.save(&Draft::Project(draft), Some(id)).await?;
            save_result(outcome, global)
        }

        ProjectsCommand::Delete { id } => {
            let outcome = conn
                .client
                .remove(EntityKind::Projects, id, &util::Prompter::new(global))
                .await?;
            util::finish_remove(outcome, "project", global)
        }
    }
}
