//! Event command handlers.

use std::fmt::Write as _;

use tabled::Tabled;

use iiec_core::model::today;
use iiec_core::{Draft, Entity, EntityKind, Event, EventDraft, past_events, upcoming_events};

use crate::cli::{EventFields, EventsArgs, EventsCommand, GlobalOpts};
use crate::config::Connection;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Event> for EventRow {
    fn from(e: &Event) -> Self {
        Self {
            id: e.id.to_string(),
            title: e.title.clone(),
            date: e.date.clone(),
            time: e.time.clone(),
            location: output::truncate(&e.location, 30),
            status: e.status.to_string(),
        }
    }
}

fn detail(e: &Event) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ID:          {}", e.id);
    let _ = writeln!(out, "Title:       {}", e.title);
    let _ = writeln!(out, "Date:        {} {}", e.date, e.time);
    let _ = writeln!(out, "Status:      {}", e.status);
    if e.sync.is_local_only() {
        let _ = writeln!(out, "Sync:        local only");
    }
    if !e.location.is_empty() {
        let _ = writeln!(out, "Location:    {}", e.location);
    }
    if !e.description.is_empty() {
        let _ = writeln!(out, "Description: {}", e.description);
    }
    if !e.url.is_empty() {
        let _ = writeln!(out, "Link:        {}", e.url);
    }
    if !e.image_url.is_empty() {
        let _ = writeln!(out, "Image:       {}", e.image_url);
    }
    out.trim_end().to_owned()
}

// ── Drafts ──────────────────────────────────────────────────────────

fn base_draft(fields: &EventFields, current: EventDraft) -> Result<EventDraft, CliError> {
    let mut draft: EventDraft = match fields.from_file {
        Some(ref path) => serde_json::from_value(util::read_json_file(path)?)?,
        None => current,
    };
    util::set_if(&mut draft.title, fields.title.as_ref());
    util::set_if(&mut draft.description, fields.description.as_ref());
    util::set_if(&mut draft.date, fields.date.as_ref());
    util::set_if(&mut draft.time, fields.time.as_ref());
    util::set_if(&mut draft.location, fields.location.as_ref());
    util::set_if(&mut draft.image_url, fields.image_url.as_ref());
    util::set_if(&mut draft.url, fields.url.as_ref());

    if !draft.date.is_empty() && iiec_core::model::parse_event_date(&draft.date).is_none() {
        return Err(CliError::Validation {
            field: "date".into(),
            reason: format!("expected YYYY-MM-DD, got '{}'", draft.date),
        });
    }
    Ok(draft)
}

fn save_result(
    outcome: iiec_core::SaveOutcome<Entity>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::finish_save(
        outcome,
        "event",
        global,
        |e| e.as_event().map(detail).unwrap_or_default(),
        |e| e.id().to_string(),
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    conn: &Connection,
    args: EventsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        EventsCommand::List {
            upcoming,
            past,
            limit,
        } => {
            let items = util::load(conn, EntityKind::Events).await?;
            let events: Vec<Event> = items.iter().filter_map(Entity::as_event).cloned().collect();
            let events = if upcoming {
                upcoming_events(&events, today(), limit)
            } else if past {
                past_events(&events, today())
            } else {
                events
            };

            let out = output::render_list(
                &global.output,
                &events,
                |e| EventRow::from(e),
                |e| e.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        EventsCommand::Create(fields) => {
            let draft = base_draft(&fields, EventDraft::default())?;
            if draft.title.trim().is_empty() {
                return Err(CliError::Validation {
                    field: "title".into(),
                    reason: "an event needs a title (--title or --from-file)".into(),
                });
            }
            let outcome = conn.client.save(&Draft::Event(draft), None).await?;
            save_result(outcome, global)
        }

        EventsCommand::Update { id, fields } => {
            let current = util::load_one(conn, EntityKind::Events, id).await?;
            let current = current.as_event().map(EventDraft::from).unwrap_or_default();
            let draft = base_draft(&fields, current)?;
            let outcome = conn.client.save(&Draft::Event(draft), Some(id)).await?;
            save_result(outcome, global)
        }

        EventsCommand::Delete { id } => {
            let outcome = conn
                .client
                .remove(EntityKind::Events, id, &util::Prompter::new(global))
                .await?;
            util::finish_remove(outcome, "event", global)
        }
    }
}
