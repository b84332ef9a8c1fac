//! Status event (telemetry) command handlers.

use std::borrow::Borrow;

use tabled::Tabled;

use rollsync_core::{EntityId, EventSummary, StatusEvent, StatusEventDraft, Synchronizer};

use crate::cli::{EventsArgs, EventsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Person")]
    person: String,
    #[tabled(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Recorded By")]
    recorded_by: String,
}

impl EventRow {
    fn new(e: &StatusEvent, color: bool) -> Self {
        Self {
            id: id_of(e),
            date: e.date.to_string(),
            person: e.person_id.to_string(),
            subject: e.subject_id.to_string(),
            status: output::status_label(e.status, color),
            recorded_by: e
                .recorded_by
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        }
    }
}

fn id_of(e: &StatusEvent) -> String {
    e.id.as_ref().map(ToString::to_string).unwrap_or_default()
}

fn detail(e: &StatusEvent) -> String {
    [
        format!("ID:          {}", util::or_dash(Some(id_of(e).as_str()))),
        format!("Date:        {}", e.date),
        format!("Person:      {}", e.person_id),
        format!("Subject:     {}", e.subject_id),
        format!("Status:      {}", e.status),
        format!(
            "Recorded by: {}",
            e.recorded_by
                .as_ref()
                .map_or_else(|| "-".into(), ToString::to_string)
        ),
    ]
    .join("\n")
}

fn summary_detail(s: &EventSummary) -> String {
    [
        format!("Total:      {}", s.total),
        format!("Present:    {}", s.present),
        format!("Absent:     {}", s.absent),
        format!("Percentage: {:.1}%", s.percentage),
    ]
    .join("\n")
}

/// Works for owned history lists and for session-log snapshots alike.
fn print_events<E>(events: &[E], global: &GlobalOpts)
where
    E: Borrow<StatusEvent> + serde::Serialize,
{
    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        events,
        |e| EventRow::new(Borrow::<StatusEvent>::borrow(e), color),
        |e| id_of(Borrow::<StatusEvent>::borrow(e)),
    );
    output::print_output(&out, global.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    sync: &Synchronizer,
    args: EventsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        EventsCommand::Record {
            person,
            subject,
            status,
            date,
            by,
        } => {
            let mut draft = StatusEventDraft::new(
                EntityId::from(person),
                EntityId::from(subject),
                util::parse_status(&status)?,
            );
            if let Some(raw) = date {
                draft = draft.on(util::parse_date("date", &raw)?);
            }
            if let Some(by) = by {
                draft = draft.recorded_by(EntityId::from(by));
            }
            let event = sync.record_event(draft).await?;
            let out = output::render_single(&global.output, &event, |e| detail(e), |e| id_of(e));
            output::print_output(&out, global.quiet);
            Ok(())
        }

        EventsCommand::Bulk { file } => {
            let drafts: Vec<StatusEventDraft> = util::read_json_file(&file)?;
            if drafts.is_empty() {
                output::notice("No events in file, nothing sent", global.quiet);
                return Ok(());
            }
            let recorded = sync.record_events(drafts).await?;
            output::notice(&format!("Recorded {} events", recorded.len()), global.quiet);
            print_events(&recorded, global);
            Ok(())
        }

        EventsCommand::History { person, subject } => {
            let subject = subject.map(EntityId::from);
            let history = sync
                .person_events(&EntityId::from(person), subject.as_ref())
                .await;
            print_events(&history, global);
            Ok(())
        }

        EventsCommand::Stats {
            person,
            subject,
            remote,
        } => {
            let person = person.map(EntityId::from);
            let subject = subject.map(EntityId::from);
            if remote {
                let stats = sync
                    .remote_event_stats(person.as_ref(), subject.as_ref())
                    .await?;
                let out = output::render_single(
                    &global.output,
                    &stats,
                    |s| {
                        [
                            format!("Total:      {}", s.total),
                            format!("Present:    {}", s.present),
                            format!("Absent:     {}", s.absent),
                            format!("Late:       {}", s.late),
                            format!(
                                "Percentage: {}",
                                s.percentage.map_or_else(|| "-".into(), |p| format!("{p:.1}%"))
                            ),
                        ]
                        .join("\n")
                    },
                    |s| s.total.to_string(),
                );
                output::print_output(&out, global.quiet);
                return Ok(());
            }

            let Some(person) = person else {
                return Err(CliError::Validation {
                    field: "person".into(),
                    reason: "a person ID is required unless --remote is given".into(),
                });
            };
            let summary = sync.event_stats(&person, subject.as_ref()).await;
            let out = output::render_single(&global.output, &summary, summary_detail, |s| {
                format!("{:.1}", s.percentage)
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        EventsCommand::Subject { id } => {
            let events = sync.events_for_subject(&EntityId::from(id)).await?;
            print_events(&events, global);
            Ok(())
        }

        EventsCommand::On { date } => {
            let day = util::parse_date("date", &date)?;
            let events = sync.events_on(day).await?;
            print_events(&events, global);
            Ok(())
        }

        EventsCommand::Remove { id } => {
            sync.remove_event(&EntityId::from(id)).await?;
            output::notice("Event removed", global.quiet);
            Ok(())
        }
    }
}
