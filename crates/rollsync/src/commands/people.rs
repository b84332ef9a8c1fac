//! People (drivers) command handlers.

use std::sync::Arc;

use secrecy::SecretString;
use tabled::Tabled;

use rollsync_core::{EntityId, Person, PersonDraft, Synchronizer};

use crate::cli::{GlobalOpts, PeopleArgs, PeopleCommand, PersonFields};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct PersonRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Identifier")]
    identifier: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Department")]
    department: String,
    #[tabled(rename = "Level")]
    level: String,
}

impl From<&Arc<Person>> for PersonRow {
    fn from(p: &Arc<Person>) -> Self {
        Self {
            id: id_of(p),
            identifier: p.identifier.clone(),
            name: p.name.clone(),
            email: p.email.clone().unwrap_or_default(),
            department: p.department.clone().unwrap_or_default(),
            level: p.level.map(|l| l.to_string()).unwrap_or_default(),
        }
    }
}

fn id_of(p: &Person) -> String {
    p.id.as_ref().map(ToString::to_string).unwrap_or_default()
}

fn detail(p: &Person) -> String {
    [
        format!("ID:         {}", util::or_dash(Some(id_of(p).as_str()))),
        format!("Identifier: {}", util::or_dash(Some(p.identifier.as_str()))),
        format!("Name:       {}", p.name),
        format!("Email:      {}", util::or_dash(p.email.as_deref())),
        format!("Phone:      {}", util::or_dash(p.phone.as_deref())),
        format!("Department: {}", util::or_dash(p.department.as_deref())),
        format!(
            "Level:      {}",
            p.level.map_or_else(|| "-".into(), |l| l.to_string())
        ),
    ]
    .join("\n")
}

fn draft(fields: PersonFields) -> PersonDraft {
    PersonDraft {
        identifier: fields.identifier,
        name: fields.name,
        email: fields.email,
        phone: fields.phone,
        department: fields.department,
        level: fields.level,
        password: fields.password.map(SecretString::from),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    sync: &Synchronizer,
    args: PeopleArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        PeopleCommand::List => {
            util::load(sync, global).await?;
            let snap = sync.people();
            let out = output::render_list(
                &global.output,
                snap.as_slice(),
                |p| PersonRow::from(p),
                |p| id_of(p),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PeopleCommand::Get { id } => {
            let Some(person) = sync.get_person(&EntityId::from(id.as_str())).await? else {
                return Err(CliError::NotFound {
                    resource_type: "person".into(),
                    identifier: id,
                    list_command: "people list".into(),
                });
            };
            let out = output::render_single(&global.output, &person, detail, id_of);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PeopleCommand::Add(fields) => {
            if fields.name.as_deref().is_none_or(str::is_empty) {
                return Err(CliError::Validation {
                    field: "name".into(),
                    reason: "a name is required".into(),
                });
            }
            match sync.add_person(draft(fields)).await? {
                Some(person) => {
                    let out = output::render_single(&global.output, &person, detail, id_of);
                    output::print_output(&out, global.quiet);
                }
                None => output::notice("Person added", global.quiet),
            }
            Ok(())
        }

        PeopleCommand::Update { id, fields } => {
            sync.update_person(&EntityId::from(id.as_str()), draft(fields))
                .await?;
            output::notice("Person updated", global.quiet);
            Ok(())
        }

        PeopleCommand::Remove { id } => {
            sync.remove_person(&EntityId::from(id.as_str())).await?;
            output::notice("Person removed", global.quiet);
            Ok(())
        }
    }
}
