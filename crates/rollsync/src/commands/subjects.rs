//! Subject (route) command handlers.

use std::sync::Arc;

use tabled::Tabled;

use rollsync_core::{EntityId, Subject, SubjectDraft, Synchronizer};

use crate::cli::{GlobalOpts, SubjectFields, SubjectsArgs, SubjectsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct SubjectRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Credits")]
    credits: String,
    #[tabled(rename = "Department")]
    department: String,
    #[tabled(rename = "Owner")]
    owner: String,
}

impl From<&Arc<Subject>> for SubjectRow {
    fn from(s: &Arc<Subject>) -> Self {
        Self {
            id: id_of(s),
            code: s.code.clone(),
            name: s.name.clone(),
            credits: s.credits.map(|c| c.to_string()).unwrap_or_default(),
            department: s.department.clone().unwrap_or_default(),
            owner: s.owner_id.as_ref().map(ToString::to_string).unwrap_or_default(),
        }
    }
}

fn id_of(s: &Subject) -> String {
    s.id.as_ref().map(ToString::to_string).unwrap_or_default()
}

fn detail(s: &Subject) -> String {
    [
        format!("ID:         {}", util::or_dash(Some(id_of(s).as_str()))),
        format!("Code:       {}", util::or_dash(Some(s.code.as_str()))),
        format!("Name:       {}", s.name),
        format!(
            "Credits:    {}",
            s.credits.map_or_else(|| "-".into(), |c| c.to_string())
        ),
        format!("Department: {}", util::or_dash(s.department.as_deref())),
        format!(
            "Owner:      {}",
            s.owner_id
                .as_ref()
                .map_or_else(|| "-".into(), ToString::to_string)
        ),
    ]
    .join("\n")
}

fn draft(fields: SubjectFields) -> SubjectDraft {
    SubjectDraft {
        code: fields.code,
        name: fields.name,
        credits: fields.credits,
        department: fields.department,
        owner_id: fields.owner.as_deref().map(EntityId::from),
    }
}

pub async fn handle(
    sync: &Synchronizer,
    args: SubjectsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SubjectsCommand::List => {
            util::load(sync, global).await?;
            let snap = sync.subjects();
            let out = output::render_list(
                &global.output,
                snap.as_slice(),
                |s| SubjectRow::from(s),
                |s| id_of(s),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SubjectsCommand::Get { id } => {
            let Some(subject) = sync.get_subject(&EntityId::from(id.as_str())).await? else {
                return Err(CliError::NotFound {
                    resource_type: "subject".into(),
                    identifier: id,
                    list_command: "subjects list".into(),
                });
            };
            let out = output::render_single(&global.output, &subject, detail, id_of);
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SubjectsCommand::Add(fields) => {
            if fields.code.as_deref().is_none_or(str::is_empty)
                || fields.name.as_deref().is_none_or(str::is_empty)
            {
                return Err(CliError::Validation {
                    field: "code/name".into(),
                    reason: "both a code and a name are required".into(),
                });
            }
            match sync.add_subject(draft(fields)).await? {
                Some(subject) => {
                    let out = output::render_single(&global.output, &subject, detail, id_of);
                    output::print_output(&out, global.quiet);
                }
                None => output::notice("Subject added", global.quiet),
            }
            Ok(())
        }

        SubjectsCommand::Update { id, fields } => {
            sync.update_subject(&EntityId::from(id.as_str()), draft(fields))
                .await?;
            output::notice("Subject updated", global.quiet);
            Ok(())
        }

        SubjectsCommand::Remove { id } => {
            sync.remove_subject(&EntityId::from(id.as_str())).await?;
            output::notice("Subject removed", global.quiet);
            Ok(())
        }
    }
}
