//! Local fallback store inspection and seeding.

use serde::Serialize;

use rollsync_core::store::collections;
use rollsync_core::{Person, StatusEvent, Subject, Synchronizer};

use crate::cli::{Collection, GlobalOpts, StoreArgs, StoreCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct StoreInfo {
    session: String,
    user: Option<String>,
    people: usize,
    subjects: usize,
    events: usize,
}

fn info_detail(i: &StoreInfo) -> String {
    [
        format!("Session:  {}", i.session),
        format!("User:     {}", util::or_dash(i.user.as_deref())),
        format!("People:   {}", i.people),
        format!("Subjects: {}", i.subjects),
        format!("Events:   {}", i.events),
    ]
    .join("\n")
}

fn collection_name(collection: Collection) -> &'static str {
    match collection {
        Collection::People => collections::PEOPLE,
        Collection::Subjects => collections::SUBJECTS,
        Collection::Events => collections::EVENTS,
    }
}

pub fn handle(sync: &Synchronizer, args: StoreArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let fallback = sync.fallback();
    match args.command {
        StoreCommand::Info => {
            let session = sync.session();
            let present = session.has_credential().map_err(CliError::Store)?;
            let user = session.user().map_err(CliError::Store)?;
            let info = StoreInfo {
                session: if present { "signed in" } else { "signed out" }.into(),
                user: user.and_then(|u| u.name.or(u.email)),
                people: fallback
                    .read_collection::<Person>(collections::PEOPLE)
                    .map_err(CliError::Store)?
                    .len(),
                subjects: fallback
                    .read_collection::<Subject>(collections::SUBJECTS)
                    .map_err(CliError::Store)?
                    .len(),
                events: fallback
                    .read_collection::<StatusEvent>(collections::EVENTS)
                    .map_err(CliError::Store)?
                    .len(),
            };
            let out = output::render_single(&global.output, &info, info_detail, |i| {
                i.session.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        StoreCommand::Seed { collection, file } => {
            let name = collection_name(collection);
            // Records are validated before anything is written.
            let count = match collection {
                Collection::People => {
                    let records: Vec<Person> = util::read_json_file(&file)?;
                    fallback.write_collection(name, &records).map_err(CliError::Store)?;
                    records.len()
                }
                Collection::Subjects => {
                    let records: Vec<Subject> = util::read_json_file(&file)?;
                    fallback.write_collection(name, &records).map_err(CliError::Store)?;
                    records.len()
                }
                Collection::Events => {
                    let records: Vec<StatusEvent> = util::read_json_file(&file)?;
                    fallback.write_collection(name, &records).map_err(CliError::Store)?;
                    records.len()
                }
            };
            output::notice(&format!("Stored {count} {name}"), global.quiet);
            Ok(())
        }
    }
}
