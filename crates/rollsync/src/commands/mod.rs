//! Command dispatch: bridges CLI args -> synchronizer calls -> output formatting.

pub mod config_cmd;
pub mod events;
pub mod people;
pub mod session;
pub mod status;
pub mod store;
pub mod subjects;
pub mod util;

use rollsync_core::Synchronizer;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a synchronizer-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    sync: &Synchronizer,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => session::login(sync, args, global).await,
        Command::Signup(args) => session::signup(sync, args, global).await,
        Command::Logout => session::logout(sync, global),
        Command::Reload => status::reload(sync, global).await,
        Command::Status => status::summary(sync, global).await,
        Command::People(args) => people::handle(sync, args, global).await,
        Command::Subjects(args) => subjects::handle(sync, args, global).await,
        Command::Events(args) => events::handle(sync, args, global).await,
        Command::Store(args) => store::handle(sync, args, global),
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "command does not use the synchronizer".into(),
        )),
    }
}
