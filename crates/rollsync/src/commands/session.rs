//! Login, signup, and logout.

use rollsync_core::{Registration, Synchronizer};

use crate::cli::{GlobalOpts, LoginArgs, Role, SignupArgs};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn login(
    sync: &Synchronizer,
    args: LoginArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let auth = sync.authenticator();
    let user = match args.role {
        Role::Primary => {
            let password = util::password(args.password)?;
            auth.login_primary(&args.email, password).await?
        }
        Role::Secondary => {
            let Some(identifier) = args.identifier else {
                return Err(CliError::Validation {
                    field: "identifier".into(),
                    reason: "required when signing in with the secondary role".into(),
                });
            };
            let password = util::password(args.password)?;
            auth.login_secondary(&identifier, &args.email, password)
                .await?
        }
    };

    let who = user
        .as_ref()
        .and_then(|u| u.name.as_deref().or(u.email.as_deref()))
        .unwrap_or(&args.email);
    output::notice(&format!("Signed in as {who}"), global.quiet);
    Ok(())
}

pub async fn signup(
    sync: &Synchronizer,
    args: SignupArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let password = util::password(args.password)?;
    sync.authenticator()
        .signup_primary(Registration {
            identifier: args.identifier,
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            phone: args.phone,
            department: args.department,
            password,
        })
        .await?;
    output::notice(
        "Account registered. Run `rollsync login` to sign in.",
        global.quiet,
    );
    Ok(())
}

pub fn logout(sync: &Synchronizer, global: &GlobalOpts) -> Result<(), CliError> {
    sync.authenticator().logout()?;
    output::notice("Signed out", global.quiet);
    Ok(())
}
