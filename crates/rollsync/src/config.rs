//! Profile resolution: config file + command-line overrides into the
//! `SyncConfig` and store directory a command runs against.
//!
//! Core never sees these types; it receives a pre-built `SyncConfig`.

use std::path::PathBuf;

use rollsync_config::{Profile, profile_store_dir, profile_to_sync_config};
use rollsync_core::SyncConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Everything a synchronizer-bound command needs.
#[derive(Debug)]
pub struct Resolved {
    pub profile: String,
    pub sync: SyncConfig,
    pub store_dir: PathBuf,
}

/// Pick the profile named by `--profile` (or the configured default) and
/// apply flag overrides. Without a matching profile, `--base-url` alone
/// is enough.
pub fn resolve(global: &GlobalOpts) -> Result<Resolved, CliError> {
    let cfg = rollsync_config::load_config_or_default();
    let requested = global.profile.as_deref();

    let (name, mut profile) = match cfg.profile(requested) {
        Ok((name, profile)) => (name, profile.clone()),
        Err(err) => {
            let Some(url) = global.base_url.as_deref() else {
                return Err(err.into());
            };
            let name = requested
                .map(str::to_owned)
                .or_else(|| cfg.default_profile.clone())
                .unwrap_or_else(|| "default".into());
            (name, Profile::new(url))
        }
    };

    if let Some(ref url) = global.base_url {
        profile.base_url.clone_from(url);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    if let Some(ref dir) = global.store_dir {
        profile.store_dir = Some(dir.clone());
    }

    let sync = profile_to_sync_config(&profile, &cfg.defaults)?;
    let store_dir = profile_store_dir(&name, &profile);
    Ok(Resolved {
        profile: name,
        sync,
        store_dir,
    })
}
