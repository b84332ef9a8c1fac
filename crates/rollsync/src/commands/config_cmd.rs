//! Config subcommand handlers.

use std::fmt::Write as _;

use rollsync_config::{Config, Profile, config_path, profile_store_dir};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

fn format_config(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "reload_policy = \"{}\"", cfg.defaults.reload_policy);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "base_url = \"{}\"", p.base_url);
        let _ = writeln!(
            out,
            "# store: {}",
            profile_store_dir(name, p).display()
        );
        if let Some(ref dir) = p.store_dir {
            let _ = writeln!(out, "store_dir = \"{}\"", dir.display());
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(policy) = p.reload_policy {
            let _ = writeln!(out, "reload_policy = \"{policy}\"");
        }
    }

    out
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init {
            base_url,
            name,
            store_dir,
            make_default,
        } => {
            base_url
                .parse::<url::Url>()
                .map_err(|e| CliError::Validation {
                    field: "base_url".into(),
                    reason: format!("invalid URL: {e}"),
                })?;

            let mut cfg = rollsync_config::load_config_or_default();
            let mut profile = Profile::new(base_url);
            profile.store_dir = store_dir;
            cfg.profiles.insert(name.clone(), profile);
            if make_default || cfg.profiles.len() == 1 {
                cfg.default_profile = Some(name.clone());
            }
            rollsync_config::save_config(&cfg)?;
            output::notice(
                &format!("Profile '{name}' saved to {}", config_path().display()),
                global.quiet,
            );
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = rollsync_config::load_config_or_default();
            let out = output::render_single(&global.output, &cfg, format_config, |c| {
                c.default_profile.clone().unwrap_or_default()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = rollsync_config::load_config_or_default();
            let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
            names.sort();
            let default = cfg.default_profile.as_deref();
            let lines: Vec<String> = names
                .iter()
                .map(|n| {
                    if Some(n.as_str()) == default {
                        format!("{n} *")
                    } else {
                        n.clone()
                    }
                })
                .collect();
            output::print_output(&lines.join("\n"), global.quiet);
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = rollsync_config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound { name });
            }
            cfg.default_profile = Some(name.clone());
            rollsync_config::save_config(&cfg)?;
            output::notice(&format!("Default profile set to '{name}'"), global.quiet);
            Ok(())
        }
    }
}
