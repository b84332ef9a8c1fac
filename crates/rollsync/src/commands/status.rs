//! Reload and dashboard summary.

use chrono::Utc;

use rollsync_core::{DashboardSummary, ReloadOutcome, Synchronizer};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

fn source(degraded: bool) -> &'static str {
    if degraded { "local store" } else { "service" }
}

fn reload_detail(o: &ReloadOutcome) -> String {
    [
        format!("Source:     {}", source(o.degraded)),
        format!("People:     {}", o.people),
        format!("Subjects:   {}", o.subjects),
        format!("Generation: {}", o.generation),
    ]
    .join("\n")
}

fn summary_detail(s: &DashboardSummary) -> String {
    [
        format!("Source:       {}", source(s.degraded)),
        format!("People:       {}", s.people),
        format!("Subjects:     {}", s.subjects),
        format!("Events today: {}", s.events_today),
    ]
    .join("\n")
}

pub async fn reload(sync: &Synchronizer, global: &GlobalOpts) -> Result<(), CliError> {
    let outcome = sync.reload().await?;
    let out = output::render_single(&global.output, &outcome, reload_detail, |o| {
        o.generation.to_string()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn summary(sync: &Synchronizer, global: &GlobalOpts) -> Result<(), CliError> {
    util::load(sync, global).await?;
    let summary = sync.summary(Utc::now().date_naive());
    let out = output::render_single(&global.output, &summary, summary_detail, |s| {
        format!("{} {} {}", s.people, s.subjects, s.events_today)
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
