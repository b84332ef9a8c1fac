//! Shared helpers for command handlers.

use std::path::Path;

use chrono::NaiveDate;
use secrecy::SecretString;

use rollsync_core::{Synchronizer, Status};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Reload before reading the dataset. Tells the user when the data came
/// from the local store rather than the service.
pub async fn load(sync: &Synchronizer, global: &GlobalOpts) -> Result<(), CliError> {
    let outcome = sync.reload().await?;
    if outcome.degraded {
        output::notice(
            "Not signed in: showing locally stored records",
            global.quiet,
        );
    }
    Ok(())
}

pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| CliError::Validation {
        field: field.into(),
        reason: format!("expected YYYY-MM-DD ({e})"),
    })
}

pub fn parse_status(raw: &str) -> Result<Status, CliError> {
    raw.parse().map_err(|_| CliError::Validation {
        field: "status".into(),
        reason: format!("'{raw}' is not one of present, absent, late"),
    })
}

/// Use the given password, or prompt for one without echo.
pub fn password(given: Option<String>) -> Result<SecretString, CliError> {
    let raw = match given {
        Some(p) => p,
        None => rpassword::prompt_password("Password: ")?,
    };
    if raw.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "must not be empty".into(),
        });
    }
    Ok(SecretString::from(raw))
}

/// Read and parse a JSON file for `--file` flags.
pub fn read_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "file".into(),
        reason: format!("invalid JSON in {}: {e}", path.display()),
    })
}

/// `-` for absent optional fields in detail views.
pub fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn dates_must_be_iso() {
        assert_eq!(
            parse_date("date", "2024-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert!(matches!(
            parse_date("date", "01/03/2024"),
            Err(CliError::Validation { .. })
        ));
    }

    #[test]
    fn status_accepts_both_vocabularies() {
        assert_eq!(parse_status("Present").unwrap(), Status::Present);
        assert_eq!(parse_status("off-duty").unwrap(), Status::Absent);
        assert_eq!(parse_status("delayed").unwrap(), Status::Late);
        assert!(parse_status("sick").is_err());
    }

    #[test]
    fn empty_password_is_rejected() {
        assert!(password(Some(String::new())).is_err());
        assert!(password(Some("pw".into())).is_ok());
    }

    #[test]
    fn dash_for_missing() {
        assert_eq!(or_dash(None), "-");
        assert_eq!(or_dash(Some("")), "-");
        assert_eq!(or_dash(Some("CS")), "CS");
    }
}
