// ── Person domain type ──

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;

/// An enrolled person (a driver, in the fleet vocabulary).
///
/// Owned by the synchronizer's collection. The credential is never part
/// of this type: it is write-only and lives on [`PersonDraft`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(
        default,
        alias = "studentId",
        alias = "student_id",
        alias = "driverId",
        alias = "driver_id"
    )]
    pub identifier: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, alias = "semester", skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
}

/// Fields supplied when enrolling or editing a person.
///
/// Accepts both vocabularies on input (`identifier` / `studentId` /
/// `driverId`, `level` / `semester`). Absent fields are left alone on
/// update and defaulted on create.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonDraft {
    #[serde(default, alias = "studentId", alias = "driverId")]
    pub identifier: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default, alias = "semester")]
    pub level: Option<u32>,
    /// Initial credential. Never read back from any response or file.
    #[serde(skip)]
    pub password: Option<SecretString>,
}

impl PersonDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn stored_legacy_shape_deserializes() {
        let p: Person =
            serde_json::from_str(r#"{"studentId":"P1","name":"Ann","semester":2}"#).unwrap();
        assert_eq!(p.identifier, "P1");
        assert_eq!(p.level, Some(2));
        assert!(p.id.is_none());
    }

    #[test]
    fn draft_ignores_password_in_input() {
        let d: PersonDraft =
            serde_json::from_str(r#"{"driverId":"D7","name":"Bo","password":"leak"}"#).unwrap();
        assert_eq!(d.identifier.as_deref(), Some("D7"));
        assert!(d.password.is_none());
    }
}
