// ── Subject domain type ──

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;

/// A subject or course (a route, in the fleet vocabulary).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(
        default,
        alias = "subjectCode",
        alias = "subject_code",
        alias = "routeCode",
        alias = "route_code"
    )]
    pub code: String,
    #[serde(
        default,
        alias = "subjectName",
        alias = "subject_name",
        alias = "routeName",
        alias = "route_name"
    )]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Weak reference to the owning person; may dangle.
    #[serde(
        default,
        alias = "teacherId",
        alias = "teacher_id",
        alias = "managerId",
        skip_serializing_if = "Option::is_none"
    )]
    pub owner_id: Option<EntityId>,
}

/// Fields supplied when creating or editing a subject.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectDraft {
    #[serde(default, alias = "subjectCode", alias = "routeCode")]
    pub code: Option<String>,
    #[serde(default, alias = "subjectName", alias = "routeName")]
    pub name: Option<String>,
    #[serde(default)]
    pub credits: Option<u32>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default, alias = "teacherId", alias = "managerId")]
    pub owner_id: Option<EntityId>,
}
