// Wire types for the roster service
//
// Every endpoint wraps its payload in the `Envelope<T>` shape. Record
// types accept the service's older field spellings through `alias` so the
// rest of the workspace only ever sees canonical names; payload types
// serialize canonical names exclusively.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ── Response Envelope ────────────────────────────────────────────────

/// Standard response envelope.
///
/// ```json
/// { "success": true, "data": [...], "error": "optional" }
/// ```
///
/// Some endpoints attach extra top-level fields (e.g. the id of a freshly
/// created event); those land in `extra`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl<T> Envelope<T> {
    /// The most specific human-readable failure text the service sent.
    pub fn failure_message(&self) -> Option<String> {
        self.error.clone().or_else(|| self.message.clone())
    }
}

/// Credential-issuing envelope from `/auth/{role}/login|signup`.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

// ── Identifiers ──────────────────────────────────────────────────────

/// Server-assigned record key. The service emits numeric row ids, but
/// older deployments used string keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

// ── Roles ────────────────────────────────────────────────────────────

/// Which side of the application a credential belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    /// Record keepers (fleet managers in the alias vocabulary).
    Primary,
    /// Enrolled people (drivers in the alias vocabulary).
    Secondary,
}

impl Role {
    /// Path segment used by the auth endpoints.
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Primary => "teacher",
            Self::Secondary => "student",
        }
    }
}

// ── Status ───────────────────────────────────────────────────────────

/// Status recorded by a status event.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Status {
    #[serde(alias = "on-duty", alias = "onduty")]
    #[strum(to_string = "present", serialize = "on-duty")]
    Present,
    #[serde(alias = "off-duty", alias = "offduty")]
    #[strum(to_string = "absent", serialize = "off-duty")]
    Absent,
    #[serde(alias = "delayed")]
    #[strum(to_string = "late", serialize = "delayed")]
    Late,
}

// ── Records (responses) ──────────────────────────────────────────────

/// A person as reported by `GET /people`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRecord {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default, alias = "studentId", alias = "student_id")]
    pub identifier: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default, alias = "semester")]
    pub level: Option<u32>,
}

/// A subject as reported by `GET /subjects`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRecord {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default, alias = "subjectCode", alias = "subject_code")]
    pub code: String,
    #[serde(default, alias = "subjectName", alias = "subject_name")]
    pub name: String,
    #[serde(default)]
    pub credits: Option<u32>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default, alias = "teacherId", alias = "teacher_id")]
    pub owner_id: Option<RecordId>,
}

/// A status event as reported by the `/events` lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(alias = "studentId", alias = "student_id")]
    pub person_id: RecordId,
    #[serde(alias = "subject_id")]
    pub subject_id: RecordId,
    #[serde(deserialize_with = "deserialize_day", alias = "attendance_date")]
    pub date: NaiveDate,
    pub status: Status,
    #[serde(default, alias = "markedBy", alias = "marked_by")]
    pub recorded_by: Option<RecordId>,
    #[serde(default, alias = "created_at")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Aggregate counts from `GET /events/stats`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub present: u64,
    #[serde(default)]
    pub absent: u64,
    #[serde(default)]
    pub late: u64,
    #[serde(default)]
    pub percentage: Option<f64>,
}

/// The authenticated user echoed by the auth endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Payloads (requests) ──────────────────────────────────────────────

/// Body for `POST /people` and `PUT /people/:id`. Absent fields are
/// omitted from the wire.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_secret"
    )]
    pub password: Option<SecretString>,
}

/// Body for `POST /subjects` and `PUT /subjects/:id`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<RecordId>,
}

/// One status event as submitted to `POST /events` or inside a bulk batch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    pub person_id: RecordId,
    pub subject_id: RecordId,
    pub date: NaiveDate,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_by: Option<RecordId>,
}

/// Body for `POST /events/bulk`: one round trip, ordered records.
#[derive(Debug, Clone, Serialize)]
pub struct BulkEventPayload<'a> {
    pub records: &'a [EventPayload],
}

/// Query for `GET /events/stats`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<RecordId>,
}

/// Body for `POST /auth/{role}/login`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Only the secondary role logs in with its person identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    pub email: String,
    #[serde(serialize_with = "serialize_secret")]
    pub password: SecretString,
}

/// Body for `POST /auth/{role}/signup`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub identifier: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(serialize_with = "serialize_secret")]
    pub password: SecretString,
}

// ── serde helpers ────────────────────────────────────────────────────

/// Secrets are write-only: they leave the process on the wire and nowhere else.
fn serialize_secret<S, T>(secret: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: AsSecret,
{
    match secret.as_secret() {
        Some(s) => serializer.serialize_str(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}

trait AsSecret {
    fn as_secret(&self) -> Option<&SecretString>;
}

impl AsSecret for SecretString {
    fn as_secret(&self) -> Option<&SecretString> {
        Some(self)
    }
}

impl AsSecret for Option<SecretString> {
    fn as_secret(&self) -> Option<&SecretString> {
        self.as_ref()
    }
}

/// Accepts both `2024-03-01` and full timestamps (`2024-03-01T00:00:00.000Z`),
/// keeping only the calendar day.
fn deserialize_day<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let day = raw.get(..10).unwrap_or(&raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(serde::de::Error::custom)
}
