// ── Fleet vocabulary ──
//
// The roster data is also presented as drivers, routes, and telemetry.
// Nothing here owns state: every fleet operation is generated as a
// delegation to its canonical counterpart, and every fleet collection
// is the canonical `Arc` itself.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use secrecy::SecretString;

use rollsync_api::UserProfile;

use crate::auth::{Authenticator, Registration};
use crate::error::CoreError;
use crate::model::{
    EntityId, EventSummary, Person, PersonDraft, Status, StatusEvent, StatusEventDraft, Subject,
    SubjectDraft,
};
use crate::sync::{DashboardSummary, Snapshot, Synchronizer};

/// A driver draft is a person draft.
pub type DriverDraft = PersonDraft;
/// A route draft is a subject draft.
pub type RouteDraft = SubjectDraft;
/// A telemetry draft is a status event draft.
pub type TelemetryDraft = StatusEventDraft;

/// Generates alias methods on `$target` that forward to
/// `self.target().$canonical(..)`, plus a `(alias, canonical)` name table.
/// A mapping that names a missing canonical method does not compile.
macro_rules! alias_table {
    (
        $target:ty, $table:ident;
        plain {
            $( $palias:ident => $pcanon:ident ( $( $parg:ident : $pty:ty ),* ) -> $pret:ty; )*
        }
        async {
            $( $aalias:ident => $acanon:ident ( $( $aarg:ident : $aty:ty ),* ) -> $aret:ty; )*
        }
    ) => {
        impl $target {
            $(
                #[doc = concat!("Fleet name for `", stringify!($pcanon), "`.")]
                pub fn $palias(&self, $( $parg: $pty ),*) -> $pret {
                    self.target().$pcanon($( $parg ),*)
                }
            )*
            $(
                #[doc = concat!("Fleet name for `", stringify!($acanon), "`.")]
                pub async fn $aalias(&self, $( $aarg: $aty ),*) -> $aret {
                    self.target().$acanon($( $aarg ),*).await
                }
            )*
        }

        /// `(fleet name, canonical name)` for every generated alias.
        pub const $table: &[(&str, &str)] = &[
            $( (stringify!($palias), stringify!($pcanon)), )*
            $( (stringify!($aalias), stringify!($acanon)), )*
        ];
    };
}

/// The synchronizer under the fleet vocabulary.
#[derive(Debug, Clone)]
pub struct FleetView {
    sync: Synchronizer,
}

impl FleetView {
    pub(crate) fn new(sync: Synchronizer) -> Self {
        Self { sync }
    }

    /// The canonical synchronizer behind this view.
    pub fn canonical(&self) -> &Synchronizer {
        &self.sync
    }

    fn target(&self) -> &Synchronizer {
        &self.sync
    }
}

alias_table! {
    FleetView, OPERATION_ALIASES;
    plain {
        drivers => people() -> Snapshot<Person>;
        routes => subjects() -> Snapshot<Subject>;
        telemetry_records => events() -> Snapshot<StatusEvent>;
        fleet_summary => summary(day: NaiveDate) -> DashboardSummary;
    }
    async {
        add_driver => add_person(draft: DriverDraft) -> Result<Option<Person>, CoreError>;
        update_driver => update_person(id: &EntityId, draft: DriverDraft) -> Result<(), CoreError>;
        delete_driver => remove_person(id: &EntityId) -> Result<(), CoreError>;
        get_driver => get_person(id: &EntityId) -> Result<Option<Person>, CoreError>;
        add_route => add_subject(draft: RouteDraft) -> Result<Option<Subject>, CoreError>;
        update_route => update_subject(id: &EntityId, draft: RouteDraft) -> Result<(), CoreError>;
        delete_route => remove_subject(id: &EntityId) -> Result<(), CoreError>;
        get_route => get_subject(id: &EntityId) -> Result<Option<Subject>, CoreError>;
        add_telemetry_record => record_event(draft: TelemetryDraft) -> Result<Arc<StatusEvent>, CoreError>;
        add_bulk_telemetry => record_events(drafts: Vec<TelemetryDraft>) -> Result<Vec<Arc<StatusEvent>>, CoreError>;
        delete_telemetry_record => remove_event(id: &EntityId) -> Result<(), CoreError>;
        driver_telemetry => person_events(driver: &EntityId, route: Option<&EntityId>) -> Vec<StatusEvent>;
        telemetry_stats => event_stats(driver: &EntityId, route: Option<&EntityId>) -> EventSummary;
        route_telemetry => events_for_subject(route: &EntityId) -> Result<Vec<StatusEvent>, CoreError>;
        telemetry_on => events_on(day: NaiveDate) -> Result<Vec<StatusEvent>, CoreError>;
    }
}

impl Authenticator {
    fn target(&self) -> &Self {
        self
    }
}

alias_table! {
    Authenticator, AUTH_ALIASES;
    plain {}
    async {
        fleet_login => login_primary(email: &str, password: SecretString) -> Result<Option<UserProfile>, CoreError>;
        fleet_signup => signup_primary(registration: Registration) -> Result<(), CoreError>;
        driver_login => login_secondary(identifier: &str, email: &str, password: SecretString) -> Result<Option<UserProfile>, CoreError>;
    }
}

/// `(entity, fleet field, canonical field)` for every renamed input field.
/// Drafts accept the fleet name and payloads only ever carry the
/// canonical one.
pub const FIELD_ALIASES: &[(&str, &str, &str)] = &[
    ("person", "studentId", "identifier"),
    ("person", "driverId", "identifier"),
    ("person", "semester", "level"),
    ("subject", "subjectCode", "code"),
    ("subject", "routeCode", "code"),
    ("subject", "subjectName", "name"),
    ("subject", "routeName", "name"),
    ("subject", "teacherId", "ownerId"),
    ("subject", "managerId", "ownerId"),
    ("event", "studentId", "personId"),
    ("event", "driverId", "personId"),
    ("event", "routeId", "subjectId"),
    ("event", "markedBy", "recordedBy"),
    ("event", "teacherId", "recordedBy"),
];

/// Fleet label for a status (`on-duty`, `off-duty`, `delayed`).
pub fn fleet_status(status: Status) -> &'static str {
    match status {
        Status::Present => "on-duty",
        Status::Absent => "off-duty",
        Status::Late => "delayed",
    }
}

// ── Read projections ────────────────────────────────────────────────

/// A person read through fleet field names. Borrows, never copies.
#[derive(Debug, Clone, Copy)]
pub struct Driver<'a>(&'a Person);

impl<'a> Driver<'a> {
    pub fn person(&self) -> &'a Person {
        self.0
    }
    pub fn id(&self) -> Option<&'a EntityId> {
        self.0.id.as_ref()
    }
    pub fn driver_id(&self) -> &'a str {
        &self.0.identifier
    }
    pub fn name(&self) -> &'a str {
        &self.0.name
    }
    pub fn email(&self) -> Option<&'a str> {
        self.0.email.as_deref()
    }
    pub fn phone(&self) -> Option<&'a str> {
        self.0.phone.as_deref()
    }
    pub fn department(&self) -> Option<&'a str> {
        self.0.department.as_deref()
    }
    pub fn level(&self) -> Option<u32> {
        self.0.level
    }
}

impl<'a> From<&'a Person> for Driver<'a> {
    fn from(p: &'a Person) -> Self {
        Self(p)
    }
}

/// A subject read through fleet field names.
#[derive(Debug, Clone, Copy)]
pub struct Route<'a>(&'a Subject);

impl<'a> Route<'a> {
    pub fn subject(&self) -> &'a Subject {
        self.0
    }
    pub fn id(&self) -> Option<&'a EntityId> {
        self.0.id.as_ref()
    }
    pub fn route_code(&self) -> &'a str {
        &self.0.code
    }
    pub fn route_name(&self) -> &'a str {
        &self.0.name
    }
    pub fn credits(&self) -> Option<u32> {
        self.0.credits
    }
    pub fn department(&self) -> Option<&'a str> {
        self.0.department.as_deref()
    }
    pub fn manager_id(&self) -> Option<&'a EntityId> {
        self.0.owner_id.as_ref()
    }
}

impl<'a> From<&'a Subject> for Route<'a> {
    fn from(s: &'a Subject) -> Self {
        Self(s)
    }
}

/// A status event read as a telemetry record.
#[derive(Debug, Clone, Copy)]
pub struct TelemetryRecord<'a>(&'a StatusEvent);

impl<'a> TelemetryRecord<'a> {
    pub fn event(&self) -> &'a StatusEvent {
        self.0
    }
    pub fn id(&self) -> Option<&'a EntityId> {
        self.0.id.as_ref()
    }
    pub fn driver_id(&self) -> &'a EntityId {
        &self.0.person_id
    }
    pub fn route_id(&self) -> &'a EntityId {
        &self.0.subject_id
    }
    pub fn date(&self) -> NaiveDate {
        self.0.date
    }
    pub fn status(&self) -> &'static str {
        fleet_status(self.0.status)
    }
    pub fn marked_by(&self) -> Option<&'a EntityId> {
        self.0.recorded_by.as_ref()
    }
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.0.created_at
    }
}

impl<'a> From<&'a StatusEvent> for TelemetryRecord<'a> {
    fn from(e: &'a StatusEvent) -> Self {
        Self(e)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use chrono::Utc;
    use serde_json::{Value, json};

    use super::*;
    use crate::convert;

    #[test]
    fn operation_aliases_are_unique_and_renamed() {
        let aliases: HashSet<_> = OPERATION_ALIASES
            .iter()
            .chain(AUTH_ALIASES)
            .map(|(alias, _)| *alias)
            .collect();
        assert_eq!(aliases.len(), OPERATION_ALIASES.len() + AUTH_ALIASES.len());
        assert!(
            OPERATION_ALIASES
                .iter()
                .chain(AUTH_ALIASES)
                .all(|(alias, canonical)| alias != canonical)
        );
        assert!(OPERATION_ALIASES.contains(&("drivers", "people")));
        assert!(AUTH_ALIASES.contains(&("driver_login", "login_secondary")));
    }

    fn sample(canonical: &str) -> Value {
        match canonical {
            "level" => json!(2),
            "ownerId" | "personId" | "subjectId" | "recordedBy" => json!(5),
            _ => json!("X-1"),
        }
    }

    /// Build the canonical payload a draft written with `alias` produces.
    fn payload_for(entity: &str, alias: &str, value: &Value) -> Value {
        match entity {
            "person" => {
                let draft: PersonDraft = serde_json::from_value(json!({ alias: value })).unwrap();
                serde_json::to_value(convert::enrolment_payload(draft, Utc::now())).unwrap()
            }
            "subject" => {
                let draft: SubjectDraft = serde_json::from_value(json!({ alias: value })).unwrap();
                serde_json::to_value(convert::subject_create_payload(draft)).unwrap()
            }
            "event" => {
                let mut base = json!({
                    "personId": 1,
                    "subjectId": 1,
                    "status": "present",
                    "date": "2024-01-01"
                });
                let obj = base.as_object_mut().unwrap();
                for (e, a, canonical) in FIELD_ALIASES {
                    if *e == "event" && *a == alias {
                        obj.remove(*canonical);
                    }
                }
                obj.insert(alias.to_owned(), value.clone());
                let draft: StatusEventDraft = serde_json::from_value(base).unwrap();
                let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
                serde_json::to_value(convert::event_payload(&draft, today)).unwrap()
            }
            other => panic!("unknown entity {other}"),
        }
    }

    #[test]
    fn every_field_alias_reaches_the_wire_as_canonical() {
        for (entity, alias, canonical) in FIELD_ALIASES {
            let value = sample(canonical);
            let payload = payload_for(entity, alias, &value);
            assert_eq!(
                payload.get(*canonical),
                Some(&value),
                "{entity}.{alias} should become {canonical}: {payload}"
            );
            assert!(
                payload.get(*alias).is_none(),
                "{entity}.{alias} leaked onto the wire: {payload}"
            );
        }
    }

    #[test]
    fn projections_read_the_same_record() {
        let person: Person =
            serde_json::from_str(r#"{"id":3,"identifier":"D3","name":"Cy","department":"North"}"#)
                .unwrap();
        let driver = Driver::from(&person);
        assert!(std::ptr::eq(driver.person(), &person));
        assert_eq!(driver.driver_id(), "D3");
        assert_eq!(driver.department(), Some("North"));

        let event: StatusEvent = serde_json::from_str(
            r#"{"personId":3,"subjectId":9,"date":"2024-01-01","status":"late"}"#,
        )
        .unwrap();
        let record = TelemetryRecord::from(&event);
        assert_eq!(record.status(), "delayed");
        assert_eq!(record.route_id(), &EntityId::Number(9));
    }
}
