// ── Domain model ──
//
// Canonical representation of every roster entity. Both vocabularies
// (roster and fleet) read these same types; the alias layer only renames.

pub mod entity_id;
pub mod event;
pub mod person;
pub mod subject;

pub use entity_id::EntityId;
pub use event::{EventSummary, Status, StatusEvent, StatusEventDraft};
pub use person::{Person, PersonDraft};
pub use subject::{Subject, SubjectDraft};
