// ── Local key/value storage ──
//
// One durable string-keyed store backs two concerns: the session
// credential (`token`, `user`) and the last-resort entity collections
// (`people`, `subjects`, `events`). Values are JSON text.

mod fallback;
mod file;
mod memory;

use thiserror::Error;

pub use fallback::FallbackStore;
pub use file::FileStore;
pub use memory::MemoryStore;

/// Store keys shared with the session gate and the auth service.
pub mod keys {
    pub const TOKEN: &str = "token";
    pub const USER: &str = "user";
    pub const CURRENT_PRIMARY: &str = "currentTeacher";
    pub const CURRENT_SECONDARY: &str = "currentStudent";
}

/// Collection names used by the fallback read path.
pub mod collections {
    pub const PEOPLE: &str = "people";
    pub const SUBJECTS: &str = "subjects";
    pub const EVENTS: &str = "events";
}

/// A durable string key/value store.
///
/// Implementations must be safe to share across tasks. A missing key is
/// `Ok(None)`, never an error.
pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot encode {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid store key: {0:?}")]
    InvalidKey(String),
}
