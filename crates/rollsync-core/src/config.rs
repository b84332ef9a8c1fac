// ── Runtime configuration for the synchronizer ──
//
// These types describe *how* to reach the service. They carry no file
// paths and never read from disk; the config crate builds them.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use rollsync_api::{TlsMode, TransportConfig};

/// Everything a [`Synchronizer`](crate::Synchronizer) needs at startup.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Service root, e.g. `https://roster.example.com`. The `/api`
    /// prefix is appended by the client.
    pub base_url: Url,
    pub tls: TlsMode,
    pub timeout: Duration,
    pub reload_policy: ReloadPolicy,
}

impl SyncConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            tls: TlsMode::default(),
            timeout: Duration::from_secs(30),
            reload_policy: ReloadPolicy::default(),
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls.clone(),
            timeout: self.timeout,
        }
    }
}

/// What to do with a reload that finishes after a newer one was started.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ReloadPolicy {
    /// Every completed reload is applied, in completion order.
    #[default]
    LastToComplete,
    /// A completed reload is dropped when a newer one has already started.
    DiscardStale,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn policy_parses_kebab_case() {
        assert_eq!(
            "discard-stale".parse::<ReloadPolicy>().ok(),
            Some(ReloadPolicy::DiscardStale)
        );
        assert_eq!(ReloadPolicy::default().to_string(), "last-to-complete");
    }
}
