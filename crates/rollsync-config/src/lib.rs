//! Shared configuration for the rollsync CLI.
//!
//! TOML profiles (one per service deployment), layered as defaults →
//! `config.toml` → `ROLLSYNC_*` environment, and translation into
//! `rollsync_core::SyncConfig`. Core never reads these files itself.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use rollsync_core::{ReloadPolicy, SyncConfig, TlsMode};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named service profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub reload_policy: ReloadPolicy,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            reload_policy: ReloadPolicy::default(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// One service deployment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Service root (e.g. "https://roster.example.com"). `/api` is
    /// appended by the client.
    pub base_url: String,

    /// Where the credential and fallback collections live. Defaults to
    /// a per-profile directory under the platform data dir.
    pub store_dir: Option<PathBuf>,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override the insecure TLS default.
    pub insecure: Option<bool>,

    /// Override the request timeout, in seconds.
    pub timeout: Option<u64>,

    /// Override the reload policy.
    pub reload_policy: Option<ReloadPolicy>,
}

impl Profile {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            store_dir: None,
            ca_cert: None,
            insecure: None,
            timeout: None,
            reload_policy: None,
        }
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "rollsync", "rollsync")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default local store directory for `profile_name`.
pub fn default_store_dir(profile_name: &str) -> PathBuf {
    project_dirs()
        .map_or_else(dirs_fallback, |dirs| dirs.data_dir().to_path_buf())
        .join("store")
        .join(profile_name)
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("rollsync");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file, still layering `ROLLSYNC_*` on top.
/// Nested keys use `__`: `ROLLSYNC_DEFAULTS__TIMEOUT=5`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("ROLLSYNC_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Resolution ──────────────────────────────────────────────────────

impl Config {
    /// Pick `name`, else the configured default profile.
    pub fn profile(&self, name: Option<&str>) -> Result<(String, &Profile), ConfigError> {
        let name = name
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into());
        self.profiles
            .get(&name)
            .map(|p| (name.clone(), p))
            .ok_or(ConfigError::UnknownProfile { name })
    }
}

/// Build a `SyncConfig` from a profile, falling back to `defaults` for
/// anything the profile leaves unset.
pub fn profile_to_sync_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<SyncConfig, ConfigError> {
    let base_url: url::Url = profile
        .base_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "base_url".into(),
            reason: format!("invalid URL: {}", profile.base_url),
        })?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    Ok(SyncConfig {
        base_url,
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        reload_policy: profile.reload_policy.unwrap_or(defaults.reload_policy),
    })
}

/// The store directory a profile resolves to.
pub fn profile_store_dir(profile_name: &str, profile: &Profile) -> PathBuf {
    profile
        .store_dir
        .clone()
        .unwrap_or_else(|| default_store_dir(profile_name))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn file_then_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                default_profile = "campus"

                [defaults]
                timeout = 10

                [profiles.campus]
                base_url = "https://roster.example.com"
                reload_policy = "discard-stale"
                "#,
            )?;
            jail.set_env("ROLLSYNC_DEFAULTS__TIMEOUT", "5");

            let cfg = load_config_from(Path::new("config.toml")).map_err(|e| e.to_string())?;
            assert_eq!(cfg.defaults.timeout, 5);
            assert_eq!(cfg.defaults.output, "table");

            let (name, profile) = cfg.profile(None).map_err(|e| e.to_string())?;
            assert_eq!(name, "campus");

            let sync = profile_to_sync_config(profile, &cfg.defaults).map_err(|e| e.to_string())?;
            assert_eq!(sync.base_url.as_str(), "https://roster.example.com/");
            assert_eq!(sync.timeout, Duration::from_secs(5));
            assert_eq!(sync.reload_policy, ReloadPolicy::DiscardStale);
            assert!(matches!(sync.tls, TlsMode::System));
            Ok(())
        });
    }

    #[test]
    fn missing_file_is_defaults() {
        Jail::expect_with(|_| {
            let cfg = load_config_from(Path::new("absent.toml")).map_err(|e| e.to_string())?;
            assert_eq!(cfg.default_profile.as_deref(), Some("default"));
            assert!(cfg.profiles.is_empty());
            Ok(())
        });
    }

    #[test]
    fn unknown_profile_is_an_error() {
        let cfg = Config::default();
        assert!(matches!(
            cfg.profile(Some("nope")),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = profile_to_sync_config(&Profile::new("not a url"), &Defaults::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }));
    }

    #[test]
    fn insecure_and_store_dir_overrides() {
        let mut profile = Profile::new("http://localhost:5000");
        profile.insecure = Some(true);
        profile.store_dir = Some(PathBuf::from("/tmp/rollsync-test"));
        let sync = profile_to_sync_config(&profile, &Defaults::default()).unwrap();
        assert!(matches!(sync.tls, TlsMode::DangerAcceptInvalid));
        assert_eq!(
            profile_store_dir("x", &profile),
            PathBuf::from("/tmp/rollsync-test")
        );
        assert!(profile_store_dir("lab", &Profile::new("http://h")).ends_with("store/lab"));
    }

    #[test]
    fn save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");
        let mut cfg = Config::default();
        cfg.profiles
            .insert("default".into(), Profile::new("https://roster.example.com"));
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(
            loaded.profiles["default"].base_url,
            "https://roster.example.com"
        );
    }
}
