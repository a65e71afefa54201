//! Sync configuration.
//!
//! The concrete transport is selected via configuration, never via
//! inheritance or ambient globals; `scandock-sync` maps a [`SyncConfig`]
//! to a channel implementation.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::session::DEFAULT_IMAGE_CAP;

/// Which transport strategy carries image events for a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    /// Server-side push on append; consumers share the producing process.
    #[default]
    InProcess,
    /// Timer-driven pull against a shared in-process store.
    Poll,
    /// Same-device sharing through a filesystem directory, observed by
    /// polling. Cross-process but not cross-device.
    LocalDir,
    /// Pull against a remote HTTP store.
    Remote,
}

/// Deployment configuration for the sync core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Transport strategy
    #[serde(default)]
    pub transport: TransportKind,
    /// Poll interval in milliseconds (observed deployments use 500-2000)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Per-session image cap; `None` disables eviction
    #[serde(default = "default_image_cap")]
    pub image_cap: Option<usize>,
    /// Base directory for the `local_dir` transport
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Base URL for the `remote` transport, e.g. `http://192.168.1.2:3000`
    #[serde(default)]
    pub remote_base_url: Option<String>,
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_image_cap() -> Option<usize> {
    Some(DEFAULT_IMAGE_CAP)
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            transport: TransportKind::default(),
            poll_interval_ms: default_poll_interval_ms(),
            image_cap: default_image_cap(),
            data_dir: None,
            remote_base_url: None,
        }
    }
}

impl SyncConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Loads a configuration file from disk.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// The poll interval as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.transport, TransportKind::InProcess);
        assert_eq!(config.poll_interval(), Duration::from_millis(1000));
        assert_eq!(config.image_cap, Some(20));
    }

    #[test]
    fn test_parse_toml() {
        let config = SyncConfig::from_toml_str(
            r#"
            transport = "remote"
            poll_interval_ms = 500
            remote_base_url = "http://192.168.1.2:3000"
            "#,
        )
        .unwrap();

        assert_eq!(config.transport, TransportKind::Remote);
        assert_eq!(config.poll_interval_ms, 500);
        assert_eq!(
            config.remote_base_url.as_deref(),
            Some("http://192.168.1.2:3000")
        );
        // Unspecified fields fall back to defaults.
        assert_eq!(config.image_cap, Some(20));
    }

    #[test]
    fn test_unbounded_cap() {
        // TOML has no null; an explicit 0 is not used, absence of the key
        // means default, so unbounded is expressed in code.
        let config = SyncConfig {
            image_cap: None,
            ..Default::default()
        };
        assert!(config.image_cap.is_none());
    }

    #[test]
    fn test_invalid_toml_is_serialization_error() {
        let err = SyncConfig::from_toml_str("transport = 12").unwrap_err();
        assert!(err.is_serialization());
    }
}
