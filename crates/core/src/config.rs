//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Indexer daemon configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IndexerConfig {
    /// Root directory of the volume to index (required).
    #[serde(default)]
    pub volume: Option<PathBuf>,
    /// Volume id override. Read from the volume root attributes when unset.
    #[serde(default)]
    pub volume_id: Option<String>,
    /// Namespace override. Read from the volume root attributes when unset.
    #[serde(default)]
    pub namespace: Option<String>,
    /// Seconds between the starts of two passes.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Seconds between two "running" progress reports.
    #[serde(default = "default_report_interval_secs")]
    pub report_interval_secs: u64,
    /// Maximum chunks processed per second (0 disables throttling).
    #[serde(default = "default_chunks_per_second")]
    pub chunks_per_second: u32,
    /// Migrate legacy attributes to the consolidated layout while indexing.
    #[serde(default)]
    pub convert_chunks: bool,
}

fn default_interval_secs() -> u64 {
    300
}

fn default_report_interval_secs() -> u64 {
    3600
}

fn default_chunks_per_second() -> u32 {
    30
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            volume: None,
            volume_id: None,
            namespace: None,
            interval_secs: default_interval_secs(),
            report_interval_secs: default_report_interval_secs(),
            chunks_per_second: default_chunks_per_second(),
            convert_chunks: false,
        }
    }
}

impl IndexerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn report_interval(&self) -> Duration {
        Duration::from_secs(self.report_interval_secs)
    }

    /// The configured volume root, or a configuration error.
    pub fn volume_root(&self) -> crate::Result<&PathBuf> {
        self.volume
            .as_ref()
            .ok_or_else(|| crate::Error::Config("no volume specified for indexer".to_string()))
    }

    pub fn validate(&self) -> crate::Result<()> {
        let root = self.volume_root()?;
        if root.as_os_str().is_empty() {
            return Err(crate::Error::Config(
                "indexer.volume cannot be empty".to_string(),
            ));
        }
        if self.interval_secs == 0 {
            return Err(crate::Error::Config(
                "indexer.interval_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Reverse-directory service client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RdirConfig {
    /// Base URL of the reverse-directory service.
    #[serde(default = "default_rdir_url")]
    pub url: String,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Idle connections kept per host.
    #[serde(default = "default_pool_connections")]
    pub pool_connections: usize,
}

fn default_rdir_url() -> String {
    "http://127.0.0.1:6300".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_pool_connections() -> usize {
    10
}

impl Default for RdirConfig {
    fn default() -> Self {
        Self {
            url: default_rdir_url(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            pool_connections: default_pool_connections(),
        }
    }
}

impl RdirConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> crate::Result<()> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(crate::Error::Config("rdir.url cannot be empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(crate::Error::Config(format!(
                "rdir.url must be an http(s) URL, got {url}"
            )));
        }
        Ok(())
    }
}

/// Complete application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub indexer: IndexerConfig,
    #[serde(default)]
    pub rdir: RdirConfig,
}

impl AppConfig {
    pub fn validate(&self) -> crate::Result<()> {
        self.indexer.validate()?;
        self.rdir.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexer_config_defaults() {
        let config = IndexerConfig::default();
        assert_eq!(config.interval_secs, 300);
        assert_eq!(config.report_interval_secs, 3600);
        assert_eq!(config.chunks_per_second, 30);
        assert!(!config.convert_chunks);
        assert!(config.volume.is_none());
    }

    #[test]
    fn test_missing_volume_is_configuration_error() {
        let config = AppConfig::default();
        match config.validate() {
            Err(crate::Error::Config(msg)) => assert!(msg.contains("no volume")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_deserialize_partial_config() {
        let json = r#"{"indexer": {"volume": "/srv/vol1", "convert_chunks": true}}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.indexer.volume, Some(PathBuf::from("/srv/vol1")));
        assert!(config.indexer.convert_chunks);
        assert_eq!(config.indexer.chunks_per_second, 30);
        assert_eq!(config.rdir.url, "http://127.0.0.1:6300");
        assert_eq!(config.rdir.pool_connections, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = IndexerConfig {
            volume: Some(PathBuf::from("/srv/vol1")),
            interval_secs: 0,
            ..IndexerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rdir_url_must_be_http() {
        let mut config = RdirConfig::default();
        assert!(config.validate().is_ok());
        config.url = "127.0.0.1:6300".to_string();
        assert!(config.validate().is_err());
        config.url = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_rate_is_allowed() {
        let config = IndexerConfig {
            volume: Some(PathBuf::from("/srv/vol1")),
            chunks_per_second: 0,
            ..IndexerConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
