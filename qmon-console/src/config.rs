use serde::{Deserialize, Serialize};

/// Console configuration, assembled by the embedding agent from its own
/// option handling.
///
/// The broker URLs and heartbeat are consumed by the connection collaborator
/// that feeds [`crate::ConsoleEvent`]s; only `include_auto_delete` changes
/// the behavior of this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Message broker url(s) to monitor.
    #[serde(default = "default_broker_urls")]
    pub broker_urls: Vec<String>,

    /// Heartbeat interval in seconds for the broker connections.
    #[serde(default)]
    pub heartbeat_interval_secs: Option<u64>,

    /// Include auto-delete queues in caching and discovery. Off by default:
    /// ephemeral session queues would otherwise grow the cache unboundedly.
    #[serde(default)]
    pub include_auto_delete: bool,
}

fn default_broker_urls() -> Vec<String> {
    vec!["localhost".to_string()]
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            broker_urls: default_broker_urls(),
            heartbeat_interval_secs: None,
            include_auto_delete: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MonitorConfig::default();
        assert_eq!(config.broker_urls, vec!["localhost".to_string()]);
        assert!(!config.include_auto_delete);
    }
}
