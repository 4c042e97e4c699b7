//! Configuration types for the harness.

mod client;
mod mock;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use client::ClientConfig;
pub use mock::MockConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HarnessConfig {
    #[serde(default)]
    pub mock: MockConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

impl HarnessConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let contents = std::fs::read_to_string(path)?;
        let config: HarnessConfig = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.mock.host.trim().is_empty() {
            anyhow::bail!("mock.host must not be empty");
        }

        if self.mock.host.parse::<std::net::IpAddr>().is_err() && self.mock.host != "localhost" {
            anyhow::bail!(
                "mock.host must be an IP address or 'localhost', got '{}'",
                self.mock.host
            );
        }

        if self.client.timeout_ms == Some(0) {
            anyhow::bail!("client.timeout_ms must be greater than zero (use null to disable)");
        }

        let mut seen = std::collections::HashSet::new();
        for port in &self.mock.ports {
            if !seen.insert(port) {
                anyhow::bail!("mock.ports lists port {port} more than once");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::MatchPolicy;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn test_parse_config() {
        let yaml = r#"
mock:
  host: 127.0.0.1
  match_policy: first-match-wins
  ports: [9393, 9394]
client:
  timeout_ms: 5000
  pool_idle_per_host: 2
"#;

        let config: HarnessConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.mock.host, "127.0.0.1");
        assert_eq!(config.mock.match_policy, MatchPolicy::FirstMatchWins);
        assert_eq!(config.mock.ports, vec![9393, 9394]);
        assert_eq!(config.client.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.client.pool_idle_per_host, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config: HarnessConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.mock.host, "0.0.0.0");
        assert_eq!(config.mock.match_policy, MatchPolicy::LastMatchWins);
        assert!(config.mock.ports.is_empty());
        assert_eq!(config.client.timeout_ms, Some(30_000));
        assert_eq!(config.client.pool_idle_per_host, 0);
    }

    #[test]
    fn test_null_timeout_disables_it() {
        let config: HarnessConfig = serde_yaml::from_str("client:\n  timeout_ms: null\n").unwrap();
        assert_eq!(config.client.timeout(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = HarnessConfig::default();
        config.client.timeout_ms = Some(0);
        assert!(config.validate().is_err());

        let mut config = HarnessConfig::default();
        config.mock.host = "not a host".to_string();
        assert!(config.validate().is_err());

        let mut config = HarnessConfig::default();
        config.mock.ports = vec![8080, 8080];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("8080"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "mock:\n  ports: [7001]").unwrap();
        let config = HarnessConfig::from_file(file.path()).unwrap();
        assert_eq!(config.mock.ports, vec![7001]);
    }

    #[test]
    fn test_from_file_missing() {
        assert!(HarnessConfig::from_file("/nonexistent/toss.yaml").is_err());
    }
}
