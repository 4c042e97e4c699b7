//! Mock server configuration.

use crate::matching::MatchPolicy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MockConfig {
    /// Address mock ports bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Response selection when several interactions match one request
    #[serde(default)]
    pub match_policy: MatchPolicy,
    /// Ports started by the `toss-mock` binary on launch
    #[serde(default)]
    pub ports: Vec<u16>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            match_policy: MatchPolicy::default(),
            ports: Vec::new(),
        }
    }
}
