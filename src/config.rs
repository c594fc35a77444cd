//! Runtime configuration

use serde::{Deserialize, Serialize};

use crate::model::FitOptions;

/// Tunables for a [`GraphEngine`](crate::engine::GraphEngine) session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of forwarding hops a single push may take before the
    /// remaining propagation is dropped
    pub max_hops: u32,
    /// Default training options handed to newly built core modules
    pub fit: FitOptions,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_hops: 100,
            fit: FitOptions::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_hops, 100);
        assert_eq!(config.fit.epochs, 500);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config = EngineConfig::from_json(r#"{"max_hops": 16}"#).unwrap();
        assert_eq!(config.max_hops, 16);
        assert_eq!(config.fit.batch_size, 24);
    }
}
