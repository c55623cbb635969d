//! Engine configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Generation engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Deadline for each external capability call, in seconds
    pub capability_timeout_secs: u64,
    /// Maximum component syntheses in flight per request
    pub max_concurrent_synthesis: usize,
}

impl OrchestratorConfig {
    /// Default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With capability deadline in seconds
    #[inline]
    #[must_use]
    pub fn with_capability_timeout_secs(mut self, secs: u64) -> Self {
        self.capability_timeout_secs = secs;
        self
    }

    /// With synthesis fan-out width
    #[inline]
    #[must_use]
    pub fn with_max_concurrent_synthesis(mut self, max: usize) -> Self {
        self.max_concurrent_synthesis = max;
        self
    }

    /// Capability deadline as a duration
    #[inline]
    #[must_use]
    pub fn capability_timeout(&self) -> Duration {
        Duration::from_secs(self.capability_timeout_secs)
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            capability_timeout_secs: 30,
            max_concurrent_synthesis: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.capability_timeout_secs, 30);
        assert_eq!(config.max_concurrent_synthesis, 4);
        assert_eq!(config.capability_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn config_builder() {
        let config = OrchestratorConfig::new()
            .with_capability_timeout_secs(5)
            .with_max_concurrent_synthesis(8);
        assert_eq!(config.capability_timeout(), Duration::from_secs(5));
        assert_eq!(config.max_concurrent_synthesis, 8);
    }
}
