//! Cache configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-namespace in-memory cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryCacheConfig {
    /// Maximum number of entries per namespace (0 = unbounded)
    ///
    /// Writes of new keys beyond this limit are rejected rather than evicting,
    /// since an evicted key would later be reported as deleted.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Expiration applied when a caller passes `0` to `set`
    /// (0 = entries never expire)
    #[serde(default = "default_expire_secs")]
    pub default_expire_secs: u64,
}

// Default value functions
fn default_max_entries() -> usize {
    0
}
fn default_expire_secs() -> u64 {
    0
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            default_expire_secs: default_expire_secs(),
        }
    }
}

impl MemoryCacheConfig {
    /// Create config with an entry limit only
    pub fn with_entries(max_entries: usize) -> Self {
        Self {
            max_entries,
            ..Default::default()
        }
    }

    /// Default expiration as Duration (None = never)
    pub fn default_expire(&self) -> Option<Duration> {
        match self.default_expire_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}
