//! # KV Cache
//!
//! Per-namespace key/value storage behind the config stores.
//!
//! The cache is a pluggable collaborator: the repository only talks to
//! [`KvCache`] and obtains one fresh instance per namespace from a
//! [`CacheFactory`]. Implementations must tolerate concurrent
//! get/set/del/range from many threads.
//!
//! ## Modules
//!
//! - [`config`] - Cache configuration
//! - [`memory`] - Default in-memory cache and factory

pub mod config;
pub mod memory;

use crate::value::ConfigValue;
use crate::Result;
use std::sync::Arc;

pub use config::MemoryCacheConfig;
pub use memory::{MemoryCache, MemoryCacheFactory};

/// Key/value store for one namespace
pub trait KvCache: Send + Sync {
    /// Look up a key
    fn get(&self, key: &str) -> Option<ConfigValue>;

    /// Insert or replace a key, (re)setting its expiry
    fn set(&self, key: &str, value: ConfigValue, expire_seconds: u64) -> Result<()>;

    /// Remove a key, returning whether it existed
    fn del(&self, key: &str) -> bool;

    /// Visit every entry until the visitor returns `false`
    ///
    /// The visitor must not call back into the same cache.
    fn range(&self, visit: &mut dyn FnMut(&str, &ConfigValue) -> bool);

    /// Number of stored entries
    fn entry_count(&self) -> usize;
}

/// Produces a fresh, independent cache per namespace
pub trait CacheFactory: Send + Sync {
    fn create(&self) -> Result<Arc<dyn KvCache>>;
}
