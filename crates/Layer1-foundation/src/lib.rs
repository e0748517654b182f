//! # apollo-foundation
//!
//! Foundation layer for ApolloSync:
//! - Error: 공통 에러 타입
//! - Value: 캐시에 저장되는 설정 값 (`ConfigValue`)
//! - Cache: namespace별 KV 캐시 계약과 기본 in-memory 구현
//! - Config: AppConfig, notification registry, 원격 payload
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  apollo-storage (ConfigRepository / ConfigStore)        │
//! │                     │                                   │
//! │          ┌──────────┴──────────┐                        │
//! │          ▼                     ▼                        │
//! │   CacheFactory ──▶ KvCache   AppConfig                  │
//! │   (MemoryCache)              (notifications, conn slot) │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod value;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Value
// ============================================================================
pub use value::ConfigValue;

// ============================================================================
// Cache (KV 캐시)
// ============================================================================
pub use cache::{CacheFactory, KvCache, MemoryCache, MemoryCacheConfig, MemoryCacheFactory};

// ============================================================================
// Config (설정)
// ============================================================================
pub use config::{
    split_namespaces, ApolloConfig, ApolloConnConfig, AppConfig, NotificationRegistry,
    APP_CONFIG_FILE, APP_CONFIG_FILE_ENV, DEFAULT_CLUSTER, DEFAULT_NAMESPACE,
    DEFAULT_NOTIFICATION_ID, NAMESPACE_SEPARATOR,
};
