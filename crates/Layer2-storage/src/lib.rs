//! # apollo-storage
//!
//! Storage layer for ApolloSync:
//! - Store: namespace 하나의 캐시, one-shot init gate, 타입별 조회
//! - Diff: 업데이트마다 ADD/MODIFY/DELETE 계산
//! - Event: 증분/전체 변경 이벤트와 [`ChangeListener`]
//! - Repository: namespace 매핑, 업데이트 파이프라인, 리스너 전달
//! - Backup: 최신 스냅샷 파일 기록
//!
//! ```text
//! transport ──▶ ConfigRepository::update_apollo_config
//!                  │
//!                  ├─▶ diff ──▶ ConfigStore (KvCache, InitGate)
//!                  ├─▶ ChangeListener × N   (tokio task마다 1개)
//!                  └─▶ FileHandler          (spawn_blocking)
//! ```

pub mod backup;
pub mod convert;
mod diff;
pub mod event;
pub mod gate;
pub mod repository;
pub mod store;

pub use backup::{FileHandler, PropertiesFileHandler};
pub use convert::{parse_bool, ConvertError, FromConfigValue};
pub use event::{ChangeEvent, ChangeListener, ChangeMap, ChangeType, ConfigChange, FullChangeEvent};
pub use gate::InitGate;
pub use repository::{ConfigRepository, RepositoryBuilder, CONFIG_CACHE_EXPIRE_SECS};
pub use store::ConfigStore;
