//! Change events - 원격 업데이트 한 번이 만들어내는 이벤트
//!
//! - [`ChangeEvent`]: 키별 ADD/MODIFY/DELETE 목록 (변경이 있을 때만 발행)
//! - [`FullChangeEvent`]: 해당 시점의 전체 설정 스냅샷 (매 업데이트마다 발행)

use apollo_foundation::ConfigValue;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 키 하나의 변경 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Added,
    Modified,
    Deleted,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Deleted => "deleted",
        }
    }
}

/// 키 하나의 변경 내용
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "changeType",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum ConfigChange {
    Added {
        new_value: ConfigValue,
    },
    Modified {
        old_value: ConfigValue,
        new_value: ConfigValue,
    },
    Deleted {
        old_value: ConfigValue,
    },
}

impl ConfigChange {
    pub fn added(new_value: ConfigValue) -> Self {
        Self::Added { new_value }
    }

    pub fn modified(old_value: ConfigValue, new_value: ConfigValue) -> Self {
        Self::Modified {
            old_value,
            new_value,
        }
    }

    pub fn deleted(old_value: ConfigValue) -> Self {
        Self::Deleted { old_value }
    }

    pub fn change_type(&self) -> ChangeType {
        match self {
            Self::Added { .. } => ChangeType::Added,
            Self::Modified { .. } => ChangeType::Modified,
            Self::Deleted { .. } => ChangeType::Deleted,
        }
    }

    pub fn old_value(&self) -> Option<&ConfigValue> {
        match self {
            Self::Added { .. } => None,
            Self::Modified { old_value, .. } | Self::Deleted { old_value } => Some(old_value),
        }
    }

    pub fn new_value(&self) -> Option<&ConfigValue> {
        match self {
            Self::Added { new_value } | Self::Modified { new_value, .. } => Some(new_value),
            Self::Deleted { .. } => None,
        }
    }
}

/// 키 → 변경 내용
pub type ChangeMap = HashMap<String, ConfigChange>;

/// 증분 변경 이벤트
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    pub namespace: String,

    /// 이벤트를 태그할 때 읽은 notification 시퀀스
    pub notification_id: i64,

    pub changes: ChangeMap,

    pub timestamp: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn new(namespace: impl Into<String>, notification_id: i64, changes: ChangeMap) -> Self {
        Self {
            namespace: namespace.into(),
            notification_id,
            changes,
            timestamp: Utc::now(),
        }
    }

    /// 특정 종류의 변경 키 목록
    pub fn keys_of(&self, change_type: ChangeType) -> Vec<&str> {
        self.changes
            .iter()
            .filter(|(_, change)| change.change_type() == change_type)
            .map(|(key, _)| key.as_str())
            .collect()
    }
}

/// 전체 스냅샷 이벤트
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullChangeEvent {
    pub namespace: String,

    pub notification_id: i64,

    pub changes: HashMap<String, ConfigValue>,

    pub timestamp: DateTime<Utc>,
}

impl FullChangeEvent {
    pub fn new(
        namespace: impl Into<String>,
        notification_id: i64,
        changes: HashMap<String, ConfigValue>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            notification_id,
            changes,
            timestamp: Utc::now(),
        }
    }
}

// ============================================================================
// ChangeListener Trait
// ============================================================================

/// 설정 변경 리스너
///
/// 두 콜백은 서로 독립적인 task에서 호출되며, 같은 업데이트에 대해서도 호출 순서가
/// 보장되지 않습니다. 같은 리스너를 여러 번 등록하면 등록 횟수만큼 호출됩니다.
#[async_trait]
pub trait ChangeListener: Send + Sync {
    /// 리스너 이름 (디버깅용)
    fn name(&self) -> &str {
        "anonymous"
    }

    /// 증분 변경 수신
    async fn on_change(&self, event: &ChangeEvent);

    /// 전체 스냅샷 수신
    async fn on_newest_change(&self, event: &FullChangeEvent);
}
