//! Notification registry - namespace별 알림 시퀀스
//!
//! long-poll 전송 계층이 서버의 notification id를 기록하고, repository는 이벤트에
//! 태그를 붙일 때 읽기만 합니다.

use dashmap::DashMap;
use std::collections::HashMap;

/// namespace 구분자
pub const NAMESPACE_SEPARATOR: char = ',';

/// 아직 알림을 받지 못한 namespace의 시퀀스
pub const DEFAULT_NOTIFICATION_ID: i64 = -1;

/// 쉼표로 구분된 namespace 목록 분리
///
/// 앞뒤 공백은 제거하고, 빈 항목과 중복은 건너뜁니다. 순서는 처음 등장한 순서입니다.
pub fn split_namespaces(list: &str) -> Vec<String> {
    let mut namespaces: Vec<String> = Vec::new();
    for namespace in list.split(NAMESPACE_SEPARATOR).map(str::trim) {
        if namespace.is_empty() || namespaces.iter().any(|n| n == namespace) {
            continue;
        }
        namespaces.push(namespace.to_string());
    }
    namespaces
}

/// namespace → notification id
#[derive(Debug, Default)]
pub struct NotificationRegistry {
    notifications: DashMap<String, i64>,
}

impl NotificationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// namespace 목록으로 초기화 (모두 `DEFAULT_NOTIFICATION_ID`)
    pub fn from_namespaces(namespaces: &str) -> Self {
        let registry = Self::new();
        registry.seed(namespaces);
        registry
    }

    /// 아직 없는 namespace를 `DEFAULT_NOTIFICATION_ID`로 등록
    pub fn seed(&self, namespaces: &str) {
        for namespace in split_namespaces(namespaces) {
            self.notifications
                .entry(namespace)
                .or_insert(DEFAULT_NOTIFICATION_ID);
        }
    }

    /// 시퀀스 조회 (모르는 namespace는 0)
    pub fn get_notify(&self, namespace: &str) -> i64 {
        self.notifications
            .get(namespace)
            .map(|id| *id)
            .unwrap_or(0)
    }

    /// 시퀀스 갱신
    pub fn update_notify(&self, namespace: &str, notification_id: i64) {
        self.notifications
            .insert(namespace.to_string(), notification_id);
    }

    pub fn contains(&self, namespace: &str) -> bool {
        self.notifications.contains_key(namespace)
    }

    /// 현재 상태 복사본
    pub fn snapshot(&self) -> HashMap<String, i64> {
        self.notifications
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }
}
