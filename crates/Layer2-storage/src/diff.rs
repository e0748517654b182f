//! Diff engine - 들어온 설정 맵을 store 캐시에 반영하고 변경 목록 계산
//!
//! 이전 키 집합과 새 맵을 한 번 비교해서 모든 키를 정확히 하나로 분류합니다:
//! ADD / MODIFY / DELETE / 변화 없음. 변화가 없어도 upsert는 수행되어 만료가 갱신됩니다.

use crate::event::{ChangeMap, ConfigChange};
use crate::store::ConfigStore;
use apollo_foundation::ConfigValue;
use std::collections::{HashMap, HashSet};
use tracing::{debug, error};

/// 설정 맵을 store에 적용하고 변경 목록 반환
///
/// `configurations`가 `None`이고 캐시가 비어 있으면 아무 것도 하지 않으며 초기화도
/// 표시하지 않습니다. 빈 맵은 초기화를 완료시킵니다.
pub(crate) fn apply(
    store: &ConfigStore,
    configurations: Option<&HashMap<String, ConfigValue>>,
    expire_seconds: u64,
) -> ChangeMap {
    let namespace = store.namespace();
    let Some(cache) = store.cache() else {
        error!(namespace = %namespace, "Namespace cache does not exist, skip update");
        return ChangeMap::new();
    };

    let incoming_empty = configurations.map_or(true, |c| c.is_empty());
    if incoming_empty && cache.entry_count() == 0 {
        if configurations.is_some() {
            store.mark_initialized();
        }
        return ChangeMap::new();
    }

    let mut old_keys = HashSet::new();
    cache.range(&mut |key, _| {
        old_keys.insert(key.to_string());
        true
    });

    let mut changes = ChangeMap::new();

    for (key, value) in configurations.into_iter().flatten() {
        if old_keys.remove(key) {
            match cache.get(key) {
                Some(old) if old == *value => {}
                Some(old) => {
                    changes.insert(key.clone(), ConfigChange::modified(old, value.clone()));
                }
                // expired between snapshot and read
                None => {
                    changes.insert(key.clone(), ConfigChange::added(value.clone()));
                }
            }
        } else {
            changes.insert(key.clone(), ConfigChange::added(value.clone()));
        }

        if let Err(e) = cache.set(key, value.clone(), expire_seconds) {
            error!(
                namespace = %namespace,
                key = %key,
                error = %e,
                retryable = e.is_retryable(),
                "Failed to write config value"
            );
        }
    }

    for key in old_keys {
        if let Some(old) = cache.get(&key) {
            changes.insert(key.clone(), ConfigChange::deleted(old));
        }
        cache.del(&key);
    }

    store.mark_initialized();

    debug!(namespace = %namespace, changes = changes.len(), "Config diff applied");
    changes
}
