//! Config Repository - namespace → store 매핑, 업데이트 파이프라인, 리스너 레지스트리
//!
//! transport 계층이 fetch에 성공할 때마다 [`ConfigRepository::update_apollo_config`]를
//! 호출합니다. 한 번의 업데이트는 다음 순서로 처리됩니다:
//!
//! 1. 연결 정보 슬롯 갱신
//! 2. diff 적용 (store가 없으면 lazily 생성)
//! 3. notification 시퀀스 조회 후 이벤트 발행 (리스너마다 독립 task)
//! 4. 백업 활성화 시 background에서 파일 기록
//!
//! ## 사용 예시
//!
//! ```ignore
//! let repo = RepositoryBuilder::new()
//!     .expire_seconds(60)
//!     .build("application,db", false)?;
//!
//! repo.add_change_listener(Arc::new(MyListener));
//! repo.update_apollo_config(Some(payload), &app_config);
//!
//! let store = repo.get_config("application").unwrap();
//! let timeout = store.get_int_value("timeout", 30);
//! ```

use crate::backup::{FileHandler, PropertiesFileHandler};
use crate::diff;
use crate::event::{ChangeEvent, ChangeListener, ChangeMap, FullChangeEvent};
use crate::store::ConfigStore;
use apollo_foundation::{
    split_namespaces, ApolloConfig, AppConfig, CacheFactory, ConfigValue, Error,
    MemoryCacheFactory, Result, DEFAULT_NAMESPACE,
};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, error, trace};

/// 키별 기본 만료 (초)
pub const CONFIG_CACHE_EXPIRE_SECS: u64 = 120;

// ============================================================================
// RepositoryBuilder
// ============================================================================

/// Repository 조립
///
/// 지정하지 않은 collaborator는 기본 구현을 씁니다: [`MemoryCacheFactory`],
/// [`PropertiesFileHandler`], 호출 시점의 tokio runtime.
pub struct RepositoryBuilder {
    cache_factory: Option<Arc<dyn CacheFactory>>,
    file_handler: Option<Arc<dyn FileHandler>>,
    runtime: Option<Handle>,
    expire_seconds: u64,
}

impl Default for RepositoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryBuilder {
    pub fn new() -> Self {
        Self {
            cache_factory: None,
            file_handler: None,
            runtime: None,
            expire_seconds: CONFIG_CACHE_EXPIRE_SECS,
        }
    }

    pub fn cache_factory(mut self, factory: Arc<dyn CacheFactory>) -> Self {
        self.cache_factory = Some(factory);
        self
    }

    pub fn file_handler(mut self, handler: Arc<dyn FileHandler>) -> Self {
        self.file_handler = Some(handler);
        self
    }

    /// 리스너 전달과 백업 기록에 쓸 runtime
    pub fn runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    pub fn expire_seconds(mut self, seconds: u64) -> Self {
        self.expire_seconds = seconds;
        self
    }

    /// Repository 생성 후 `namespaces`(쉼표 구분)의 store를 미리 등록
    pub fn build(self, namespaces: &str, must_wait: bool) -> Result<ConfigRepository> {
        let runtime = match self.runtime {
            Some(handle) => handle,
            None => Handle::try_current()
                .map_err(|e| Error::Runtime(format!("No tokio runtime available: {}", e)))?,
        };

        let repo = ConfigRepository {
            configs: DashMap::new(),
            listeners: RwLock::new(Vec::new()),
            cache_factory: self
                .cache_factory
                .unwrap_or_else(|| Arc::new(MemoryCacheFactory::default())),
            file_handler: self
                .file_handler
                .unwrap_or_else(|| Arc::new(PropertiesFileHandler::new())),
            runtime,
            expire_seconds: self.expire_seconds,
        };

        for namespace in split_namespaces(namespaces) {
            repo.store_or_create(&namespace, must_wait);
        }

        Ok(repo)
    }
}

// ============================================================================
// ConfigRepository
// ============================================================================

/// namespace별 설정 저장소 모음
pub struct ConfigRepository {
    configs: DashMap<String, Arc<ConfigStore>>,
    listeners: RwLock<Vec<Arc<dyn ChangeListener>>>,
    cache_factory: Arc<dyn CacheFactory>,
    file_handler: Arc<dyn FileHandler>,
    runtime: Handle,
    expire_seconds: u64,
}

impl fmt::Debug for ConfigRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigRepository")
            .field("namespaces", &self.namespaces())
            .field("listeners", &self.listeners.read().len())
            .field("expire_seconds", &self.expire_seconds)
            .finish()
    }
}

impl ConfigRepository {
    pub fn builder() -> RepositoryBuilder {
        RepositoryBuilder::new()
    }

    /// 기본 collaborator로 repository 생성
    ///
    /// 현재 tokio runtime 안에서 호출해야 합니다.
    pub fn create_namespace_config(namespaces: &str, must_wait: bool) -> Result<Self> {
        RepositoryBuilder::new().build(namespaces, must_wait)
    }

    pub fn default_namespace() -> &'static str {
        DEFAULT_NAMESPACE
    }

    pub fn expire_seconds(&self) -> u64 {
        self.expire_seconds
    }

    /// 등록된 namespace 목록 (순서 없음)
    pub fn namespaces(&self) -> Vec<String> {
        self.configs.iter().map(|entry| entry.key().clone()).collect()
    }

    /// namespace의 store 조회
    pub fn get_config(&self, namespace: &str) -> Option<Arc<ConfigStore>> {
        if namespace.is_empty() {
            return None;
        }

        let store = self.configs.get(namespace).map(|entry| entry.value().clone());
        if store.is_none() {
            error!(namespace = %namespace, "Namespace config does not exist");
        }
        store
    }

    fn store_or_create(&self, namespace: &str, must_wait: bool) -> Arc<ConfigStore> {
        if let Some(store) = self.configs.get(namespace) {
            return store.value().clone();
        }

        self.configs
            .entry(namespace.to_string())
            .or_insert_with(|| {
                debug!(namespace = %namespace, must_wait, "Creating namespace config");
                Arc::new(ConfigStore::new(
                    namespace,
                    self.cache_factory.as_ref(),
                    must_wait,
                ))
            })
            .value()
            .clone()
    }

    // ========================================================================
    // Update
    // ========================================================================

    /// 원격 payload 반영
    ///
    /// payload가 `None`이면 로그만 남기고 아무 것도 바꾸지 않습니다.
    /// 호출자를 블록하지 않습니다 (리스너 전달과 백업은 background task).
    pub fn update_apollo_config(&self, config: Option<ApolloConfig>, app: &AppConfig) {
        let Some(mut config) = config else {
            error!("Apollo config is null, can't update");
            return;
        };

        app.set_current_apollo_config(config.conn.clone());

        let namespace = config.namespace().to_string();
        let changes = self.update_apollo_config_cache(
            config.configurations.as_ref(),
            self.expire_seconds,
            &namespace,
            app,
        );

        // TODO: read the sequence together with the payload so a concurrent
        // notification update cannot tag this event with a newer id
        let notification_id = app.notifications().get_notify(&namespace);

        self.push_newest_changes(FullChangeEvent::new(
            namespace.clone(),
            notification_id,
            config.configurations.clone().unwrap_or_default(),
        ));

        if !changes.is_empty() {
            self.push_change_event(ChangeEvent::new(namespace, notification_id, changes));
        }

        if app.is_backup_config() {
            config.conn.app_id = app.app_id.clone();
            let handler = self.file_handler.clone();
            let dir = PathBuf::from(app.backup_config_path());

            self.runtime.spawn_blocking(move || {
                if let Err(e) = handler.write_config_file(&config, &dir) {
                    error!(
                        namespace = %config.namespace(),
                        dir = %dir.display(),
                        error = %e,
                        "Failed to write config backup"
                    );
                }
            });
        }
    }

    /// diff 진입점: store를 찾거나 만들고 설정 맵을 적용
    pub fn update_apollo_config_cache(
        &self,
        configurations: Option<&HashMap<String, ConfigValue>>,
        expire_seconds: u64,
        namespace: &str,
        app: &AppConfig,
    ) -> ChangeMap {
        let store = self.store_or_create(namespace, app.must_start);
        diff::apply(&store, configurations, expire_seconds)
    }

    // ========================================================================
    // Listeners
    // ========================================================================

    /// 리스너 추가 (중복 등록 허용)
    pub fn add_change_listener(&self, listener: Arc<dyn ChangeListener>) {
        debug!(listener_name = listener.name(), "Registering change listener");
        self.listeners.write().push(listener);
    }

    /// 같은 인스턴스의 첫 번째 등록만 제거
    pub fn remove_change_listener(&self, listener: &Arc<dyn ChangeListener>) -> bool {
        let mut listeners = self.listeners.write();
        match listeners.iter().position(|l| same_listener(l, listener)) {
            Some(index) => {
                listeners.remove(index);
                debug!(listener_name = listener.name(), "Removed change listener");
                true
            }
            None => false,
        }
    }

    /// 등록된 리스너 복사본
    pub fn get_change_listeners(&self) -> Vec<Arc<dyn ChangeListener>> {
        self.listeners.read().clone()
    }

    fn push_change_event(&self, event: ChangeEvent) {
        let listeners = self.get_change_listeners();
        if listeners.is_empty() {
            return;
        }

        let event = Arc::new(event);
        for listener in listeners {
            let event = event.clone();
            trace!(
                listener_name = listener.name(),
                namespace = %event.namespace,
                "Delivering change event"
            );
            self.runtime.spawn(async move {
                listener.on_change(&event).await;
            });
        }
    }

    fn push_newest_changes(&self, event: FullChangeEvent) {
        let listeners = self.get_change_listeners();
        if listeners.is_empty() {
            return;
        }

        let event = Arc::new(event);
        for listener in listeners {
            let event = event.clone();
            trace!(
                listener_name = listener.name(),
                namespace = %event.namespace,
                "Delivering newest changes"
            );
            self.runtime.spawn(async move {
                listener.on_newest_change(&event).await;
            });
        }
    }
}

fn same_listener(a: &Arc<dyn ChangeListener>, b: &Arc<dyn ChangeListener>) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}
