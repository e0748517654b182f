//! App Config - 클라이언트 부트스트랩 설정
//!
//! app id / cluster / namespace 목록 / 백업 설정과, 실행 중에 갱신되는
//! notification registry, 현재 연결 정보 슬롯을 함께 보관합니다.

use super::notification::NotificationRegistry;
use super::remote::ApolloConnConfig;
use crate::{Error, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// 설정 파일명 (내용은 JSON)
pub const APP_CONFIG_FILE: &str = "app.properties";

/// 설정 파일 경로를 지정하는 환경 변수
pub const APP_CONFIG_FILE_ENV: &str = "AGOLLO_CONF";

/// 기본 cluster
pub const DEFAULT_CLUSTER: &str = "default";

/// 기본 namespace
pub const DEFAULT_NAMESPACE: &str = "application";

/// 앱 설정
///
/// `Clone`은 notification registry와 연결 정보 슬롯을 공유합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub app_id: String,

    #[serde(default = "default_cluster")]
    pub cluster: String,

    /// 쉼표로 구분된 namespace 목록
    #[serde(default = "default_namespace")]
    pub namespace_name: String,

    /// 설정 서버 주소
    #[serde(default)]
    pub ip: String,

    #[serde(default = "default_true")]
    pub is_backup_config: bool,

    #[serde(default)]
    pub backup_config_path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// 사전 등록되지 않은 namespace를 lazily 생성할 때 must-wait 정책
    #[serde(default)]
    pub must_start: bool,

    #[serde(skip)]
    notifications: Arc<NotificationRegistry>,

    #[serde(skip)]
    current_connection: Arc<RwLock<Option<ApolloConnConfig>>>,
}

fn default_cluster() -> String {
    DEFAULT_CLUSTER.to_string()
}
fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}
fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new("")
    }
}

impl AppConfig {
    pub fn new(app_id: impl Into<String>) -> Self {
        let config = Self {
            app_id: app_id.into(),
            cluster: default_cluster(),
            namespace_name: default_namespace(),
            ip: String::new(),
            is_backup_config: true,
            backup_config_path: String::new(),
            secret: None,
            label: None,
            must_start: false,
            notifications: Arc::new(NotificationRegistry::new()),
            current_connection: Arc::new(RwLock::new(None)),
        };
        config.notifications.seed(&config.namespace_name);
        config
    }

    // ========================================================================
    // Load
    // ========================================================================

    /// JSON 텍스트에서 로드
    pub fn from_json(content: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse app config: {}", e)))?;
        config.notifications.seed(&config.namespace_name);
        Ok(config)
    }

    /// JSON 파일에서 로드
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let config = Self::from_json(&content)?;
        debug!(
            path = %path.display(),
            app_id = %config.app_id,
            namespaces = %config.namespace_name,
            "Loaded app config"
        );
        Ok(config)
    }

    /// `AGOLLO_CONF` 경로 (없으면 `app.properties`)에서 로드
    pub fn load_from_env() -> Result<Self> {
        let path = std::env::var(APP_CONFIG_FILE_ENV)
            .ok()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| APP_CONFIG_FILE.to_string());
        Self::load(path)
    }

    // ========================================================================
    // Builder
    // ========================================================================

    pub fn cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = cluster.into();
        self
    }

    pub fn namespaces(mut self, namespaces: impl Into<String>) -> Self {
        self.namespace_name = namespaces.into();
        self.notifications.seed(&self.namespace_name);
        self
    }

    pub fn ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = ip.into();
        self
    }

    pub fn backup(mut self, enabled: bool, path: impl Into<String>) -> Self {
        self.is_backup_config = enabled;
        self.backup_config_path = path.into();
        self
    }

    pub fn must_start(mut self, must_start: bool) -> Self {
        self.must_start = must_start;
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// 설정 서버 base URL (`http://host:port/`)
    pub fn host(&self) -> String {
        let mut host = if self.ip.contains("://") {
            self.ip.clone()
        } else {
            format!("http://{}", self.ip)
        };
        if !host.ends_with('/') {
            host.push('/');
        }
        host
    }

    /// 서비스 목록 조회 URL
    pub fn services_config_url(&self, client_ip: &str) -> String {
        format!(
            "{}services/config?appId={}&ip={}",
            self.host(),
            urlencoding::encode(&self.app_id),
            client_ip
        )
    }

    pub fn is_backup_config(&self) -> bool {
        self.is_backup_config
    }

    pub fn backup_config_path(&self) -> &str {
        &self.backup_config_path
    }

    pub fn notifications(&self) -> &NotificationRegistry {
        &self.notifications
    }

    /// 마지막으로 수신한 payload의 연결 정보 갱신
    pub fn set_current_apollo_config(&self, conn: ApolloConnConfig) {
        *self.current_connection.write() = Some(conn);
    }

    pub fn current_apollo_config(&self) -> Option<ApolloConnConfig> {
        self.current_connection.read().clone()
    }
}
