//! Backup file writer
//!
//! 최신 설정 스냅샷을 디스크에 남겨 두는 collaborator. repository는 결과를 기다리지
//! 않고 background task에서 호출합니다.

use crate::store::push_property;
use apollo_foundation::{ApolloConfig, Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// 백업 파일 writer
pub trait FileHandler: Send + Sync {
    /// payload를 `dir` 아래에 기록
    fn write_config_file(&self, config: &ApolloConfig, dir: &Path) -> Result<()>;

    /// `<dir>/<app_id>-<namespace>.properties`
    fn backup_file_path(&self, app_id: &str, namespace: &str, dir: &Path) -> PathBuf {
        dir.join(format!("{}-{}.properties", app_id, namespace))
    }
}

/// properties 형식 기본 writer
///
/// 키 정렬 후 `key=value` 줄로 기록합니다. 설정 맵이 없는 payload는 빈 파일이 됩니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertiesFileHandler;

impl PropertiesFileHandler {
    pub fn new() -> Self {
        Self
    }

    /// 파일 내용 렌더링
    pub fn render(config: &ApolloConfig) -> String {
        let mut content = String::new();
        if let Some(configurations) = config.configurations.as_ref() {
            let mut keys: Vec<_> = configurations.keys().collect();
            keys.sort();
            for key in keys {
                push_property(&mut content, key, &configurations[key]);
            }
        }
        content
    }

    fn ensure_dir(dir: &Path) -> Result<()> {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

impl FileHandler for PropertiesFileHandler {
    fn write_config_file(&self, config: &ApolloConfig, dir: &Path) -> Result<()> {
        Self::ensure_dir(dir)?;

        let path = self.backup_file_path(&config.conn.app_id, config.namespace(), dir);
        std::fs::write(&path, Self::render(config))
            .map_err(|e| Error::Backup(format!("Failed to write {}: {}", path.display(), e)))?;

        debug!(path = %path.display(), "Config backup written");
        Ok(())
    }
}
