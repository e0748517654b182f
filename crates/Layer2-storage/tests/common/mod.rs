//! 통합 테스트 공용 도우미

#![allow(dead_code)]

use apollo_foundation::{ApolloConfig, AppConfig, ConfigValue};
use apollo_storage::{ChangeEvent, ChangeListener, FullChangeEvent};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

pub const RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// `RUST_LOG=apollo_storage=trace cargo test` 로 로그 확인
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn app() -> AppConfig {
    AppConfig::new("demo").backup(false, "")
}

pub fn map(entries: &[(&str, &str)]) -> HashMap<String, ConfigValue> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), ConfigValue::from(*v)))
        .collect()
}

pub fn payload(namespace: &str, entries: &[(&str, &str)]) -> ApolloConfig {
    ApolloConfig::new(namespace).with_configurations(map(entries))
}

/// 받은 이벤트를 채널로 넘기는 리스너
pub struct RecordingListener {
    name: String,
    changes: mpsc::UnboundedSender<ChangeEvent>,
    snapshots: mpsc::UnboundedSender<FullChangeEvent>,
}

pub struct Recorded {
    pub changes: mpsc::UnboundedReceiver<ChangeEvent>,
    pub snapshots: mpsc::UnboundedReceiver<FullChangeEvent>,
}

impl RecordingListener {
    pub fn new(name: &str) -> (Self, Recorded) {
        let (change_tx, change_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = mpsc::unbounded_channel();
        (
            Self {
                name: name.to_string(),
                changes: change_tx,
                snapshots: snapshot_tx,
            },
            Recorded {
                changes: change_rx,
                snapshots: snapshot_rx,
            },
        )
    }
}

#[async_trait]
impl ChangeListener for RecordingListener {
    fn name(&self) -> &str {
        &self.name
    }

    async fn on_change(&self, event: &ChangeEvent) {
        let _ = self.changes.send(event.clone());
    }

    async fn on_newest_change(&self, event: &FullChangeEvent) {
        let _ = self.snapshots.send(event.clone());
    }
}

impl Recorded {
    pub async fn next_change(&mut self) -> Option<ChangeEvent> {
        tokio::time::timeout(RECV_TIMEOUT, self.changes.recv())
            .await
            .ok()
            .flatten()
    }

    pub async fn next_snapshot(&mut self) -> Option<FullChangeEvent> {
        tokio::time::timeout(RECV_TIMEOUT, self.snapshots.recv())
            .await
            .ok()
            .flatten()
    }

    /// 짧게 기다려도 아무 변경 이벤트가 없는지
    pub async fn no_change_within(&mut self, wait: Duration) -> bool {
        tokio::time::timeout(wait, self.changes.recv()).await.is_err()
    }
}
