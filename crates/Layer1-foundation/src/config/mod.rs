//! Config - 부트스트랩 설정과 원격 payload
//!
//! - `app.rs` - AppConfig (앱 식별, 백업, notification registry)
//! - `notification.rs` - namespace 분리, notification 시퀀스
//! - `remote.rs` - 설정 서버 payload

mod app;
mod notification;
mod remote;

pub use app::{
    AppConfig, APP_CONFIG_FILE, APP_CONFIG_FILE_ENV, DEFAULT_CLUSTER, DEFAULT_NAMESPACE,
};
pub use notification::{
    split_namespaces, NotificationRegistry, DEFAULT_NOTIFICATION_ID, NAMESPACE_SEPARATOR,
};
pub use remote::{ApolloConfig, ApolloConnConfig};
