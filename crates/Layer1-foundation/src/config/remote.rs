//! Remote payload - 설정 서버가 내려주는 namespace 단위 설정

use crate::value::ConfigValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 연결 정보 (어떤 app/cluster/namespace의 어떤 릴리스인지)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApolloConnConfig {
    #[serde(default)]
    pub app_id: String,

    #[serde(default)]
    pub cluster: String,

    #[serde(default)]
    pub namespace_name: String,

    #[serde(default)]
    pub release_key: String,
}

/// 원격 설정 payload
///
/// `configurations`가 `None`이면 payload에 설정 맵이 아예 없었다는 뜻이고,
/// 빈 맵은 "설정 항목이 0개"라는 뜻입니다. 두 경우는 초기화 처리에서 다르게 다뤄집니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApolloConfig {
    #[serde(flatten)]
    pub conn: ApolloConnConfig,

    #[serde(default)]
    pub configurations: Option<HashMap<String, ConfigValue>>,
}

impl ApolloConfig {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            conn: ApolloConnConfig {
                namespace_name: namespace.into(),
                ..Default::default()
            },
            configurations: None,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.conn.namespace_name
    }

    /// 설정 맵 지정
    pub fn with_configurations(mut self, configurations: HashMap<String, ConfigValue>) -> Self {
        self.configurations = Some(configurations);
        self
    }

    /// 릴리스 키 지정
    pub fn with_release_key(mut self, release_key: impl Into<String>) -> Self {
        self.conn.release_key = release_key.into();
        self
    }
}
