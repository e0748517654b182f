//! Error types for ApolloSync
//!
//! 모든 에러를 중앙에서 관리

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// ApolloSync 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // 설정 관련
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // 캐시 관련
    // ========================================================================
    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Cache full: {capacity} entries")]
    CacheFull { capacity: usize },

    // ========================================================================
    // 값 변환 관련
    // ========================================================================
    #[error("Empty value: {namespace}/{key}")]
    EmptyValue { namespace: String, key: String },

    #[error("Unsupported value type for {key}: {kind}")]
    UnsupportedType { key: String, kind: &'static str },

    // ========================================================================
    // 백업 / 런타임
    // ========================================================================
    #[error("Backup error: {0}")]
    Backup(String),

    #[error("Runtime error: {0}")]
    Runtime(String),

    // ========================================================================
    // 일반
    // ========================================================================
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// 값 디코딩 실패인지 확인 (unmarshal 경로)
    pub fn is_decode_failure(&self) -> bool {
        matches!(
            self,
            Error::EmptyValue { .. } | Error::UnsupportedType { .. } | Error::Json(_)
        )
    }

    /// 다음 업데이트에서 다시 시도하면 성공할 수 있는 에러인지 확인
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::CacheFull { .. } | Error::Io(_))
    }

    /// EmptyValue 에러 생성 헬퍼
    pub fn empty_value(namespace: impl Into<String>, key: impl Into<String>) -> Self {
        Error::EmptyValue {
            namespace: namespace.into(),
            key: key.into(),
        }
    }

    /// UnsupportedType 에러 생성 헬퍼
    pub fn unsupported_type(key: impl Into<String>, kind: &'static str) -> Self {
        Error::UnsupportedType {
            key: key.into(),
            kind,
        }
    }
}
