//! Config Store - namespace 하나의 설정 보관소
//!
//! KV 캐시 하나를 소유하고, 최초 로드 완료를 알리는 one-shot gate와 타입별 조회 API를
//! 제공합니다.
//!
//! 조회 API는 두 가지 변형이 있습니다:
//! - `*_immediately`: 초기화 전이면 즉시 기본값 반환
//! - 기본 변형: store의 must-wait 정책에 따라 최초 로드까지 블록
//!
//! 값 변환 실패는 절대 panic/에러가 되지 않고 기본값으로 대체됩니다.
//! 예외는 `unmarshal`로, 실패를 호출자에게 `Err`로 돌려줍니다.

use crate::convert::FromConfigValue;
use crate::gate::InitGate;
use apollo_foundation::{CacheFactory, ConfigValue, Error, KvCache, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info};

/// 설정 보관소
pub struct ConfigStore {
    namespace: String,
    cache: Option<Arc<dyn KvCache>>,
    gate: InitGate,
    must_wait: bool,
}

impl fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigStore")
            .field("namespace", &self.namespace)
            .field("has_cache", &self.cache.is_some())
            .field("initialized", &self.is_initialized())
            .field("must_wait", &self.must_wait)
            .finish()
    }
}

impl ConfigStore {
    /// factory로 캐시를 만들어 store 생성
    ///
    /// 캐시 생성이 실패하면 캐시 없는 store가 되고, 모든 조회는 missing을 돌려줍니다.
    pub fn new(namespace: impl Into<String>, factory: &dyn CacheFactory, must_wait: bool) -> Self {
        let namespace = namespace.into();
        let cache = match factory.create() {
            Ok(cache) => Some(cache),
            Err(e) => {
                error!(namespace = %namespace, error = %e, "Failed to create namespace cache");
                None
            }
        };

        Self {
            namespace,
            cache,
            gate: InitGate::new(),
            must_wait,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn must_wait(&self) -> bool {
        self.must_wait
    }

    pub fn cache(&self) -> Option<&Arc<dyn KvCache>> {
        self.cache.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.gate.is_open()
    }

    pub fn wait_gate(&self) -> &InitGate {
        &self.gate
    }

    /// 초기화 완료 표시 (최초 1회만 gate를 연다)
    pub(crate) fn mark_initialized(&self) -> bool {
        let released = self.gate.open();
        if released {
            info!(namespace = %self.namespace, "Config store initialized");
        }
        released
    }

    // ========================================================================
    // Raw 조회
    // ========================================================================

    /// 중앙 조회 경로
    ///
    /// 초기화 전에 `block_if_uninitialized`가 true면 최초 로드까지 무기한 대기합니다.
    pub fn get_raw(&self, key: &str, block_if_uninitialized: bool) -> Option<ConfigValue> {
        if !self.is_initialized() {
            if !block_if_uninitialized {
                error!(
                    namespace = %self.namespace,
                    key = %key,
                    "Config read before init done"
                );
                return None;
            }
            self.gate.wait();
        }

        let Some(cache) = self.cache.as_ref() else {
            error!(namespace = %self.namespace, key = %key, "Namespace cache does not exist");
            return None;
        };

        let value = cache.get(key);
        if value.is_none() {
            debug!(namespace = %self.namespace, key = %key, "Config key not found");
        }
        value
    }

    fn get_typed<T: FromConfigValue>(&self, key: &str, wait: bool, default: T) -> T {
        let Some(value) = self.get_raw(key, wait) else {
            return default;
        };

        match T::from_config_value(value) {
            Ok(v) => v,
            Err(e) => {
                debug!(
                    namespace = %self.namespace,
                    key = %key,
                    expected = T::KIND,
                    reason = %e,
                    "Convert config value failed, using default"
                );
                default
            }
        }
    }

    fn get_text(&self, key: &str, wait: bool) -> String {
        match self.get_raw(key, wait) {
            Some(ConfigValue::Text(text)) => text,
            Some(other) => {
                debug!(
                    namespace = %self.namespace,
                    key = %key,
                    source = other.kind(),
                    "Convert to string failed"
                );
                String::new()
            }
            None => String::new(),
        }
    }

    fn unmarshal_with<T: DeserializeOwned>(&self, key: &str, wait: bool) -> Result<T> {
        match self.get_raw(key, wait) {
            Some(ConfigValue::Text(text)) => Ok(serde_json::from_str(&text)?),
            Some(ConfigValue::Bytes(bytes)) => Ok(serde_json::from_slice(&bytes)?),
            Some(
                value @ (ConfigValue::Structured(_)
                | ConfigValue::List(_)
                | ConfigValue::TextList(_)
                | ConfigValue::IntList(_)),
            ) => Ok(serde_json::from_value(value.to_json())?),
            Some(other) => Err(Error::unsupported_type(key, other.kind())),
            None => Err(Error::empty_value(&self.namespace, key)),
        }
    }

    // ========================================================================
    // 즉시 반환 변형
    // ========================================================================

    /// 문자열 값 (없거나 문자열이 아니면 빈 문자열)
    pub fn get_value_immediately(&self, key: &str) -> String {
        self.get_text(key, false)
    }

    pub fn get_string_value_immediately(&self, key: &str, default: &str) -> String {
        let value = self.get_text(key, false);
        if value.is_empty() {
            return default.to_string();
        }
        value
    }

    pub fn get_string_slice_value_immediately(&self, key: &str, default: Vec<String>) -> Vec<String> {
        self.get_typed(key, false, default)
    }

    pub fn get_int_slice_value_immediately(&self, key: &str, default: Vec<i64>) -> Vec<i64> {
        self.get_typed(key, false, default)
    }

    pub fn get_slice_value_immediately(&self, key: &str, default: Vec<Value>) -> Vec<Value> {
        self.get_typed(key, false, default)
    }

    pub fn get_int_value_immediately(&self, key: &str, default: i64) -> i64 {
        self.get_typed(key, false, default)
    }

    pub fn get_float_value_immediately(&self, key: &str, default: f64) -> f64 {
        self.get_typed(key, false, default)
    }

    pub fn get_bool_value_immediately(&self, key: &str, default: bool) -> bool {
        self.get_typed(key, false, default)
    }

    /// JSON 디코딩 (실패를 `Err`로 보고)
    pub fn unmarshal_immediately<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        self.unmarshal_with(key, false)
    }

    // ========================================================================
    // must-wait 정책 변형
    // ========================================================================

    pub fn get_value(&self, key: &str) -> String {
        self.get_text(key, self.must_wait)
    }

    pub fn get_string_value(&self, key: &str, default: &str) -> String {
        let value = self.get_text(key, self.must_wait);
        if value.is_empty() {
            return default.to_string();
        }
        value
    }

    pub fn get_string_slice_value(&self, key: &str, default: Vec<String>) -> Vec<String> {
        self.get_typed(key, self.must_wait, default)
    }

    pub fn get_int_slice_value(&self, key: &str, default: Vec<i64>) -> Vec<i64> {
        self.get_typed(key, self.must_wait, default)
    }

    pub fn get_slice_value(&self, key: &str, default: Vec<Value>) -> Vec<Value> {
        self.get_typed(key, self.must_wait, default)
    }

    pub fn get_int_value(&self, key: &str, default: i64) -> i64 {
        self.get_typed(key, self.must_wait, default)
    }

    pub fn get_float_value(&self, key: &str, default: f64) -> f64 {
        self.get_typed(key, self.must_wait, default)
    }

    pub fn get_bool_value(&self, key: &str, default: bool) -> bool {
        self.get_typed(key, self.must_wait, default)
    }

    pub fn unmarshal<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        self.unmarshal_with(key, self.must_wait)
    }

    // ========================================================================
    // Content
    // ========================================================================

    /// `key=value` 줄 단위 렌더링 (순서는 캐시 순회 순서)
    pub fn get_content(&self) -> String {
        let mut content = String::new();
        if let Some(cache) = self.cache.as_ref() {
            cache.range(&mut |key, value| {
                push_property(&mut content, key, value);
                true
            });
        }
        content
    }
}

/// properties 한 줄 추가
pub(crate) fn push_property(out: &mut String, key: &str, value: &ConfigValue) {
    out.push_str(key);
    out.push('=');
    out.push_str(&value.to_string());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use apollo_foundation::MemoryCacheFactory;
    use serde::Deserialize;
    use serde_json::json;

    struct FailingFactory;

    impl CacheFactory for FailingFactory {
        fn create(&self) -> Result<Arc<dyn KvCache>> {
            Err(Error::Cache("out of memory".into()))
        }
    }

    fn loaded_store(entries: &[(&str, ConfigValue)]) -> ConfigStore {
        let store = ConfigStore::new("application", &MemoryCacheFactory::default(), false);
        let cache = store.cache().unwrap();
        for (key, value) in entries {
            cache.set(key, value.clone(), 0).unwrap();
        }
        store.mark_initialized();
        store
    }

    #[test]
    fn test_uninitialized_immediate_read_returns_default() {
        let store = ConfigStore::new("application", &MemoryCacheFactory::default(), false);
        store.cache().unwrap().set("k1", "v1".into(), 0).unwrap();

        assert!(!store.is_initialized());
        assert_eq!(store.get_raw("k1", false), None);
        assert_eq!(store.get_string_value_immediately("k1", "dflt"), "dflt");
        // must_wait = false, so the policy variant does not block either
        assert_eq!(store.get_string_value("k1", "dflt"), "dflt");
    }

    #[test]
    fn test_string_accessors() {
        let store = loaded_store(&[
            ("name", "demo".into()),
            ("empty", "".into()),
            ("port", ConfigValue::Int(8080)),
        ]);

        assert_eq!(store.get_string_value("name", "x"), "demo");
        assert_eq!(store.get_string_value("empty", "x"), "x");
        assert_eq!(store.get_string_value("port", "x"), "x");
        assert_eq!(store.get_string_value("missing", "x"), "x");
        assert_eq!(store.get_value("name"), "demo");
        assert_eq!(store.get_value("port"), "");
    }

    #[test]
    fn test_scalar_accessors() {
        let store = loaded_store(&[
            ("int_text", "42".into()),
            ("int", ConfigValue::Int(7)),
            ("float_text", "0.25".into()),
            ("bool_text", "true".into()),
            ("bool", ConfigValue::Bool(false)),
            ("garbage", "abc".into()),
        ]);

        assert_eq!(store.get_int_value("int_text", 0), 42);
        assert_eq!(store.get_int_value("int", 0), 7);
        assert_eq!(store.get_int_value("garbage", -1), -1);
        assert_eq!(store.get_float_value("float_text", 0.0), 0.25);
        assert_eq!(store.get_float_value("int", 9.5), 9.5);
        assert!(store.get_bool_value("bool_text", false));
        assert!(!store.get_bool_value("bool", true));
        assert!(store.get_bool_value("garbage", true));
    }

    #[test]
    fn test_list_accessors() {
        let store = loaded_store(&[
            ("hosts", r#"["a","b"]"#.into()),
            ("ports", "[80,443]".into()),
            ("mixed", r#"[1,"two"]"#.into()),
            ("native", ConfigValue::IntList(vec![1, 2])),
            ("broken", "[1,".into()),
        ]);

        assert_eq!(store.get_string_slice_value("hosts", vec![]), vec!["a", "b"]);
        assert_eq!(store.get_int_slice_value("ports", vec![]), vec![80, 443]);
        assert_eq!(store.get_int_slice_value("native", vec![]), vec![1, 2]);
        assert_eq!(
            store.get_slice_value("mixed", vec![]),
            vec![json!(1), json!("two")]
        );
        assert_eq!(store.get_int_slice_value("broken", vec![9]), vec![9]);
        assert_eq!(
            store.get_string_slice_value("native", vec!["d".into()]),
            vec!["d"]
        );
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Db {
        host: String,
        port: u16,
    }

    #[test]
    fn test_unmarshal() {
        let store = loaded_store(&[
            ("db", r#"{"host":"localhost","port":5432}"#.into()),
            ("raw", ConfigValue::Bytes(br#"{"host":"h","port":1}"#.to_vec())),
            ("bad", "{".into()),
            ("flag", ConfigValue::Bool(true)),
        ]);

        assert_eq!(
            store.unmarshal::<Db>("db").unwrap(),
            Db {
                host: "localhost".into(),
                port: 5432
            }
        );
        assert_eq!(store.unmarshal_immediately::<Db>("raw").unwrap().port, 1);
        assert!(matches!(store.unmarshal::<Db>("bad"), Err(Error::Json(_))));
        assert!(matches!(
            store.unmarshal::<Db>("flag"),
            Err(Error::UnsupportedType { kind: "bool", .. })
        ));
        assert!(matches!(
            store.unmarshal::<Db>("missing"),
            Err(Error::EmptyValue { .. })
        ));
    }

    #[test]
    fn test_unmarshal_decoded_payload_values() {
        let store = loaded_store(&[
            ("db", ConfigValue::from_json(json!({"host": "x", "port": 1}))),
            ("ids", ConfigValue::from_json(json!([1, 2]))),
        ]);

        assert_eq!(
            store.unmarshal::<Db>("db").unwrap(),
            Db {
                host: "x".into(),
                port: 1
            }
        );
        assert_eq!(store.unmarshal::<Vec<u16>>("ids").unwrap(), vec![1, 2]);
        assert!(matches!(store.unmarshal::<Vec<String>>("ids"), Err(Error::Json(_))));
    }

    #[test]
    fn test_unmarshal_before_init_fails() {
        let store = ConfigStore::new("application", &MemoryCacheFactory::default(), false);
        let err = store.unmarshal_immediately::<Db>("db").unwrap_err();
        assert!(err.is_decode_failure());
    }

    #[test]
    fn test_get_content() {
        let store = loaded_store(&[("a", "1".into()), ("b", ConfigValue::Bool(true))]);

        let content = store.get_content();
        let mut lines: Vec<_> = content.lines().collect();
        lines.sort();
        assert_eq!(lines, vec!["a=1", "b=true"]);
        assert!(content.ends_with('\n'));
    }

    #[test]
    fn test_missing_cache() {
        let store = ConfigStore::new("application", &FailingFactory, false);
        store.mark_initialized();

        assert!(store.cache().is_none());
        assert_eq!(store.get_raw("k", false), None);
        assert_eq!(store.get_int_value("k", 3), 3);
        assert_eq!(store.get_content(), "");
    }
}
