//! ConfigValue - 캐시에 저장되는 설정 값
//!
//! 원격 설정은 대부분 문자열이지만, 로컬에서 주입되는 값은 숫자/불리언/리스트일 수
//! 있으므로 태그된 variant로 표현합니다. 비교는 항상 구조적(deep) 비교입니다.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// 설정 값
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    /// 텍스트 (원격 설정의 기본 형태)
    Text(String),
    /// 정수
    Int(i64),
    /// 실수
    Float(f64),
    /// 불리언
    Bool(bool),
    /// 문자열 리스트
    TextList(Vec<String>),
    /// 정수 리스트
    IntList(Vec<i64>),
    /// 자유 형식 리스트
    List(Vec<Value>),
    /// 원시 바이트 (unmarshal 전용)
    Bytes(Vec<u8>),
    /// 구조화된 값 (object, null)
    Structured(Value),
}

impl ConfigValue {
    /// 값 종류 이름 (로그용)
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::TextList(_) => "text_list",
            Self::IntList(_) => "int_list",
            Self::List(_) => "list",
            Self::Bytes(_) => "bytes",
            Self::Structured(_) => "structured",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// JSON 값에서 변환
    ///
    /// 배열은 원소가 모두 문자열이면 `TextList`, 모두 정수면 `IntList`,
    /// 그 외에는 `List`가 됩니다.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::String(s) => Self::Text(s),
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or_default()),
            },
            Value::Array(items) => {
                if items.iter().all(Value::is_string) {
                    Self::TextList(
                        items
                            .into_iter()
                            .filter_map(|v| v.as_str().map(str::to_string))
                            .collect(),
                    )
                } else if !items.is_empty() && items.iter().all(Value::is_i64) {
                    Self::IntList(items.iter().filter_map(Value::as_i64).collect())
                } else {
                    Self::List(items)
                }
            }
            other => Self::Structured(other),
        }
    }

    /// JSON 값으로 변환
    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(s) => Value::String(s.clone()),
            Self::Int(i) => Value::from(*i),
            Self::Float(f) => Value::from(*f),
            Self::Bool(b) => Value::Bool(*b),
            Self::TextList(items) => Value::from(items.clone()),
            Self::IntList(items) => Value::from(items.clone()),
            Self::List(items) => Value::Array(items.clone()),
            Self::Bytes(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
            Self::Structured(v) => v.clone(),
        }
    }
}

/// properties 렌더링용 텍스트 표현
///
/// 텍스트는 그대로, 리스트와 구조화된 값은 JSON으로 출력합니다.
impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(v) => write!(f, "{}", v),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Bytes(bytes) => f.write_str(&String::from_utf8_lossy(bytes)),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ConfigValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_json)
    }
}

// ============================================================================
// From 구현
// ============================================================================

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for ConfigValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<String>> for ConfigValue {
    fn from(items: Vec<String>) -> Self {
        Self::TextList(items)
    }
}

impl From<Vec<i64>> for ConfigValue {
    fn from(items: Vec<i64>) -> Self {
        Self::IntList(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_arrays() {
        assert_eq!(
            ConfigValue::from_json(json!(["a", "b"])),
            ConfigValue::TextList(vec!["a".into(), "b".into()])
        );
        assert_eq!(
            ConfigValue::from_json(json!([1, 2, 3])),
            ConfigValue::IntList(vec![1, 2, 3])
        );
        assert_eq!(
            ConfigValue::from_json(json!([1, "x"])),
            ConfigValue::List(vec![json!(1), json!("x")])
        );
    }

    #[test]
    fn test_deep_equality() {
        let a = ConfigValue::Structured(json!({"a": [1, 2], "b": {"c": true}}));
        let b = ConfigValue::Structured(json!({"b": {"c": true}, "a": [1, 2]}));
        assert_eq!(a, b);
        assert_ne!(ConfigValue::from("1"), ConfigValue::from(1i64));
    }

    #[test]
    fn test_display() {
        assert_eq!(ConfigValue::from("v1").to_string(), "v1");
        assert_eq!(ConfigValue::from(42i64).to_string(), "42");
        assert_eq!(
            ConfigValue::TextList(vec!["a".into(), "b".into()]).to_string(),
            r#"["a","b"]"#
        );
    }

    #[test]
    fn test_deserialize_map() {
        let map: std::collections::HashMap<String, ConfigValue> =
            serde_json::from_str(r#"{"timeout":"100","retries":3,"debug":true}"#).unwrap();
        assert_eq!(map["timeout"], ConfigValue::from("100"));
        assert_eq!(map["retries"], ConfigValue::Int(3));
        assert_eq!(map["debug"], ConfigValue::Bool(true));
    }
}
