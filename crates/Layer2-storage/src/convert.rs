//! Value coercion for the typed accessors
//!
//! A value whose shape already matches the requested kind is returned as is.
//! Every list shape is a valid free-form list, and an empty list is valid for
//! every list kind. Text is decoded: JSON for list kinds, numeric/boolean
//! parsing for scalars. Anything else is a mismatch.

use apollo_foundation::ConfigValue;
use serde_json::Value;
use std::fmt;

/// Why a stored value could not be converted
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertError {
    /// Stored shape cannot represent the requested kind
    Mismatch { found: &'static str },
    /// Text could not be decoded
    Decode(String),
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mismatch { found } => write!(f, "source type {}", found),
            Self::Decode(msg) => write!(f, "decode failed: {}", msg),
        }
    }
}

/// Kinds readable through the typed accessors
pub trait FromConfigValue: Sized {
    /// Kind name used in log lines
    const KIND: &'static str;

    fn from_config_value(value: ConfigValue) -> Result<Self, ConvertError>;
}

fn mismatch<T>(value: &ConfigValue) -> Result<T, ConvertError> {
    Err(ConvertError::Mismatch {
        found: value.kind(),
    })
}

fn decode_json<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, ConvertError> {
    serde_json::from_str(text).map_err(|e| ConvertError::Decode(e.to_string()))
}

impl FromConfigValue for Vec<String> {
    const KIND: &'static str = "[]string";

    fn from_config_value(value: ConfigValue) -> Result<Self, ConvertError> {
        match value {
            ConfigValue::TextList(items) => Ok(items),
            ConfigValue::Text(text) => decode_json(&text),
            other => mismatch(&other),
        }
    }
}

impl FromConfigValue for Vec<i64> {
    const KIND: &'static str = "[]int";

    fn from_config_value(value: ConfigValue) -> Result<Self, ConvertError> {
        match value {
            ConfigValue::IntList(items) => Ok(items),
            // `[]` decodes as an empty text list
            ConfigValue::TextList(items) if items.is_empty() => Ok(Vec::new()),
            ConfigValue::Text(text) => decode_json(&text),
            other => mismatch(&other),
        }
    }
}

impl FromConfigValue for Vec<Value> {
    const KIND: &'static str = "[]any";

    fn from_config_value(value: ConfigValue) -> Result<Self, ConvertError> {
        match value {
            ConfigValue::List(items) => Ok(items),
            ConfigValue::TextList(items) => Ok(items.into_iter().map(Value::String).collect()),
            ConfigValue::IntList(items) => Ok(items.into_iter().map(Value::from).collect()),
            ConfigValue::Text(text) => decode_json(&text),
            other => mismatch(&other),
        }
    }
}

impl FromConfigValue for i64 {
    const KIND: &'static str = "int";

    fn from_config_value(value: ConfigValue) -> Result<Self, ConvertError> {
        match value {
            ConfigValue::Int(i) => Ok(i),
            ConfigValue::Text(text) => text
                .parse()
                .map_err(|e: std::num::ParseIntError| ConvertError::Decode(e.to_string())),
            other => mismatch(&other),
        }
    }
}

impl FromConfigValue for f64 {
    const KIND: &'static str = "float64";

    fn from_config_value(value: ConfigValue) -> Result<Self, ConvertError> {
        match value {
            ConfigValue::Float(f) => Ok(f),
            ConfigValue::Text(text) => text
                .parse()
                .map_err(|e: std::num::ParseFloatError| ConvertError::Decode(e.to_string())),
            other => mismatch(&other),
        }
    }
}

impl FromConfigValue for bool {
    const KIND: &'static str = "bool";

    fn from_config_value(value: ConfigValue) -> Result<Self, ConvertError> {
        match value {
            ConfigValue::Bool(b) => Ok(b),
            ConfigValue::Text(text) => parse_bool(&text)
                .ok_or_else(|| ConvertError::Decode(format!("invalid bool: {:?}", text))),
            other => mismatch(&other),
        }
    }
}

/// Boolean spellings accepted from text
pub fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_verbatim_shapes() {
        let list = ConfigValue::TextList(vec!["a".into()]);
        assert_eq!(Vec::<String>::from_config_value(list).unwrap(), vec!["a"]);
        assert_eq!(i64::from_config_value(ConfigValue::Int(7)).unwrap(), 7);
        assert!(bool::from_config_value(ConfigValue::Bool(true)).unwrap());
    }

    #[test]
    fn test_payload_arrays_read_as_lists() {
        let hosts = ConfigValue::from_json(json!(["a", "b"]));
        let ids = ConfigValue::from_json(json!([1, 2]));
        let empty = ConfigValue::from_json(json!([]));

        assert_eq!(
            Vec::<Value>::from_config_value(hosts).unwrap(),
            vec![json!("a"), json!("b")]
        );
        assert_eq!(
            Vec::<Value>::from_config_value(ids).unwrap(),
            vec![json!(1), json!(2)]
        );
        assert!(Vec::<Value>::from_config_value(empty.clone()).unwrap().is_empty());
        assert!(Vec::<i64>::from_config_value(empty.clone()).unwrap().is_empty());
        assert!(Vec::<String>::from_config_value(empty).unwrap().is_empty());
    }

    #[test]
    fn test_text_decoding() {
        assert_eq!(
            Vec::<i64>::from_config_value("[1,2,3]".into()).unwrap(),
            vec![1, 2, 3]
        );
        assert_eq!(
            Vec::<Value>::from_config_value(r#"[1,"a",true]"#.into()).unwrap(),
            vec![json!(1), json!("a"), json!(true)]
        );
        assert_eq!(f64::from_config_value("1.5".into()).unwrap(), 1.5);
        assert!(!bool::from_config_value("F".into()).unwrap());
    }

    #[test]
    fn test_mismatch_and_decode_errors() {
        assert_eq!(
            i64::from_config_value(ConfigValue::Float(1.0)),
            Err(ConvertError::Mismatch { found: "float" })
        );
        assert!(matches!(
            i64::from_config_value("12x".into()),
            Err(ConvertError::Decode(_))
        ));
        assert!(matches!(
            Vec::<String>::from_config_value("not json".into()),
            Err(ConvertError::Decode(_))
        ));
        assert!(bool::from_config_value("yes".into()).is_err());
    }
}
