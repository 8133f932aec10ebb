//! Function calls issued by the model.
//!
//! The API delivers a function call as `{"name": "...", "arguments": "..."}`
//! where `arguments` is itself a JSON object encoded as a string. The
//! [`decode`] module reads the outer object with a fixed key order and parses
//! the inner document into typed [`ArgumentDefinition`]s.

pub mod config;
pub mod decode;

use std::fmt;

use serde::{Serialize, ser};
use serde_json::Value;
use thiserror::Error;

use crate::core::LlmError;

pub use config::{DecoderConfig, UnsupportedArgumentPolicy};
pub use decode::{FunctionCallSeed, parse_arguments};

/// Reasons a function call cannot be decoded or encoded.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FunctionCallError {
    #[error("expected {expected}, found {found}")]
    StructuralMismatch { expected: String, found: String },

    #[error("arguments payload is not a JSON object: {0}")]
    MalformedArguments(String),

    #[error("argument `{name}` has unsupported value kind `{kind}`")]
    UnsupportedArgumentKind { name: String, kind: &'static str },

    #[error("serializing a function call is not supported")]
    EncodeNotSupported,
}

impl FunctionCallError {
    pub(crate) fn mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        FunctionCallError::StructuralMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// Discriminator of an [`ArgumentValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentType {
    Number,
    String,
}

/// An argument value: a JSON number read as `f64`, or a string.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentValue {
    Number(f64),
    String(String),
}

impl ArgumentValue {
    pub fn r#type(&self) -> ArgumentType {
        match self {
            ArgumentValue::Number(_) => ArgumentType::Number,
            ArgumentValue::String(_) => ArgumentType::String,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ArgumentValue::Number(n) => Some(*n),
            ArgumentValue::String(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgumentValue::Number(_) => None,
            ArgumentValue::String(s) => Some(s),
        }
    }
}

impl fmt::Display for ArgumentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentValue::Number(n) => write!(f, "{n}"),
            ArgumentValue::String(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<&ArgumentValue> for Value {
    fn from(value: &ArgumentValue) -> Self {
        match value {
            ArgumentValue::Number(n) => Value::from(*n),
            ArgumentValue::String(s) => Value::String(s.clone()),
        }
    }
}

/// One argument of a [`FunctionCall`].
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentDefinition {
    name: String,
    value: ArgumentValue,
}

impl ArgumentDefinition {
    pub fn new(name: impl Into<String>, value: ArgumentValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn number(name: impl Into<String>, value: f64) -> Self {
        Self::new(name, ArgumentValue::Number(value))
    }

    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, ArgumentValue::String(value.into()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn r#type(&self) -> ArgumentType {
        self.value.r#type()
    }

    pub fn value(&self) -> &ArgumentValue {
        &self.value
    }
}

/// A request from the model to invoke a named function.
///
/// Arguments keep the order in which they appeared in the payload. Decoding
/// goes through [`serde::Deserialize`] (or [`FunctionCallSeed`] for a custom
/// [`DecoderConfig`]); serializing always fails.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    name: String,
    arguments: Vec<ArgumentDefinition>,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, arguments: Vec<ArgumentDefinition>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// Build a call from a name and a raw, JSON-encoded arguments string, e.g.
    /// after reassembling a streamed call.
    pub fn from_parts(
        name: impl Into<String>,
        raw_arguments: &str,
        config: &DecoderConfig,
    ) -> Result<Self, LlmError> {
        let name = name.into();
        let arguments = parse_arguments(&name, raw_arguments, config)?;
        Ok(Self { name, arguments })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[ArgumentDefinition] {
        &self.arguments
    }

    /// First argument called `name`.
    pub fn argument(&self, name: &str) -> Option<&ArgumentDefinition> {
        self.arguments.iter().find(|arg| arg.name == name)
    }

    /// Arguments as a JSON object, in encounter order, for handing to a tool
    /// implementation. Duplicate names collapse to the last value.
    pub fn arguments_value(&self) -> Value {
        Value::Object(
            self.arguments
                .iter()
                .map(|arg| (arg.name.clone(), Value::from(&arg.value)))
                .collect(),
        )
    }
}

impl fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.arguments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", arg.name, arg.value)?;
        }
        f.write_str(")")
    }
}

impl Serialize for FunctionCall {
    fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Err(ser::Error::custom(FunctionCallError::EncodeNotSupported))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn weather_call() -> FunctionCall {
        FunctionCall::new(
            "get_weather",
            vec![
                ArgumentDefinition::string("city", "Paris"),
                ArgumentDefinition::number("days", 3.0),
            ],
        )
    }

    #[test]
    fn test_display_is_positional() {
        assert_eq!(
            weather_call().to_string(),
            r#"get_weather(city: "Paris", days: 3)"#
        );
        assert_eq!(FunctionCall::new("ping", vec![]).to_string(), "ping()");
    }

    #[test]
    fn test_argument_lookup() {
        let call = weather_call();
        let days = call.argument("days").expect("days argument");
        assert_eq!(days.r#type(), ArgumentType::Number);
        assert_eq!(days.value().as_f64(), Some(3.0));
        assert!(call.argument("units").is_none());
    }

    #[test]
    fn test_arguments_value() {
        assert_eq!(
            weather_call().arguments_value(),
            json!({ "city": "Paris", "days": 3.0 })
        );
    }

    #[test]
    fn test_arguments_value_keeps_order_and_collapses_duplicates() {
        let call = FunctionCall::new(
            "f",
            vec![
                ArgumentDefinition::number("z", 1.0),
                ArgumentDefinition::string("a", "x"),
                ArgumentDefinition::number("z", 2.0),
            ],
        );

        let value = call.arguments_value();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["z", "a"]);
        assert_eq!(value["z"], json!(2.0));
    }

    #[test]
    fn test_serialize_is_rejected() {
        let err = serde_json::to_string(&weather_call()).unwrap_err();
        assert!(err.to_string().contains("not supported"));

        let empty = FunctionCall::new("noop", vec![]);
        assert!(serde_json::to_value(&empty).is_err());
    }
}
