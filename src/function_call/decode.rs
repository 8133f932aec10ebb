//! Decoder for the double-encoded function call payload.
//!
//! The outer object is read straight off the deserializer's token stream with
//! a fixed key order, `name` then `arguments`. The `arguments` string is fed
//! to a fresh `serde_json` reader and each top-level entry is classified as a
//! number or a string.

use std::fmt;

use serde::Deserialize;
use serde::de::{self, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use tracing::{debug, warn};

use super::{
    ArgumentDefinition, ArgumentValue, DecoderConfig, FunctionCall, FunctionCallError,
    UnsupportedArgumentPolicy,
};

const NAME_KEY: &str = "name";
const ARGUMENTS_KEY: &str = "arguments";

impl<'de> Deserialize<'de> for FunctionCall {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        FunctionCallSeed::default().deserialize(deserializer)
    }
}

/// Decodes a [`FunctionCall`] with a given [`DecoderConfig`].
///
/// ```
/// use serde::de::DeserializeSeed;
/// use rsai_chat::function_call::{DecoderConfig, FunctionCallSeed};
///
/// let payload = br#"{"name": "get_weather", "arguments": "{\"city\": \"Paris\"}"}"#;
/// let mut reader = serde_json::Deserializer::from_slice(payload);
/// let call = FunctionCallSeed::new(DecoderConfig::strict())
///     .deserialize(&mut reader)
///     .unwrap();
/// assert_eq!(call.name(), "get_weather");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FunctionCallSeed {
    config: DecoderConfig,
}

impl FunctionCallSeed {
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }
}

impl<'de> DeserializeSeed<'de> for FunctionCallSeed {
    type Value = FunctionCall;

    fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(FunctionCallVisitor {
            config: self.config,
        })
    }
}

struct FunctionCallVisitor {
    config: DecoderConfig,
}

impl<'de> Visitor<'de> for FunctionCallVisitor {
    type Value = FunctionCall;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a function call object with `name` and `arguments` keys")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        expect_key(&mut map, NAME_KEY)?;
        let name = map.next_value::<Option<String>>()?.unwrap_or_default();

        expect_key(&mut map, ARGUMENTS_KEY)?;
        let raw_arguments = map.next_value::<Option<String>>()?.unwrap_or_default();

        let arguments = parse_arguments(&name, &raw_arguments, &self.config)
            .map_err(<A::Error as de::Error>::custom)?;

        if let Some(key) = map.next_key::<String>()? {
            return Err(de::Error::custom(FunctionCallError::mismatch(
                "end of object",
                format!("key `{key}`"),
            )));
        }

        debug!(function = %name, arguments = arguments.len(), "Decoded function call");

        Ok(FunctionCall { name, arguments })
    }
}

fn expect_key<'de, A>(map: &mut A, expected: &str) -> Result<(), A::Error>
where
    A: MapAccess<'de>,
{
    let found = match map.next_key::<String>()? {
        Some(key) if key == expected => return Ok(()),
        Some(key) => format!("key `{key}`"),
        None => "end of object".to_string(),
    };

    Err(de::Error::custom(FunctionCallError::mismatch(
        format!("key `{expected}`"),
        found,
    )))
}

/// Parse a JSON-encoded arguments object into typed arguments, in document
/// order.
///
/// An empty payload yields no arguments. Values other than numbers and
/// strings are dropped with a warning, or rejected under
/// [`UnsupportedArgumentPolicy::Reject`].
pub fn parse_arguments(
    function: &str,
    raw: &str,
    config: &DecoderConfig,
) -> Result<Vec<ArgumentDefinition>, FunctionCallError> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = serde_json::Deserializer::from_slice(raw.as_bytes());
    let decoded = DecodedArguments::deserialize(&mut reader)
        .and_then(|decoded| reader.end().map(|()| decoded))
        .map_err(|e| FunctionCallError::MalformedArguments(e.to_string()))?;

    for skipped in decoded.unsupported {
        match config.unsupported_arguments {
            UnsupportedArgumentPolicy::Skip => {
                warn!(
                    function,
                    argument = %skipped.name,
                    kind = skipped.kind,
                    "Dropping function argument with unsupported value kind"
                );
            }
            UnsupportedArgumentPolicy::Reject => {
                return Err(FunctionCallError::UnsupportedArgumentKind {
                    name: skipped.name,
                    kind: skipped.kind,
                });
            }
        }
    }

    Ok(decoded.arguments)
}

#[derive(Default)]
struct DecodedArguments {
    arguments: Vec<ArgumentDefinition>,
    unsupported: Vec<UnsupportedArgument>,
}

struct UnsupportedArgument {
    name: String,
    kind: &'static str,
}

impl<'de> Deserialize<'de> for DecodedArguments {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(ArgumentsVisitor)
    }
}

struct ArgumentsVisitor;

impl<'de> Visitor<'de> for ArgumentsVisitor {
    type Value = DecodedArguments;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON object of function arguments")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut decoded = DecodedArguments::default();

        while let Some(name) = map.next_key::<String>()? {
            match map.next_value::<ArgumentSlot>()? {
                ArgumentSlot::Supported(value) => {
                    decoded.arguments.push(ArgumentDefinition { name, value });
                }
                ArgumentSlot::Unsupported(kind) => {
                    decoded.unsupported.push(UnsupportedArgument { name, kind });
                }
            }
        }

        Ok(decoded)
    }
}

/// A single argument value, classified by JSON kind.
enum ArgumentSlot {
    Supported(ArgumentValue),
    Unsupported(&'static str),
}

impl<'de> Deserialize<'de> for ArgumentSlot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ArgumentSlotVisitor)
    }
}

struct ArgumentSlotVisitor;

impl<'de> Visitor<'de> for ArgumentSlotVisitor {
    type Value = ArgumentSlot;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(ArgumentSlot::Supported(ArgumentValue::Number(v)))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        self.visit_f64(v as f64)
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        self.visit_f64(v as f64)
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(ArgumentSlot::Supported(ArgumentValue::String(v.to_owned())))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(ArgumentSlot::Supported(ArgumentValue::String(v)))
    }

    fn visit_bool<E>(self, _v: bool) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(ArgumentSlot::Unsupported("boolean"))
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(ArgumentSlot::Unsupported("null"))
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        self.visit_unit()
    }

    // Nested containers are consumed whole so their keys never surface as
    // top-level arguments.
    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(ArgumentSlot::Unsupported("array"))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(ArgumentSlot::Unsupported("object"))
    }
}
