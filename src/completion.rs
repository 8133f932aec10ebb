//! Byte-level entry points for chat completion payloads.
//!
//! Sending requests and reassembling streamed responses is left to the
//! caller; these functions only turn bytes into records and back.

use serde::de::DeserializeSeed;

use crate::core::{ChatCompletion, ChatCompletionRequest, LlmError};
use crate::function_call::{DecoderConfig, FunctionCall, FunctionCallSeed};

/// Parse a complete (non-streamed) chat completion response body.
#[tracing::instrument(name = "parse_chat_completion", skip(bytes), fields(len = bytes.len()), err)]
pub fn parse_chat_completion(bytes: &[u8]) -> Result<ChatCompletion, LlmError> {
    serde_json::from_slice(bytes).map_err(|e| LlmError::from_json("chat completion", e))
}

/// Decode a standalone `{"name": ..., "arguments": ...}` object.
pub fn decode_function_call(bytes: &[u8]) -> Result<FunctionCall, LlmError> {
    decode_function_call_with(bytes, &DecoderConfig::default())
}

#[tracing::instrument(
    name = "decode_function_call",
    skip(bytes),
    fields(len = bytes.len()),
    err
)]
pub fn decode_function_call_with(
    bytes: &[u8],
    config: &DecoderConfig,
) -> Result<FunctionCall, LlmError> {
    let mut reader = serde_json::Deserializer::from_slice(bytes);
    let call = FunctionCallSeed::new(*config)
        .deserialize(&mut reader)
        .and_then(|call| reader.end().map(|()| call))
        .map_err(|e| LlmError::from_json("function call", e))?;

    Ok(call)
}

/// Serialize a request body.
///
/// Fails if any message carries a function call.
pub fn encode_request(request: &ChatCompletionRequest) -> Result<String, LlmError> {
    serde_json::to_string(request).map_err(|e| LlmError::from_encode("chat completion request", e))
}
