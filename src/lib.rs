//! # rsai-chat
//!
//! Typed records for the chat completions API, with a strict decoder for the
//! function calls the model returns.
//!
//! The API encodes function arguments as a JSON string inside the JSON
//! response. This crate parses that string a second time and hands back
//! typed, ordered arguments.
//!
//! ## Quick Start
//!
//! ```rust
//! use rsai_chat::{ArgumentValue, parse_chat_completion};
//!
//! # fn main() -> Result<(), rsai_chat::LlmError> {
//! let body = br#"{
//!     "id": "chatcmpl-123",
//!     "object": "chat.completion",
//!     "created": 1700000000,
//!     "model": "gpt-4",
//!     "choices": [{
//!         "index": 0,
//!         "message": {
//!             "role": "assistant",
//!             "content": null,
//!             "function_call": {
//!                 "name": "get_weather",
//!                 "arguments": "{\"city\": \"Paris\", \"days\": 3}"
//!             }
//!         },
//!         "finish_reason": "function_call"
//!     }]
//! }"#;
//!
//! let completion = parse_chat_completion(body)?;
//! let call = completion.function_calls().next().expect("function call");
//!
//! assert_eq!(call.to_string(), r#"get_weather(city: "Paris", days: 3)"#);
//! assert_eq!(call.arguments()[1].value(), &ArgumentValue::Number(3.0));
//! # Ok(())
//! # }
//! ```
//!
//! ## Known Issues
//!
//! Function calls are decode-only. Serializing a message that carries one
//! fails with an explicit error.

pub mod completion;
pub mod core;
pub mod function_call;

pub use completion::{
    decode_function_call, decode_function_call_with, encode_request, parse_chat_completion,
};
pub use crate::core::{
    ChatCompletion, ChatCompletionRequest, ChatRole, Choice, FinishReason, FunctionCallMode,
    FunctionDefinition, LlmError, Message, Usage,
};
pub use function_call::{
    ArgumentDefinition, ArgumentType, ArgumentValue, DecoderConfig, FunctionCall,
    FunctionCallError, UnsupportedArgumentPolicy,
};
