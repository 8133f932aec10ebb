pub mod error;
pub mod types;

pub use error::LlmError;
pub use types::{
    ChatCompletion, ChatCompletionRequest, ChatRole, Choice, FinishReason, FunctionCallMode,
    FunctionDefinition, Message, Usage,
};
