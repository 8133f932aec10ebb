use serde_json::error::Category;
use thiserror::Error;

use crate::function_call::FunctionCallError;

#[derive(Error, Debug)]
pub enum LlmError {
    /// The input was not well-formed JSON.
    #[error("Parse error: {message}")]
    Parse {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The input was valid JSON but did not have the expected shape.
    #[error("Decode error: {message}")]
    Decode {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Encode error: {message}")]
    Encode {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Function call error: {0}")]
    FunctionCall(#[from] FunctionCallError),
}

impl LlmError {
    /// Classify a `serde_json` error raised while reading `what`.
    pub(crate) fn from_json(what: &str, err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Data => LlmError::Decode {
                message: format!("Failed to decode {what}"),
                source: Box::new(err),
            },
            Category::Syntax | Category::Eof | Category::Io => LlmError::Parse {
                message: format!("Failed to parse {what} as JSON"),
                source: Box::new(err),
            },
        }
    }

    pub(crate) fn from_encode(what: &str, err: serde_json::Error) -> Self {
        LlmError::Encode {
            message: format!("Failed to serialize {what}"),
            source: Box::new(err),
        }
    }
}
