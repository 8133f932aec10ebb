use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::LlmError;
use crate::function_call::FunctionCall;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
    /// Carries the result of a function the model asked for.
    Function,
}

/// A single chat message.
///
/// Assistant messages returned by the API may carry a [`FunctionCall`] instead
/// of text content. Such messages cannot be serialized back, since the API
/// never accepts function calls in this representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: ChatRole,

    /// Serialized as `null` when absent: the API expects the key on
    /// assistant messages even without text.
    #[serde(default)]
    pub content: Option<String>,

    /// Author name. Required by the API for `function` messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
}

impl Message {
    fn text(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            name: None,
            function_call: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::text(ChatRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::text(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::text(ChatRole::Assistant, content)
    }

    /// The result of calling function `name`, to be sent back to the model.
    pub fn function(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::text(ChatRole::Function, content)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    FunctionCall,
    ContentFilter,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Choice {
    pub index: u32,
    pub message: Message,
    #[serde(default)]
    pub finish_reason: Option<FinishReason>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Top-level response envelope of the chat completions endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatCompletion {
    pub id: String,
    /// Always `chat.completion`
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub created: u64,
    pub model: String,
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatCompletion {
    pub fn first_message(&self) -> Option<&Message> {
        self.choices.first().map(|choice| &choice.message)
    }

    /// Function calls across all choices, in choice order.
    pub fn function_calls(&self) -> impl Iterator<Item = &FunctionCall> {
        self.choices
            .iter()
            .filter_map(|choice| choice.message.function_call.as_ref())
    }
}

/// A function the model may call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDefinition {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema of the parameters object.
    pub parameters: Value,
}

impl FunctionDefinition {
    pub fn new(name: impl Into<String>, description: Option<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description,
            parameters,
        }
    }

    /// Derive the parameters schema from `T`.
    pub fn for_type<T: schemars::JsonSchema>(
        name: impl Into<String>,
        description: Option<String>,
    ) -> Result<Self, LlmError> {
        let schema = schemars::schema_for!(T);
        let mut parameters = serde_json::to_value(&schema)
            .map_err(|e| LlmError::from_encode("JSON schema", e))?;

        if let Value::Object(map) = &mut parameters {
            map.remove("$schema");
            map.remove("title");
        }

        Ok(Self::new(name, description, parameters))
    }
}

/// Request-side control over whether the model calls a function.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionCallMode {
    None,
    Auto,
    Function { name: String },
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum SerializableFunctionCallMode<'a> {
    Mode(CallMode),
    Definite { name: &'a str },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum CallMode {
    None,
    Auto,
}

impl Serialize for FunctionCallMode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let serializable = match self {
            FunctionCallMode::None => SerializableFunctionCallMode::Mode(CallMode::None),
            FunctionCallMode::Auto => SerializableFunctionCallMode::Mode(CallMode::Auto),
            FunctionCallMode::Function { name } => {
                SerializableFunctionCallMode::Definite { name: name.as_str() }
            }
        };
        serializable.serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,

    pub messages: Vec<Message>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub functions: Option<Vec<FunctionDefinition>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCallMode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Alter this or temperature but not both.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl ChatCompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            functions: None,
            function_call: None,
            temperature: None,
            top_p: None,
            max_tokens: None,
            stream: None,
            user: None,
        }
    }

    pub fn add_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    pub fn add_function(mut self, function: FunctionDefinition) -> Self {
        self.functions.get_or_insert_with(Vec::new).push(function);
        self
    }

    pub fn function_call(mut self, mode: FunctionCallMode) -> Self {
        self.function_call = Some(mode);
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn stream(mut self, stream: bool) -> Self {
        self.stream = Some(stream);
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }
}
