use serde::Deserialize;

/// What the decoder does with an argument whose value is neither a number nor
/// a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnsupportedArgumentPolicy {
    /// Drop the argument and emit a warning event.
    #[default]
    Skip,
    /// Fail the whole decode.
    Reject,
}

/// Configuration for decoding function calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Handling of boolean, null, array and object argument values (default: skip)
    pub unsupported_arguments: UnsupportedArgumentPolicy,
}

impl DecoderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject unsupported argument values instead of dropping them.
    pub fn strict() -> Self {
        Self::new().unsupported_arguments(UnsupportedArgumentPolicy::Reject)
    }

    pub fn unsupported_arguments(mut self, policy: UnsupportedArgumentPolicy) -> Self {
        self.unsupported_arguments = policy;
        self
    }
}
