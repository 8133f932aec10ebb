use rsai_chat::{
    ArgumentDefinition, ArgumentType, ArgumentValue, DecoderConfig, FunctionCall,
    FunctionCallError, LlmError, decode_function_call, decode_function_call_with,
};
use serde_json::json;
use std::io;
use std::sync::{Arc, Mutex};

fn payload(name: &str, arguments: &serde_json::Value) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "name": name,
        "arguments": arguments.to_string(),
    }))
    .unwrap()
}

#[test]
fn test_weather_scenario() {
    let bytes = payload("get_weather", &json!({ "city": "Paris", "days": 3 }));
    let call = decode_function_call(&bytes).unwrap();

    assert_eq!(call.name(), "get_weather");
    assert_eq!(
        call.arguments(),
        &[
            ArgumentDefinition::string("city", "Paris"),
            ArgumentDefinition::number("days", 3.0),
        ]
    );
}

#[test]
fn test_argument_count_and_types_match_payload() {
    let bytes = br#"{"name": "book_trip", "arguments": "{\"from\": \"Lisbon\", \"to\": \"Tokyo\", \"budget\": 1200.5, \"travellers\": 2}"}"#;
    let call = decode_function_call(bytes).unwrap();

    let summary: Vec<(&str, ArgumentType)> = call
        .arguments()
        .iter()
        .map(|arg| (arg.name(), arg.r#type()))
        .collect();

    assert_eq!(
        summary,
        vec![
            ("from", ArgumentType::String),
            ("to", ArgumentType::String),
            ("budget", ArgumentType::Number),
            ("travellers", ArgumentType::Number),
        ]
    );
    assert_eq!(
        call.argument("budget").map(|a| a.value()),
        Some(&ArgumentValue::Number(1200.5))
    );
}

#[test]
fn test_escaped_strings_survive_both_passes() {
    let bytes = payload(
        "echo",
        &json!({ "text": "line one\nline \"two\"", "emoji": "caf\u{e9}" }),
    );
    let call = decode_function_call(&bytes).unwrap();

    assert_eq!(
        call.argument("text").and_then(|a| a.value().as_str()),
        Some("line one\nline \"two\"")
    );
    assert_eq!(
        call.argument("emoji").and_then(|a| a.value().as_str()),
        Some("caf\u{e9}")
    );
}

#[test]
fn test_empty_arguments_string() {
    let call = decode_function_call(br#"{"name": "list_files", "arguments": ""}"#).unwrap();
    assert_eq!(call, FunctionCall::new("list_files", vec![]));
}

#[test]
fn test_key_order_is_enforced() {
    let err = decode_function_call(br#"{"arguments": "{}", "name": "get_weather"}"#).unwrap_err();

    match err {
        LlmError::Decode { source, .. } => {
            assert!(source.to_string().contains("expected key `name`"));
        }
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[test]
fn test_non_object_input_is_a_decode_error() {
    let err = decode_function_call(br#""get_weather""#).unwrap_err();
    assert!(matches!(err, LlmError::Decode { .. }));
}

#[test]
fn test_malformed_inner_payload_is_a_decode_error() {
    let err = decode_function_call(br#"{"name": "f", "arguments": "{\"city\": "}"#).unwrap_err();

    match err {
        LlmError::Decode { source, .. } => {
            assert!(source.to_string().contains("arguments payload is not a JSON object"));
        }
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[test]
fn test_strict_config_rejects_booleans() {
    let bytes = payload("set_flag", &json!({ "enabled": true }));

    assert!(decode_function_call(&bytes).is_ok());

    let err = decode_function_call_with(&bytes, &DecoderConfig::strict()).unwrap_err();
    match err {
        LlmError::Decode { source, .. } => {
            assert!(source.to_string().contains("unsupported value kind `boolean`"));
        }
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[test]
fn test_from_parts_uses_arguments_decoder() {
    let call = FunctionCall::from_parts(
        "get_weather",
        r#"{"city": "Paris", "days": 3}"#,
        &DecoderConfig::default(),
    )
    .unwrap();
    assert_eq!(call.arguments().len(), 2);

    let err = FunctionCall::from_parts("get_weather", r#"{"days": [3]}"#, &DecoderConfig::strict())
        .unwrap_err();
    assert!(matches!(
        err,
        LlmError::FunctionCall(FunctionCallError::UnsupportedArgumentKind { kind: "array", .. })
    ));
}

#[test]
fn test_function_call_never_serializes() {
    let calls = [
        FunctionCall::new("noop", vec![]),
        FunctionCall::new("get_weather", vec![ArgumentDefinition::string("city", "Paris")]),
    ];

    for call in &calls {
        let err = serde_json::to_string(call).unwrap_err();
        assert!(err.to_string().contains("not supported"));
    }
}

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_dropped_argument_is_logged() {
    let buffer = SharedBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let bytes = payload("set_flag", &json!({ "enabled": true, "label": "on" }));
    let call = tracing::subscriber::with_default(subscriber, || decode_function_call(&bytes))
        .unwrap();

    assert_eq!(call.arguments(), &[ArgumentDefinition::string("label", "on")]);

    let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
    assert!(output.contains("Dropping function argument with unsupported value kind"));
    assert!(output.contains("argument=enabled"));
    assert!(output.contains("kind=\"boolean\""));
}
