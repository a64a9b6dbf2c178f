// Tests for the WebSocket wire protocol: inbound command parsing and
// outbound event serialization.

use serde_json::{json, Value};
use streamscribe::protocol::{ControlCommand, OutboundEvent};

#[test]
fn test_parse_flush_command() {
    assert_eq!(
        ControlCommand::parse(r#"{"command":"flush"}"#),
        ControlCommand::Flush
    );
}

#[test]
fn test_parse_end_command() {
    assert_eq!(
        ControlCommand::parse(r#"{"command":"end"}"#),
        ControlCommand::End
    );
}

#[test]
fn test_parse_command_is_case_insensitive() {
    assert_eq!(
        ControlCommand::parse(r#"{"command":"FLUSH"}"#),
        ControlCommand::Flush
    );
    assert_eq!(
        ControlCommand::parse(r#"{"command":"End"}"#),
        ControlCommand::End
    );
}

#[test]
fn test_parse_unknown_command_keeps_payload() {
    let parsed = ControlCommand::parse(r#"{"command":"rewind","offset":3}"#);
    match parsed {
        ControlCommand::Unknown(payload) => {
            assert_eq!(payload["command"], "rewind");
            assert_eq!(payload["offset"], 3);
        }
        other => panic!("expected Unknown, got {:?}", other),
    }
}

#[test]
fn test_parse_missing_command_field() {
    let parsed = ControlCommand::parse(r#"{"foo":"bar"}"#);
    assert!(matches!(parsed, ControlCommand::Unknown(_)));
}

#[test]
fn test_parse_malformed_json_degrades_to_unknown() {
    let parsed = ControlCommand::parse("this is not json");
    match parsed {
        ControlCommand::Unknown(payload) => {
            assert_eq!(payload["command"], "unknown");
            assert_eq!(payload["raw"], "this is not json");
        }
        other => panic!("expected Unknown, got {:?}", other),
    }
}

#[test]
fn test_ack_serialization() {
    let event = OutboundEvent::Ack { buffered_count: 3 };
    let value: Value = serde_json::to_value(&event).unwrap();
    assert_eq!(value, json!({"type": "ack", "buffered_count": 3}));
}

#[test]
fn test_partial_serialization() {
    let event = OutboundEvent::Partial {
        text: "hello world".to_string(),
    };
    let value: Value = serde_json::to_value(&event).unwrap();
    assert_eq!(value, json!({"type": "partial", "text": "hello world"}));
}

#[test]
fn test_final_serialization() {
    let event = OutboundEvent::Final {
        text: "done".to_string(),
        full_text: "all done".to_string(),
    };
    let value: Value = serde_json::to_value(&event).unwrap();
    assert_eq!(
        value,
        json!({"type": "final", "text": "done", "full_text": "all done"})
    );
}

#[test]
fn test_error_serialization() {
    let event = OutboundEvent::error("boom");
    let value: Value = serde_json::to_value(&event).unwrap();
    assert_eq!(value, json!({"type": "error", "error": "boom"}));
}

#[test]
fn test_info_without_payload_omits_field() {
    let event = OutboundEvent::info("ending session");
    let value: Value = serde_json::to_value(&event).unwrap();
    assert_eq!(value, json!({"type": "info", "msg": "ending session"}));
    assert!(value.get("payload").is_none());
}

#[test]
fn test_info_with_payload() {
    let event = OutboundEvent::Info {
        msg: "unknown command".to_string(),
        payload: Some(json!({"command": "bogus"})),
    };
    let value: Value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["payload"]["command"], "bogus");
}

#[test]
fn test_event_roundtrip() {
    let event = OutboundEvent::Final {
        text: "a".to_string(),
        full_text: "b".to_string(),
    };
    let json = serde_json::to_string(&event).unwrap();
    let back: OutboundEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(back, event);
}
