//! Narrow wire codec for the realtime API: the setup frame, user text turns,
//! and the server-content fields the transcript cares about. Anything else in
//! a server frame is ignored rather than rejected.

use serde::Deserialize;
use serde_json::json;

pub fn encode_setup_frame(model: &str, system_instruction: &str, voice: &str) -> String {
    json!({
        "setup": {
            "model": model,
            "systemInstruction": {
                "parts": [{ "text": system_instruction }]
            },
            "generationConfig": {
                "responseModalities": ["TEXT"],
                "speechConfig": {
                    "voiceConfig": {
                        "prebuiltVoiceConfig": { "voiceName": voice }
                    }
                }
            }
        }
    })
    .to_string()
}

pub fn encode_user_text_frame(text: &str) -> String {
    json!({
        "clientContent": {
            "turns": [{ "role": "user", "parts": [{ "text": text }] }],
            "turnComplete": true
        }
    })
    .to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerFrame {
    #[serde(default)]
    setup_complete: Option<serde_json::Value>,
    #[serde(default)]
    server_content: Option<ServerContent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ServerContent {
    #[serde(default)]
    model_turn: Option<ModelTurn>,
    #[serde(default)]
    turn_complete: bool,
    #[serde(default)]
    interrupted: bool,
}

#[derive(Debug, Deserialize)]
struct ModelTurn {
    #[serde(default)]
    parts: Vec<TurnPart>,
}

#[derive(Debug, Deserialize)]
struct TurnPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    SetupComplete,
    Delta(String),
    TurnComplete,
    Interrupted,
    Ignored,
}

/// Tolerant decode: frames that do not parse, or parse to nothing the UI
/// shows, come back as `Ignored`.
pub fn decode_server_frame(raw: &str) -> ServerEvent {
    let frame = match serde_json::from_str::<ServerFrame>(raw) {
        Ok(value) => value,
        Err(_) => return ServerEvent::Ignored,
    };
    if frame.setup_complete.is_some() {
        return ServerEvent::SetupComplete;
    }
    let Some(content) = frame.server_content else {
        return ServerEvent::Ignored;
    };
    if content.interrupted {
        return ServerEvent::Interrupted;
    }
    if let Some(turn) = content.model_turn {
        let text: String = turn
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect();
        if !text.is_empty() {
            return ServerEvent::Delta(text);
        }
    }
    if content.turn_complete {
        return ServerEvent::TurnComplete;
    }
    ServerEvent::Ignored
}

#[cfg(test)]
mod tests {
    use super::{
        decode_server_frame, encode_setup_frame, encode_user_text_frame, ServerEvent,
    };

    #[test]
    fn setup_frame_carries_model_instruction_and_voice() {
        let frame = encode_setup_frame("models/demo", "You are Nova.", "aoede");
        let value: serde_json::Value = serde_json::from_str(&frame).expect("valid json");
        assert_eq!(value["setup"]["model"], "models/demo");
        assert_eq!(
            value["setup"]["systemInstruction"]["parts"][0]["text"],
            "You are Nova."
        );
        assert_eq!(
            value["setup"]["generationConfig"]["speechConfig"]["voiceConfig"]
                ["prebuiltVoiceConfig"]["voiceName"],
            "aoede"
        );
    }

    #[test]
    fn user_text_frame_marks_the_turn_complete() {
        let frame = encode_user_text_frame("hello there");
        let value: serde_json::Value = serde_json::from_str(&frame).expect("valid json");
        assert_eq!(value["clientContent"]["turnComplete"], true);
        assert_eq!(
            value["clientContent"]["turns"][0]["parts"][0]["text"],
            "hello there"
        );
    }

    #[test]
    fn decode_collects_text_parts_into_a_delta() {
        let event = decode_server_frame(
            r#"{"serverContent":{"modelTurn":{"parts":[{"text":"Hel"},{"text":"lo"}]}}}"#,
        );
        assert_eq!(event, ServerEvent::Delta("Hello".to_string()));
    }

    #[test]
    fn decode_maps_lifecycle_frames() {
        assert_eq!(
            decode_server_frame(r#"{"setupComplete":{}}"#),
            ServerEvent::SetupComplete
        );
        assert_eq!(
            decode_server_frame(r#"{"serverContent":{"turnComplete":true}}"#),
            ServerEvent::TurnComplete
        );
        assert_eq!(
            decode_server_frame(r#"{"serverContent":{"interrupted":true}}"#),
            ServerEvent::Interrupted
        );
    }

    #[test]
    fn decode_ignores_unknown_or_malformed_frames() {
        assert_eq!(decode_server_frame("not json"), ServerEvent::Ignored);
        assert_eq!(
            decode_server_frame(r#"{"usageMetadata":{"tokens":12}}"#),
            ServerEvent::Ignored
        );
        assert_eq!(
            decode_server_frame(r#"{"serverContent":{"modelTurn":{"parts":[]}}}"#),
            ServerEvent::Ignored
        );
    }
}
