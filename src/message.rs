//! # Pub/Sub Message Decoding
//!
//! This module decodes the Pub/Sub push envelope into a [`Command`]. The
//! envelope carries a base64-encoded text payload of the form
//! `vm_name:zone:action` plus an optional string-to-string attribute map,
//! which is passed through unchanged as the command's `params`.
//!
//! The action is resolved to the closed [`Action`] enum here, at decode
//! time, so everything downstream dispatches over an exhaustive match.

use std::collections::HashMap;
use std::fmt;

use base64::prelude::*;
use serde::Deserialize;
use thiserror::Error;

/// Errors produced while turning a push envelope into a [`Command`].
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid push envelope: {0}")]
    Envelope(#[from] serde_json::Error),
    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("invalid message format, expected vm_name:zone:action but got {0} fields")]
    FieldCount(usize),
    #[error("invalid action: {0}")]
    Action(String),
}

/// The outer wrapper Pub/Sub POSTs to a push endpoint.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub message: PubsubMessage,
    #[serde(default)]
    pub subscription: Option<String>,
}

/// The message object inside the envelope.
#[derive(Debug, Deserialize)]
pub struct PubsubMessage {
    /// Base64-encoded text payload.
    pub data: String,
    /// Optional extra parameters, only meaningful for `create`.
    #[serde(default)]
    pub attributes: Option<HashMap<String, String>>,
    #[serde(rename = "messageId", default)]
    pub message_id: Option<String>,
}

/// The four lifecycle operations this service knows how to issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Stop,
    Create,
    Delete,
}

impl Action {
    /// Parses an action name, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, DecodeError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" => Ok(Action::Start),
            "stop" => Ok(Action::Stop),
            "create" => Ok(Action::Create),
            "delete" => Ok(Action::Delete),
            _ => Err(DecodeError::Action(s.trim().to_string())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Start => "start",
            Action::Stop => "stop",
            Action::Create => "create",
            Action::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// A fully decoded instruction: which VM, where, and what to do with it.
#[derive(Debug, Clone)]
pub struct Command {
    pub vm_name: String,
    pub zone: String,
    pub action: Action,
    pub params: HashMap<String, String>,
}

impl Command {
    /// Decodes the base64 payload of an envelope and parses it.
    pub fn from_envelope(envelope: &Envelope) -> Result<Self, DecodeError> {
        let raw = BASE64_STANDARD.decode(&envelope.message.data)?;
        let text = String::from_utf8(raw)?;
        let (vm_name, zone, action) = parse_message(&text)?;
        Ok(Command {
            vm_name,
            zone,
            action,
            params: envelope.message.attributes.clone().unwrap_or_default(),
        })
    }
}

/// Parses the raw envelope bytes as JSON and decodes the command inside.
pub fn decode_envelope(body: &[u8]) -> Result<Command, DecodeError> {
    let envelope: Envelope = serde_json::from_slice(body)?;
    Command::from_envelope(&envelope)
}

/// Expects the format `vm_name:zone:action`,
/// e.g. `patriciomallea-vm:europe-southwest1-b:start`.
pub fn parse_message(msg: &str) -> Result<(String, String, Action), DecodeError> {
    let parts: Vec<&str> = msg.split(':').collect();
    if parts.len() != 3 {
        return Err(DecodeError::FieldCount(parts.len()));
    }
    let vm_name = parts[0].trim().to_string();
    let zone = parts[1].trim().to_string();
    let action = Action::parse(parts[2])?;
    Ok((vm_name, zone, action))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope_json(payload: &str, attributes: Option<&[(&str, &str)]>) -> String {
        let message = match attributes {
            Some(attrs) => {
                let attrs: HashMap<&str, &str> = attrs.iter().copied().collect();
                serde_json::json!({
                    "data": BASE64_STANDARD.encode(payload),
                    "attributes": attrs,
                    "messageId": "1234",
                })
            }
            None => serde_json::json!({
                "data": BASE64_STANDARD.encode(payload),
            }),
        };
        serde_json::json!({
            "message": message,
            "subscription": "projects/p/subscriptions/s",
        })
        .to_string()
    }

    #[test]
    fn parse_message_trims_fields() {
        let (vm, zone, action) = parse_message(" my-vm : us-central1-a : start ").unwrap();
        assert_eq!(vm, "my-vm");
        assert_eq!(zone, "us-central1-a");
        assert_eq!(action, Action::Start);
    }

    #[test]
    fn parse_message_rejects_wrong_field_counts() {
        for msg in ["", "my-vm", "my-vm:us-central1-a", "a:b:c:d", "a:b:c:d:e"] {
            match parse_message(msg) {
                Err(DecodeError::FieldCount(_)) => {}
                other => panic!("expected field count error for {msg:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn action_parse_is_case_insensitive() {
        assert_eq!(Action::parse("START").unwrap(), Action::Start);
        assert_eq!(Action::parse("Stop").unwrap(), Action::Stop);
        assert_eq!(Action::parse("  create ").unwrap(), Action::Create);
        assert_eq!(Action::parse("delete").unwrap(), Action::Delete);
    }

    #[test]
    fn action_parse_names_the_offending_string() {
        match Action::parse("restart") {
            Err(DecodeError::Action(s)) => assert_eq!(s, "restart"),
            other => panic!("expected invalid action, got {other:?}"),
        }
    }

    #[test]
    fn decode_start_command() {
        let body = envelope_json("patriciomallea-vm:europe-southwest1-b:start", None);
        let command = decode_envelope(body.as_bytes()).unwrap();
        assert_eq!(command.vm_name, "patriciomallea-vm");
        assert_eq!(command.zone, "europe-southwest1-b");
        assert_eq!(command.action, Action::Start);
        assert!(command.params.is_empty());
    }

    #[test]
    fn decode_passes_attributes_through() {
        let body = envelope_json(
            "my-vm:us-central1-a:create",
            Some(&[("machine_type", "e2-medium")]),
        );
        let command = decode_envelope(body.as_bytes()).unwrap();
        assert_eq!(command.action, Action::Create);
        assert_eq!(
            command.params.get("machine_type").map(String::as_str),
            Some("e2-medium")
        );
    }

    #[test]
    fn decode_rejects_bad_envelope_json() {
        assert!(matches!(
            decode_envelope(b"not json"),
            Err(DecodeError::Envelope(_))
        ));
        // Valid JSON but not a push envelope.
        assert!(matches!(
            decode_envelope(b"{\"data\": \"xyz\"}"),
            Err(DecodeError::Envelope(_))
        ));
    }

    #[test]
    fn decode_rejects_bad_base64() {
        let body = serde_json::json!({"message": {"data": "%%%"}}).to_string();
        assert!(matches!(
            decode_envelope(body.as_bytes()),
            Err(DecodeError::Base64(_))
        ));
    }

    #[test]
    fn decode_rejects_non_utf8_payload() {
        let body = serde_json::json!({
            "message": {"data": BASE64_STANDARD.encode([0xffu8, 0xfe, 0xfd])}
        })
        .to_string();
        assert!(matches!(
            decode_envelope(body.as_bytes()),
            Err(DecodeError::Utf8(_))
        ));
    }
}
