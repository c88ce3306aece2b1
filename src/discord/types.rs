//! Discord wire types (gateway v10 + REST)

use serde::{Deserialize, Serialize};

// Gateway opcodes
pub const OP_DISPATCH: u8 = 0;
pub const OP_HEARTBEAT: u8 = 1;
pub const OP_IDENTIFY: u8 = 2;
pub const OP_RECONNECT: u8 = 7;
pub const OP_INVALID_SESSION: u8 = 9;
pub const OP_HELLO: u8 = 10;
pub const OP_HEARTBEAT_ACK: u8 = 11;

// Gateway intents
pub const INTENT_GUILDS: u64 = 1 << 0;
pub const INTENT_GUILD_MESSAGES: u64 = 1 << 9;
pub const INTENT_MESSAGE_CONTENT: u64 = 1 << 15;

/// Intents the bot identifies with: guild metadata, guild messages, and
/// message content for command parsing.
pub const BOT_INTENTS: u64 = INTENT_GUILDS | INTENT_GUILD_MESSAGES | INTENT_MESSAGE_CONTENT;

/// Incoming gateway frame envelope
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayFrame {
    pub op: u8,
    #[serde(default)]
    pub d: serde_json::Value,
    /// Sequence number, dispatch frames only
    #[serde(default)]
    pub s: Option<u64>,
    /// Dispatch event name
    #[serde(default)]
    pub t: Option<String>,
}

/// Hello payload (op 10)
#[derive(Debug, Clone, Deserialize)]
pub struct HelloData {
    pub heartbeat_interval: u64,
}

/// Ready dispatch payload
#[derive(Debug, Clone, Deserialize)]
pub struct ReadyData {
    pub user: User,
    #[serde(default)]
    pub session_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub bot: bool,
}

/// Message-create dispatch payload, reduced to the fields the bot reads
#[derive(Debug, Clone, Deserialize)]
pub struct MessageCreate {
    pub id: String,
    pub channel_id: String,
    pub content: String,
    pub author: User,
}

/// Events surfaced from the gateway to the main loop
#[derive(Debug, Clone)]
pub enum GatewayEvent {
    Ready(ReadyData),
    Message(MessageCreate),
    Connected,
    Disconnected,
}

// REST request bodies

#[derive(Debug, Clone, Serialize)]
pub struct CreateMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
    /// ISO8601 timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedFooter {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bot_intents_bitmask() {
        assert_eq!(BOT_INTENTS, 1 + 512 + 32_768);
    }

    #[test]
    fn frame_parses_dispatch_with_sequence() {
        let raw = r#"{"op":0,"d":{"content":"!stock","id":"1","channel_id":"2","author":{"id":"3","username":"u","bot":false}},"s":42,"t":"MESSAGE_CREATE"}"#;
        let frame: GatewayFrame = serde_json::from_str(raw).unwrap();
        assert_eq!(frame.op, OP_DISPATCH);
        assert_eq!(frame.s, Some(42));
        assert_eq!(frame.t.as_deref(), Some("MESSAGE_CREATE"));

        let msg: MessageCreate = serde_json::from_value(frame.d).unwrap();
        assert_eq!(msg.content, "!stock");
        assert!(!msg.author.bot);
    }

    #[test]
    fn frame_parses_hello_without_sequence() {
        let raw = r#"{"op":10,"d":{"heartbeat_interval":41250},"s":null,"t":null}"#;
        let frame: GatewayFrame = serde_json::from_str(raw).unwrap();
        assert_eq!(frame.op, OP_HELLO);
        let hello: HelloData = serde_json::from_value(frame.d).unwrap();
        assert_eq!(hello.heartbeat_interval, 41_250);
    }

    #[test]
    fn create_message_omits_empty_parts() {
        let body = CreateMessage {
            content: Some("hi".to_string()),
            embeds: Vec::new(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"content":"hi"}"#);
    }

    #[test]
    fn embed_serializes_fields_and_footer() {
        let embed = Embed {
            title: Some("t".to_string()),
            color: Some(0xFFA500),
            fields: vec![EmbedField {
                name: "n".to_string(),
                value: "v".to_string(),
                inline: false,
            }],
            footer: Some(EmbedFooter {
                text: "f".to_string(),
                icon_url: None,
            }),
            timestamp: None,
        };
        let json = serde_json::to_value(&embed).unwrap();
        assert_eq!(json["color"], 16_753_920);
        assert_eq!(json["fields"][0]["name"], "n");
        assert_eq!(json["footer"]["text"], "f");
        assert!(json.get("timestamp").is_none());
    }
}
