//! WebSocket message DTOs for the estimation protocol.
//!
//! One JSON record per text frame, discriminated by its `type` field.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::domain::VoteMap;

/// `type` values accepted from clients
pub const CLIENT_MESSAGE_TYPES: &[&str] = &[
    "join",
    "vote",
    "storyChange",
    "revealVotes",
    "resetVotes",
    "fileUploaded",
    "ping",
];

/// Client -> server messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Join a room under a display name
    Join { room_id: String, user: String },
    /// Vote on the room's current story
    Vote {
        #[serde(deserialize_with = "string_or_number")]
        vote: String,
    },
    /// Select the story being estimated
    StoryChange { story: String },
    /// Reveal the votes of the current story
    RevealVotes,
    /// Clear the votes of the given story, or of the current one
    ResetVotes {
        #[serde(default)]
        story: Option<String>,
    },
    /// Share a file descriptor returned by the upload service
    FileUploaded { file: serde_json::Value },
    /// Keep-alive probe, answered with `pong` to the sender only
    Ping,
}

impl ClientMessage {
    /// Wire name of the message type
    pub fn kind(&self) -> &'static str {
        match self {
            ClientMessage::Join { .. } => "join",
            ClientMessage::Vote { .. } => "vote",
            ClientMessage::StoryChange { .. } => "storyChange",
            ClientMessage::RevealVotes => "revealVotes",
            ClientMessage::ResetVotes { .. } => "resetVotes",
            ClientMessage::FileUploaded { .. } => "fileUploaded",
            ClientMessage::Ping => "ping",
        }
    }

    /// Whether the session must have joined a room first
    pub fn requires_membership(&self) -> bool {
        !matches!(self, ClientMessage::Join { .. } | ClientMessage::Ping)
    }
}

/// Server -> client messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// Current member list of the room, in join order
    UserList { users: Vec<String> },
    /// Votes of one story
    VoteUpdate {
        story: String,
        votes: BTreeMap<String, String>,
    },
    /// The room's current story and its position in the story list
    StoryChange { story: String, index: usize },
    /// Votes of the current story, revealed to everyone
    RevealVotes { votes: BTreeMap<String, String> },
    /// File descriptor relayed verbatim
    FileUploaded { file: serde_json::Value },
    /// Answer to `ping`
    Pong,
}

impl ServerMessage {
    pub fn vote_update(story: &str, votes: &VoteMap) -> Self {
        ServerMessage::VoteUpdate {
            story: story.to_string(),
            votes: votes_to_wire(votes),
        }
    }

    pub fn reveal_votes(votes: &VoteMap) -> Self {
        ServerMessage::RevealVotes {
            votes: votes_to_wire(votes),
        }
    }
}

/// Votes keyed by display name, as sent on the wire.
///
/// Keys are serialized in display-name order, not in the order votes were cast.
pub fn votes_to_wire(votes: &VoteMap) -> BTreeMap<String, String> {
    votes
        .iter()
        .map(|(user, vote)| (user.as_str().to_string(), vote.as_str().to_string()))
        .collect()
}

/// Accept `"5"` as well as `5` for vote values.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}

/// Reasons an inbound frame is rejected before routing
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Frame is not a JSON object
    #[error("malformed frame: {0}")]
    Malformed(String),

    /// JSON object without a string `type` field
    #[error("frame has no `type` field")]
    MissingType,

    /// `type` is not part of the protocol
    #[error("unknown message type `{0}`")]
    UnknownType(String),

    /// Known `type` with fields of the wrong shape
    #[error("invalid `{kind}` payload: {source}")]
    InvalidPayload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Decode one text frame into a typed client message.
pub fn decode_client_message(text: &str) -> Result<ClientMessage, DecodeError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| DecodeError::Malformed(e.to_string()))?;
    let Some(object) = value.as_object() else {
        return Err(DecodeError::Malformed("expected a JSON object".to_string()));
    };
    let kind = object
        .get("type")
        .and_then(|t| t.as_str())
        .ok_or(DecodeError::MissingType)?
        .to_string();
    if !CLIENT_MESSAGE_TYPES.contains(&kind.as_str()) {
        return Err(DecodeError::UnknownType(kind));
    }
    serde_json::from_value(value).map_err(|source| DecodeError::InvalidPayload { kind, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{UserName, VoteValue};
    use serde_json::json;

    #[test]
    fn test_decode_join() {
        // テスト項目: join メッセージを roomId / user 付きでデコードできる
        // when (操作):
        let result = decode_client_message(r#"{"type":"join","roomId":"r1","user":"Alice"}"#);

        // then (期待する結果):
        assert_eq!(
            result.unwrap(),
            ClientMessage::Join {
                room_id: "r1".to_string(),
                user: "Alice".to_string()
            }
        );
    }

    #[test]
    fn test_decode_vote_accepts_number() {
        // テスト項目: 数値の投票値は文字列として扱われる
        // when (操作):
        let text = decode_client_message(r#"{"type":"vote","vote":"8"}"#).unwrap();
        let number = decode_client_message(r#"{"type":"vote","vote":8}"#).unwrap();

        // then (期待する結果):
        assert_eq!(text, number);
        assert_eq!(number.kind(), "vote");
    }

    #[test]
    fn test_decode_messages_without_fields() {
        // テスト項目: フィールドを持たないメッセージ (revealVotes / ping / resetVotes) をデコードできる
        // when (操作):
        let reveal = decode_client_message(r#"{"type":"revealVotes"}"#).unwrap();
        let ping = decode_client_message(r#"{"type":"ping"}"#).unwrap();
        let reset = decode_client_message(r#"{"type":"resetVotes"}"#).unwrap();
        let reset_story =
            decode_client_message(r#"{"type":"resetVotes","story":"S1"}"#).unwrap();

        // then (期待する結果):
        assert_eq!(reveal, ClientMessage::RevealVotes);
        assert_eq!(ping, ClientMessage::Ping);
        assert_eq!(reset, ClientMessage::ResetVotes { story: None });
        assert_eq!(
            reset_story,
            ClientMessage::ResetVotes {
                story: Some("S1".to_string())
            }
        );
    }

    #[test]
    fn test_decode_malformed_frame() {
        // テスト項目: JSON でないフレームは Malformed になる
        // when (操作):
        let not_json = decode_client_message("hello");
        let not_object = decode_client_message("[1,2,3]");

        // then (期待する結果):
        assert!(matches!(not_json, Err(DecodeError::Malformed(_))));
        assert!(matches!(not_object, Err(DecodeError::Malformed(_))));
    }

    #[test]
    fn test_decode_unknown_type() {
        // テスト項目: 未知の type は UnknownType になる
        // when (操作):
        let result = decode_client_message(r#"{"type":"chat","content":"hi"}"#);

        // then (期待する結果):
        assert!(matches!(result, Err(DecodeError::UnknownType(kind)) if kind == "chat"));
    }

    #[test]
    fn test_decode_missing_type_and_invalid_payload() {
        // テスト項目: type 欠落と必須フィールド欠落はそれぞれ別のエラーになる
        // when (操作):
        let missing = decode_client_message(r#"{"roomId":"r1"}"#);
        let invalid = decode_client_message(r#"{"type":"join","roomId":"r1"}"#);

        // then (期待する結果):
        assert!(matches!(missing, Err(DecodeError::MissingType)));
        assert!(matches!(
            invalid,
            Err(DecodeError::InvalidPayload { kind, .. }) if kind == "join"
        ));
    }

    #[test]
    fn test_server_message_wire_format() {
        // テスト項目: サーバーメッセージが type 付きの camelCase JSON になる
        // given (前提条件):
        let user_list = ServerMessage::UserList {
            users: vec!["Alice".to_string(), "Bob".to_string()],
        };
        let story = ServerMessage::StoryChange {
            story: "S1".to_string(),
            index: 0,
        };

        // when (操作):
        let user_list = serde_json::to_value(&user_list).unwrap();
        let story = serde_json::to_value(&story).unwrap();
        let pong = serde_json::to_value(ServerMessage::Pong).unwrap();

        // then (期待する結果):
        assert_eq!(user_list, json!({"type": "userList", "users": ["Alice", "Bob"]}));
        assert_eq!(story, json!({"type": "storyChange", "story": "S1", "index": 0}));
        assert_eq!(pong, json!({"type": "pong"}));
    }

    #[test]
    fn test_vote_keys_are_ordered_by_name() {
        // テスト項目: votes のキーは投票順ではなく表示名順で送られる
        // given (前提条件): Bob が先、Alice が後に投票
        let mut votes = VoteMap::new();
        votes.insert(
            UserName::new("Bob".to_string()).unwrap(),
            VoteValue::new("5".to_string()).unwrap(),
        );
        votes.insert(
            UserName::new("Alice".to_string()).unwrap(),
            VoteValue::new("8".to_string()).unwrap(),
        );

        // when (操作):
        let text = serde_json::to_string(&ServerMessage::vote_update("S1", &votes)).unwrap();

        // then (期待する結果):
        assert_eq!(
            text,
            r#"{"type":"voteUpdate","story":"S1","votes":{"Alice":"8","Bob":"5"}}"#
        );
    }
}
