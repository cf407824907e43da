//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ValueObjectError;

/// Maximum length of a room identifier (bytes)
pub const ROOM_ID_MAX_LEN: usize = 100;

/// Maximum length of a display name (bytes)
pub const USER_NAME_MAX_LEN: usize = 100;

/// Maximum length of a story identifier (bytes)
pub const STORY_ID_MAX_LEN: usize = 500;

/// Maximum length of a vote value (bytes)
pub const VOTE_VALUE_MAX_LEN: usize = 20;

/// Room identifier value object.
///
/// Opaque string supplied by the client (typically taken from a shareable link).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(String);

impl RoomId {
    /// Create a new RoomId.
    ///
    /// # Arguments
    ///
    /// * `id` - The room identifier string
    ///
    /// # Returns
    ///
    /// A Result containing the RoomId or an error if validation fails
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::RoomIdEmpty);
        }
        let len = id.len();
        if len > ROOM_ID_MAX_LEN {
            return Err(ValueObjectError::RoomIdTooLong {
                max: ROOM_ID_MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Self-asserted display name of a participant.
///
/// Surrounding whitespace is trimmed. Votes are keyed by this name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserName(String);

impl UserName {
    /// Create a new UserName.
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ValueObjectError::UserNameEmpty);
        }
        let len = name.len();
        if len > USER_NAME_MAX_LEN {
            return Err(ValueObjectError::UserNameTooLong {
                max: USER_NAME_MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(name))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Story identifier value object (usually the story title).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StoryId(String);

impl StoryId {
    /// Create a new StoryId.
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::StoryIdEmpty);
        }
        let len = id.len();
        if len > STORY_ID_MAX_LEN {
            return Err(ValueObjectError::StoryIdTooLong {
                max: STORY_ID_MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StoryId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for StoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Estimate value of a single vote ("5", "13", "?", "coffee", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteValue(String);

impl VoteValue {
    /// Create a new VoteValue.
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::VoteValueEmpty);
        }
        let len = value.len();
        if len > VOTE_VALUE_MAX_LEN {
            return Err(ValueObjectError::VoteValueTooLong {
                max: VOTE_VALUE_MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(value))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for VoteValue {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for VoteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of one physical connection. Never reused across reconnects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(uuid::Uuid);

impl SessionId {
    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID.
    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// File descriptor returned by the external upload service (`{name, url}`).
///
/// The server never inspects it beyond checking that it is a JSON object; it is
/// relayed verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileDescriptor(serde_json::Value);

impl FileDescriptor {
    /// Create a new FileDescriptor.
    pub fn new(value: serde_json::Value) -> Result<Self, ValueObjectError> {
        if !value.is_object() {
            return Err(ValueObjectError::FileDescriptorNotObject);
        }
        Ok(Self(value))
    }

    /// Get the raw JSON value.
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    /// Convert to the raw JSON value.
    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}

/// Timestamp value object.
///
/// Represents a Unix timestamp in milliseconds (JST).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a new Timestamp.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_new_success() {
        // テスト項目: 有効なルーム ID を作成できる
        // given (前提条件):
        let id = "r1".to_string();

        // when (操作):
        let result = RoomId::new(id);

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str(), "r1");
    }

    #[test]
    fn test_room_id_new_empty_fails() {
        // テスト項目: 空のルーム ID は作成できない
        // when (操作):
        let result = RoomId::new("".to_string());

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ValueObjectError::RoomIdEmpty);
    }

    #[test]
    fn test_room_id_new_too_long_fails() {
        // テスト項目: 101 バイト以上のルーム ID は作成できない
        // given (前提条件):
        let id = "a".repeat(101);

        // when (操作):
        let result = RoomId::new(id);

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::RoomIdTooLong {
                max: 100,
                actual: 101
            }
        );
    }

    #[test]
    fn test_user_name_is_trimmed() {
        // テスト項目: 表示名の前後の空白は取り除かれる
        // when (操作):
        let name = UserName::new("  Alice \n".to_string()).unwrap();

        // then (期待する結果):
        assert_eq!(name.as_str(), "Alice");
    }

    #[test]
    fn test_user_name_whitespace_only_fails() {
        // テスト項目: 空白のみの表示名は作成できない
        // when (操作):
        let result = UserName::new("   ".to_string());

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ValueObjectError::UserNameEmpty);
    }

    #[test]
    fn test_story_id_new_empty_fails() {
        // テスト項目: 空のストーリー ID は作成できない
        // when (操作):
        let result = StoryId::new(String::new());

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ValueObjectError::StoryIdEmpty);
    }

    #[test]
    fn test_vote_value_too_long_fails() {
        // テスト項目: 21 バイト以上の投票値は作成できない
        // when (操作):
        let result = VoteValue::new("9".repeat(21));

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::VoteValueTooLong {
                max: 20,
                actual: 21
            }
        );
    }

    #[test]
    fn test_file_descriptor_requires_object() {
        // テスト項目: ファイル記述子は JSON オブジェクトのみ受け付ける
        // given (前提条件):
        let object = serde_json::json!({"name": "design.pdf", "url": "/uploads/design.pdf"});
        let string = serde_json::json!("design.pdf");

        // when (操作):
        let ok = FileDescriptor::new(object.clone());
        let err = FileDescriptor::new(string);

        // then (期待する結果):
        assert_eq!(ok.unwrap().as_value(), &object);
        assert_eq!(err.unwrap_err(), ValueObjectError::FileDescriptorNotObject);
    }

    #[test]
    fn test_timestamp_ordering() {
        // テスト項目: タイムスタンプは順序付けできる
        // given (前提条件):
        let ts1 = Timestamp::new(1000);
        let ts2 = Timestamp::new(2000);

        // then (期待する結果):
        assert!(ts1 < ts2);
        assert_eq!(ts2.value(), 2000);
    }
}
