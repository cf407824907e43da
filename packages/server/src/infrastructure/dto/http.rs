//! HTTP API response DTOs for the inspection endpoints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Room summary for list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: String,
    pub members: Vec<String>,
    pub current_story: Option<String>,
    pub created_at: String, // ISO 8601
}

/// Room detail for detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub id: String,
    pub members: Vec<String>,
    pub sessions: Vec<SessionDetailDto>,
    pub current_story: Option<String>,
    pub stories: Vec<StoryDetailDto>,
    pub files: Vec<serde_json::Value>,
    pub created_at: String, // ISO 8601
}

/// Active session for room detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDetailDto {
    pub session_id: String,
    pub user: String,
    pub joined_at: String, // ISO 8601
}

/// Story for room detail endpoint. Votes are only exposed once revealed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryDetailDto {
    pub story: String,
    pub vote_count: usize,
    pub revealed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub votes: Option<BTreeMap<String, String>>,
}
