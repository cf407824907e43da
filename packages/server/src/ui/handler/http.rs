//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use yosoku_shared::time::timestamp_to_jst_rfc3339;

use crate::{
    domain::{Room, RoomId},
    infrastructure::dto::{
        http::{RoomDetailDto, RoomSummaryDto, SessionDetailDto, StoryDetailDto},
        websocket::votes_to_wire,
    },
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let mut summaries = Vec::new();
    for shared in state.repository.list().await {
        let room = shared.lock().await;
        summaries.push(RoomSummaryDto {
            id: room.id.as_str().to_string(),
            members: member_names(&room),
            current_story: room.current_story().map(|s| s.as_str().to_string()),
            created_at: timestamp_to_jst_rfc3339(room.created_at.value()),
        });
    }
    Json(summaries)
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    let room_id = RoomId::try_from(room_id).map_err(|_| StatusCode::NOT_FOUND)?;
    let shared = state
        .repository
        .find(&room_id)
        .await
        .ok_or(StatusCode::NOT_FOUND)?;
    let room = shared.lock().await;
    Ok(Json(room_detail(&room)))
}

fn member_names(room: &Room) -> Vec<String> {
    room.members()
        .iter()
        .map(|m| m.as_str().to_string())
        .collect()
}

fn room_detail(room: &Room) -> RoomDetailDto {
    let mut sessions: Vec<SessionDetailDto> = room
        .sessions()
        .map(|(id, handle)| SessionDetailDto {
            session_id: id.to_string(),
            user: handle.user.as_str().to_string(),
            joined_at: timestamp_to_jst_rfc3339(handle.joined_at.value()),
        })
        .collect();
    // Sort by joined_at for consistent ordering
    sessions.sort_by(|a, b| a.joined_at.cmp(&b.joined_at).then(a.user.cmp(&b.user)));

    let stories = room
        .stories()
        .iter()
        .map(|story| {
            let votes = room.votes_for(story);
            let revealed = room.is_revealed(story);
            StoryDetailDto {
                story: story.as_str().to_string(),
                vote_count: votes.len(),
                revealed,
                votes: revealed.then(|| votes_to_wire(&votes)),
            }
        })
        .collect();

    RoomDetailDto {
        id: room.id.as_str().to_string(),
        members: member_names(room),
        sessions,
        current_story: room.current_story().map(|s| s.as_str().to_string()),
        stories,
        files: room.files().iter().map(|f| f.as_value().clone()).collect(),
        created_at: timestamp_to_jst_rfc3339(room.created_at.value()),
    }
}
