//! UseCase: 投票リセット処理

use std::sync::Arc;

use crate::{
    domain::{ConnectionSession, RoomRepository, StoryId, VoteMap},
    infrastructure::{broadcast::Broadcaster, dto::websocket::ServerMessage},
};

use super::{error::RoomOperationError, joined_room};

/// 投票リセットのユースケース
pub struct ResetVotesUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl ResetVotesUseCase {
    /// 新しい ResetVotesUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 指定したストーリー（省略時は現在のストーリー）の投票を消し、
    /// 空の voteUpdate をブロードキャストする
    ///
    /// # Returns
    ///
    /// * `Ok(StoryId)` - リセットしたストーリー
    /// * `Err(RoomOperationError)` - 未参加、または対象ストーリーなし
    pub async fn execute(
        &self,
        session: &ConnectionSession,
        story: Option<StoryId>,
    ) -> Result<StoryId, RoomOperationError> {
        let (shared, user) = joined_room(self.repository.as_ref(), session).await?;
        let mut room = shared.lock().await;

        let story = room.reset_votes(story)?;
        tracing::info!("'{}' reset votes of '{}' in room '{}'", user, story, room.id);
        // Enqueue only; socket writes happen in each connection's writer task
        Broadcaster::fan_out(
            &room,
            &ServerMessage::vote_update(story.as_str(), &VoteMap::new()),
        );

        Ok(story)
    }
}
