//! UseCase: 投票公開処理

use std::sync::Arc;

use crate::{
    domain::{ConnectionSession, RoomRepository, StoryId, VoteMap},
    infrastructure::{broadcast::Broadcaster, dto::websocket::ServerMessage},
};

use super::{error::RoomOperationError, joined_room};

/// 投票公開のユースケース
pub struct RevealVotesUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl RevealVotesUseCase {
    /// 新しい RevealVotesUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 現在のストーリーを公開済みにし、その投票を revealVotes としてブロードキャストする
    ///
    /// 投票そのものは変更しない。
    pub async fn execute(
        &self,
        session: &ConnectionSession,
    ) -> Result<(StoryId, VoteMap), RoomOperationError> {
        let (shared, _) = joined_room(self.repository.as_ref(), session).await?;
        let mut room = shared.lock().await;

        let (story, votes) = room.reveal()?;
        // Enqueue only; socket writes happen in each connection's writer task
        Broadcaster::fan_out(&room, &ServerMessage::reveal_votes(&votes));

        Ok((story, votes))
    }
}
