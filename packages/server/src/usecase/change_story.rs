//! UseCase: ストーリー切り替え処理
//!
//! ストーリーを切り替えても既存の投票は消さない（ストーリーごとに保持）。

use std::sync::Arc;

use crate::{
    domain::{ConnectionSession, RoomRepository, StoryId},
    infrastructure::{broadcast::Broadcaster, dto::websocket::ServerMessage},
};

use super::{error::RoomOperationError, joined_room};

/// ストーリー切り替えのユースケース
pub struct ChangeStoryUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl ChangeStoryUseCase {
    /// 新しい ChangeStoryUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// ストーリー切り替えを実行
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - ルームのストーリー一覧におけるインデックス
    /// * `Err(RoomOperationError)` - 未参加
    pub async fn execute(
        &self,
        session: &ConnectionSession,
        story: StoryId,
    ) -> Result<usize, RoomOperationError> {
        let (shared, user) = joined_room(self.repository.as_ref(), session).await?;
        let mut room = shared.lock().await;

        let index = room.select_story(story.clone());
        tracing::info!("'{}' selected story '{}' in room '{}'", user, story, room.id);
        // Enqueue only; socket writes happen in each connection's writer task
        Broadcaster::fan_out(
            &room,
            &ServerMessage::StoryChange {
                story: story.as_str().to_string(),
                index,
            },
        );

        Ok(index)
    }
}
