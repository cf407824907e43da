//! UseCase: 投票処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CastVoteUseCase::execute() メソッド
//! - 現在のストーリーへの投票、上書き、voteUpdate のブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 同時に届いた異なるユーザーの投票が両方とも残ることを保証
//! - 同じユーザーの再投票が上書きになることを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：投票と上書き
//! - 異常系：未参加、ストーリー未選択
//! - エッジケース：多数の同時投票

use std::sync::Arc;

use crate::{
    domain::{ConnectionSession, RoomRepository, VoteMap, VoteValue},
    infrastructure::{broadcast::Broadcaster, dto::websocket::ServerMessage},
};

use super::{error::RoomOperationError, joined_room};

/// 投票のユースケース
pub struct CastVoteUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl CastVoteUseCase {
    /// 新しい CastVoteUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 投票を実行
    ///
    /// 現在のストーリーに対するセッションユーザーの投票を記録（上書き）し、
    /// そのストーリーの全投票を voteUpdate としてブロードキャストする。
    ///
    /// # Returns
    ///
    /// * `Ok(VoteMap)` - 投票後のストーリーの投票一覧
    /// * `Err(RoomOperationError)` - 未参加、またはストーリー未選択
    pub async fn execute(
        &self,
        session: &ConnectionSession,
        vote: VoteValue,
    ) -> Result<VoteMap, RoomOperationError> {
        let (shared, user) = joined_room(self.repository.as_ref(), session).await?;
        let mut room = shared.lock().await;

        let story = room.cast_vote(user, vote)?.clone();
        let votes = room.votes_for(&story);
        // Enqueue only; socket writes happen in each connection's writer task
        Broadcaster::fan_out(&room, &ServerMessage::vote_update(story.as_str(), &votes));

        Ok(votes)
    }
}
