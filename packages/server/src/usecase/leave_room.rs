//! UseCase: ルーム退出（切断）処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveRoomUseCase::execute() メソッド
//! - セッションの削除、残りのメンバーへの userList ブロードキャスト、空ルームの削除
//!
//! ### なぜこのテストが必要か
//! - 切断した参加者だけがメンバー一覧から消えることを保証
//! - 最後の参加者が抜けたルームは削除され、次の join が空の状態から始まることを保証
//! - join と削除が競合しても参加者が失われないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の切断と通知
//! - エッジケース：最後の参加者の切断、未参加セッションの切断、join との競合

use std::sync::Arc;

use crate::{
    domain::{ConnectionSession, RoomId, RoomRepository, UserName},
    infrastructure::{broadcast::Broadcaster, dto::websocket::ServerMessage},
};

use super::error::RoomOperationError;

/// 退出処理の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveOutcome {
    /// 退出したルーム
    pub room_id: RoomId,
    /// 退出後のメンバー一覧
    pub remaining: Vec<UserName>,
    /// 空になったルームがレジストリから削除されたか
    pub room_removed: bool,
}

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl LeaveRoomUseCase {
    /// 新しい LeaveRoomUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 退出を実行し、セッションを Closed にする
    ///
    /// # Returns
    ///
    /// * `Ok(Some(LeaveOutcome))` - 参加中だったルームから退出した
    /// * `Ok(None)` - 未参加のまま切断された
    /// * `Err(RoomOperationError)` - 参加中のルームが見つからない
    pub async fn execute(
        &self,
        session: &mut ConnectionSession,
    ) -> Result<Option<LeaveOutcome>, RoomOperationError> {
        let Some((room_id, user)) = session.close() else {
            return Ok(None);
        };

        let shared = self
            .repository
            .find(&room_id)
            .await
            .ok_or_else(|| RoomOperationError::RoomNotFound(room_id.to_string()))?;

        let (remaining, vacant) = {
            let mut room = shared.lock().await;
            room.release(&session.id());
            let remaining = room.members().to_vec();
            if !room.is_vacant() {
                // Enqueue only; socket writes happen in each connection's writer task
                Broadcaster::fan_out(
                    &room,
                    &ServerMessage::UserList {
                        users: remaining.iter().map(|m| m.as_str().to_string()).collect(),
                    },
                );
            }
            (remaining, room.is_vacant())
        };
        tracing::info!("'{}' left room '{}'", user, room_id);

        // Room のロックを返却してから削除を依頼する（ロック順序: レジストリ -> Room）
        let room_removed = vacant && self.repository.remove_if_empty(&room_id).await;

        Ok(Some(LeaveOutcome {
            room_id,
            remaining,
            room_removed,
        }))
    }
}
