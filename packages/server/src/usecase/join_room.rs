//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - ルームの遅延作成、メンバー追加、userList のブロードキャスト
//! - 途中参加者への現在の状態（ストーリー、投票、ファイル）の同期
//!
//! ### なぜこのテストが必要か
//! - 全ての参加者が同じメンバー一覧を見られることを保証
//! - 削除済みルームへの参加で更新が失われないことを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規ルームへの参加、既存ルームへの参加
//! - 異常系：参加済みセッションの再参加、容量超過
//! - エッジケース：同じ表示名での複数接続

use std::sync::Arc;

use yosoku_shared::time::get_jst_timestamp;

use crate::{
    domain::{ConnectionSession, Room, RoomId, RoomRepository, Timestamp, UserName},
    infrastructure::{broadcast::Broadcaster, dto::websocket::ServerMessage},
};

use super::error::RoomOperationError;

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// ルーム参加を実行
    ///
    /// # Arguments
    ///
    /// * `session` - 参加するセッション（Unjoined であること）
    /// * `room_id` - 参加先のルーム ID（存在しなければ作成）
    /// * `user` - 表示名
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<UserName>)` - ブロードキャストしたメンバー一覧
    /// * `Err(RoomOperationError)` - 参加失敗
    pub async fn execute(
        &self,
        session: &mut ConnectionSession,
        room_id: RoomId,
        user: UserName,
    ) -> Result<Vec<UserName>, RoomOperationError> {
        if let Some((joined, _)) = session.membership() {
            return Err(RoomOperationError::AlreadyJoined(joined.to_string()));
        }
        if !session.is_unjoined() {
            // Closed のセッションは参加できない
            return Err(RoomOperationError::NotJoined);
        }

        loop {
            let shared = self.repository.get_or_create(&room_id).await;
            let mut room = shared.lock().await;

            // 最後のメンバーが抜けて削除された Room を掴んだ場合はレジストリから取り直す
            if room.is_retired() {
                tracing::debug!("Room '{}' was retired, retrying join", room_id);
                continue;
            }

            room.admit(
                session.id(),
                user.clone(),
                session.sender().clone(),
                Timestamp::new(get_jst_timestamp()),
            )?;

            let members = room.members().to_vec();
            // Enqueue only; socket writes happen in each connection's writer task
            Broadcaster::fan_out(
                &room,
                &ServerMessage::UserList {
                    users: members.iter().map(|m| m.as_str().to_string()).collect(),
                },
            );
            sync_late_joiner(&room, session);
            drop(room);

            session.mark_joined(room_id, user);
            return Ok(members);
        }
    }
}

/// 途中参加者に現在のストーリー、投票、公開状態、共有ファイルを送る
fn sync_late_joiner(room: &Room, session: &ConnectionSession) {
    let sender = session.sender();
    if let (Some(story), Some(index)) = (room.current_story(), room.current_story_index()) {
        let votes = room.votes_for(story);
        Broadcaster::send_to(
            sender,
            &ServerMessage::StoryChange {
                story: story.as_str().to_string(),
                index,
            },
        );
        Broadcaster::send_to(sender, &ServerMessage::vote_update(story.as_str(), &votes));
        if room.is_revealed(story) {
            Broadcaster::send_to(sender, &ServerMessage::reveal_votes(&votes));
        }
    }
    for file in room.files() {
        Broadcaster::send_to(
            sender,
            &ServerMessage::FileUploaded {
                file: file.as_value().clone(),
            },
        );
    }
}
