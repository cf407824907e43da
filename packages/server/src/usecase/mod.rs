//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。
//!
//! 各ユースケースは Room のロックを保持したまま状態を更新し、同じロックの中で
//! 結果をブロードキャストキューに積みます。これにより全ての参加者が同じ順序で
//! 変更を受け取ります。

pub mod cast_vote;
pub mod change_story;
pub mod error;
pub mod join_room;
pub mod leave_room;
pub mod reset_votes;
pub mod reveal_votes;
pub mod share_file;

pub use cast_vote::CastVoteUseCase;
pub use change_story::ChangeStoryUseCase;
pub use error::RoomOperationError;
pub use join_room::JoinRoomUseCase;
pub use leave_room::{LeaveOutcome, LeaveRoomUseCase};
pub use reset_votes::ResetVotesUseCase;
pub use reveal_votes::RevealVotesUseCase;
pub use share_file::ShareFileUseCase;

use crate::domain::{ConnectionSession, RoomRepository, SharedRoom, UserName};

/// 参加中のセッションのルームと表示名を取得する
async fn joined_room(
    repository: &dyn RoomRepository,
    session: &ConnectionSession,
) -> Result<(SharedRoom, UserName), RoomOperationError> {
    let (room_id, user) = session.membership().ok_or(RoomOperationError::NotJoined)?;
    let room = repository
        .find(room_id)
        .await
        .ok_or_else(|| RoomOperationError::RoomNotFound(room_id.to_string()))?;
    Ok((room, user.clone()))
}
