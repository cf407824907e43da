//! UseCase: ファイル共有処理
//!
//! アップロードサービスが返したファイル記述子をルームに添付し、そのまま中継する。

use std::sync::Arc;

use crate::{
    domain::{ConnectionSession, FileDescriptor, RoomRepository},
    infrastructure::{broadcast::Broadcaster, dto::websocket::ServerMessage},
};

use super::{error::RoomOperationError, joined_room};

/// ファイル共有のユースケース
pub struct ShareFileUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl ShareFileUseCase {
    /// 新しい ShareFileUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// ファイル共有を実行
    pub async fn execute(
        &self,
        session: &ConnectionSession,
        file: FileDescriptor,
    ) -> Result<(), RoomOperationError> {
        let (shared, _) = joined_room(self.repository.as_ref(), session).await?;
        let mut room = shared.lock().await;

        room.attach_file(file.clone());
        // Enqueue only; socket writes happen in each connection's writer task
        Broadcaster::fan_out(
            &room,
            &ServerMessage::FileUploaded {
                file: file.into_value(),
            },
        );

        Ok(())
    }
}
