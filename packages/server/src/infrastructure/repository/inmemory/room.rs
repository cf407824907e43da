//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! ## ロックの順序
//!
//! レジストリ（HashMap）のロック → Room のロック、の順でのみ取得します。
//! `get_or_create` はレジストリのロックを返却してから呼び出し側が Room をロックするため、
//! 削除済み（retired）の Room を掴んだ join は再取得する必要があります。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;
use yosoku_shared::time::get_jst_timestamp;

use crate::domain::{
    DEFAULT_SESSION_CAPACITY, Room, RoomId, RoomRepository, SharedRoom, Timestamp,
};

/// インメモリ Room Repository 実装
///
/// HashMap をインメモリ DB として使用する実装。
/// ドメイン層の RoomRepository trait を実装します（依存性の逆転）。
pub struct InMemoryRoomRepository {
    /// ルーム ID -> Room
    rooms: Mutex<HashMap<RoomId, SharedRoom>>,
    /// 新規作成する Room のセッション上限
    session_capacity: usize,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SESSION_CAPACITY)
    }

    /// セッション上限を指定して作成
    pub fn with_capacity(session_capacity: usize) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            session_capacity,
        }
    }
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn get_or_create(&self, room_id: &RoomId) -> SharedRoom {
        let mut rooms = self.rooms.lock().await;
        rooms
            .entry(room_id.clone())
            .or_insert_with(|| {
                tracing::info!("Creating room '{}'", room_id);
                Arc::new(Mutex::new(Room::with_capacity(
                    room_id.clone(),
                    Timestamp::new(get_jst_timestamp()),
                    self.session_capacity,
                )))
            })
            .clone()
    }

    async fn find(&self, room_id: &RoomId) -> Option<SharedRoom> {
        let rooms = self.rooms.lock().await;
        rooms.get(room_id).cloned()
    }

    async fn remove_if_empty(&self, room_id: &RoomId) -> bool {
        let mut rooms = self.rooms.lock().await;
        let Some(shared) = rooms.get(room_id).cloned() else {
            return false;
        };

        // Room のロックを取ったまま空判定と削除を行う（同じ Room への join と排他）
        let mut room = shared.lock().await;
        if !room.is_vacant() {
            tracing::debug!(
                "Room '{}' still has {} session(s), keeping it",
                room_id,
                room.session_count()
            );
            return false;
        }
        room.retire();
        rooms.remove(room_id);
        tracing::info!("Removed empty room '{}'", room_id);
        true
    }

    async fn list(&self) -> Vec<SharedRoom> {
        let rooms = self.rooms.lock().await;
        let mut entries: Vec<(&RoomId, &SharedRoom)> = rooms.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter().map(|(_, room)| room.clone()).collect()
    }

    async fn count(&self) -> usize {
        let rooms = self.rooms.lock().await;
        rooms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SessionIdFactory, UserName};
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - InMemoryRoomRepository の get_or_create / find / remove_if_empty
    // - 同じ未知のルーム ID への同時 get_or_create が単一インスタンスになること
    // - 空でないルームは削除されないこと、削除されたルームは retired になること
    //
    // 【なぜこのテストが必要か】
    // - 全ての操作はここで取得した Room インスタンスを読み書きする
    // - 二重生成や join と削除の競合は更新の消失につながる
    // ========================================

    fn room_id(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    async fn admit(room: &SharedRoom, user: &str) -> crate::domain::SessionId {
        let (tx, _rx) = mpsc::unbounded_channel();
        let session_id = SessionIdFactory::generate();
        room.lock()
            .await
            .admit(
                session_id,
                UserName::new(user.to_string()).unwrap(),
                tx,
                Timestamp::new(0),
            )
            .unwrap();
        session_id
    }

    #[tokio::test]
    async fn test_get_or_create_returns_same_instance() {
        // テスト項目: 同じルーム ID に対しては同じ Room インスタンスが返される
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();

        // when (操作):
        let first = repo.get_or_create(&room_id("r1")).await;
        let second = repo.get_or_create(&room_id("r1")).await;

        // then (期待する結果):
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_get_or_create_creates_single_room() {
        // テスト項目: 未知のルーム ID への同時 get_or_create でも Room は 1 つだけ作成される
        // given (前提条件):
        let repo = Arc::new(InMemoryRoomRepository::new());

        // when (操作): 64 タスクから同時に取得
        let handles: Vec<_> = (0..64)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.get_or_create(&room_id("fresh")).await })
            })
            .collect();
        let mut rooms = Vec::new();
        for handle in handles {
            rooms.push(handle.await.unwrap());
        }

        // then (期待する結果):
        assert_eq!(repo.count().await, 1);
        assert!(rooms.iter().all(|room| Arc::ptr_eq(room, &rooms[0])));
    }

    #[tokio::test]
    async fn test_find_unknown_room() {
        // テスト項目: 存在しないルームの find は None を返す
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();

        // when (操作):
        let result = repo.find(&room_id("nowhere")).await;

        // then (期待する結果):
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_remove_if_empty_keeps_occupied_room() {
        // テスト項目: セッションが残っているルームは削除されない
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        let room = repo.get_or_create(&room_id("r1")).await;
        admit(&room, "Alice").await;

        // when (操作):
        let removed = repo.remove_if_empty(&room_id("r1")).await;

        // then (期待する結果):
        assert!(!removed);
        assert!(repo.find(&room_id("r1")).await.is_some());
        assert!(!room.lock().await.is_retired());
    }

    #[tokio::test]
    async fn test_remove_if_empty_retires_vacant_room() {
        // テスト項目: 空になったルームは削除され、retired になり、次の取得では新しい Room になる
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        let room = repo.get_or_create(&room_id("r1")).await;
        let session_id = admit(&room, "Alice").await;
        room.lock().await.release(&session_id);

        // when (操作):
        let removed = repo.remove_if_empty(&room_id("r1")).await;

        // then (期待する結果):
        assert!(removed);
        assert!(room.lock().await.is_retired());
        assert_eq!(repo.count().await, 0);

        let recreated = repo.get_or_create(&room_id("r1")).await;
        assert!(!Arc::ptr_eq(&room, &recreated));
        assert!(recreated.lock().await.members().is_empty());
    }

    #[tokio::test]
    async fn test_new_rooms_use_configured_capacity() {
        // テスト項目: 指定したセッション上限で Room が作成される
        // given (前提条件):
        let repo = InMemoryRoomRepository::with_capacity(3);

        // when (操作):
        let room = repo.get_or_create(&room_id("r1")).await;

        // then (期待する結果):
        assert_eq!(room.lock().await.session_capacity, 3);
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_room_id() {
        // テスト項目: list はルーム ID 順で返す
        // given (前提条件):
        let repo = InMemoryRoomRepository::new();
        repo.get_or_create(&room_id("b")).await;
        repo.get_or_create(&room_id("a")).await;

        // when (操作):
        let rooms = repo.list().await;

        // then (期待する結果):
        let mut ids = Vec::new();
        for room in rooms {
            ids.push(room.lock().await.id.as_str().to_string());
        }
        assert_eq!(ids, vec!["a", "b"]);
    }
}
