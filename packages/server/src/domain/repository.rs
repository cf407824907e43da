//! Room Registry contract.
//!
//! ドメイン層が定義する Repository trait。実装は infrastructure 層にあります（依存性の逆転）。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{entity::Room, value_object::RoomId};

/// A room shared between connections. The mutex guards every field of the room.
pub type SharedRoom = Arc<Mutex<Room>>;

/// Registry of live rooms keyed by room identifier.
///
/// Lock order is always registry -> room. Callers must not hold a room lock
/// while calling into the registry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Return the room for `room_id`, creating an empty one if absent.
    ///
    /// Concurrent calls for the same unseen id observe the same instance.
    async fn get_or_create(&self, room_id: &RoomId) -> SharedRoom;

    /// Return the room for `room_id` if it exists.
    async fn find(&self, room_id: &RoomId) -> Option<SharedRoom>;

    /// Remove the room if it has no active sessions.
    ///
    /// The emptiness check and the removal happen under both the registry lock
    /// and the room lock; the removed room is retired. Returns `true` if the
    /// room was removed.
    async fn remove_if_empty(&self, room_id: &RoomId) -> bool;

    /// All live rooms, ordered by room id.
    async fn list(&self) -> Vec<SharedRoom>;

    /// Number of live rooms.
    async fn count(&self) -> usize;
}
