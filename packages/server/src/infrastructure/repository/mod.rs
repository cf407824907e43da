//! Room Registry の実装
//!
//! ドメイン層の RoomRepository trait を実装し、ルーム ID から共有 Room を引けるようにします。
//! ユースケースは trait だけに依存します（依存性の逆転）。

pub mod inmemory;

pub use inmemory::InMemoryRoomRepository;
