//! Domain layer for the estimation server.
//!
//! This module contains business logic that is independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod session;
pub mod value_object;

pub use entity::{DEFAULT_SESSION_CAPACITY, Room, SessionHandle, VoteMap};
pub use error::{RoomError, ValueObjectError};
pub use factory::SessionIdFactory;
pub use repository::{RoomRepository, SharedRoom};
pub use session::{ClientSender, ConnectionSession, SessionPhase};
pub use value_object::{
    FileDescriptor, RoomId, SessionId, StoryId, Timestamp, UserName, VoteValue,
};

#[cfg(test)]
pub use repository::MockRoomRepository;
