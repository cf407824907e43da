//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// RoomId validation error
    #[error("RoomId cannot be empty")]
    RoomIdEmpty,

    /// RoomId too long error
    #[error("RoomId cannot exceed {max} characters (got {actual})")]
    RoomIdTooLong { max: usize, actual: usize },

    /// UserName validation error
    #[error("UserName cannot be empty")]
    UserNameEmpty,

    /// UserName too long error
    #[error("UserName cannot exceed {max} characters (got {actual})")]
    UserNameTooLong { max: usize, actual: usize },

    /// StoryId validation error
    #[error("StoryId cannot be empty")]
    StoryIdEmpty,

    /// StoryId too long error
    #[error("StoryId cannot exceed {max} characters (got {actual})")]
    StoryIdTooLong { max: usize, actual: usize },

    /// VoteValue validation error
    #[error("VoteValue cannot be empty")]
    VoteValueEmpty,

    /// VoteValue too long error
    #[error("VoteValue cannot exceed {max} characters (got {actual})")]
    VoteValueTooLong { max: usize, actual: usize },

    /// File descriptor is not a JSON object
    #[error("FileDescriptor must be a JSON object")]
    FileDescriptorNotObject,
}

/// Errors related to Room domain logic
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoomError {
    /// Room capacity exceeded error
    #[error("Room capacity exceeded: maximum {capacity} sessions allowed (current: {current})")]
    CapacityExceeded { capacity: usize, current: usize },

    /// Operation needs a story but none is selected (and none was given)
    #[error("No story is selected in this room")]
    NoStorySelected,
}
