//! Core domain models for the estimation rooms.

use std::collections::{BTreeMap, HashMap, HashSet};

use super::{
    error::RoomError,
    session::ClientSender,
    value_object::{FileDescriptor, RoomId, SessionId, StoryId, Timestamp, UserName, VoteValue},
};

/// Default maximum number of sessions allowed in a room
pub const DEFAULT_SESSION_CAPACITY: usize = 50;

/// Votes of a single story, keyed by voter and ordered by display name
pub type VoteMap = BTreeMap<UserName, VoteValue>;

/// A connection currently joined to a room
#[derive(Debug, Clone)]
pub struct SessionHandle {
    /// Display name claimed by the connection
    pub user: UserName,
    /// Outbound queue of the connection
    pub sender: ClientSender,
    /// Timestamp when the session joined
    pub joined_at: Timestamp,
}

/// Authoritative state of one estimation room.
///
/// All fields are mutated under the room's lock (see `SharedRoom`).
#[derive(Debug)]
pub struct Room {
    /// Room identifier
    pub id: RoomId,
    /// Timestamp when the room was created
    pub created_at: Timestamp,
    /// Maximum number of sessions allowed
    pub session_capacity: usize,
    members: Vec<UserName>,
    sessions: HashMap<SessionId, SessionHandle>,
    current_story: Option<StoryId>,
    stories: Vec<StoryId>,
    votes: HashMap<StoryId, VoteMap>,
    revealed: HashSet<StoryId>,
    files: Vec<FileDescriptor>,
    retired: bool,
}

impl Room {
    /// Create a new empty room with the given ID and creation timestamp
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self::with_capacity(id, created_at, DEFAULT_SESSION_CAPACITY)
    }

    /// Create a new empty room with a custom session capacity
    pub fn with_capacity(id: RoomId, created_at: Timestamp, session_capacity: usize) -> Self {
        Self {
            id,
            created_at,
            session_capacity,
            members: Vec::new(),
            sessions: HashMap::new(),
            current_story: None,
            stories: Vec::new(),
            votes: HashMap::new(),
            revealed: HashSet::new(),
            files: Vec::new(),
            retired: false,
        }
    }

    /// Register a session and its display name.
    ///
    /// The name is appended to the member list unless another session already
    /// claims it.
    ///
    /// # Errors
    ///
    /// Returns `RoomError::CapacityExceeded` if the room is at full capacity
    pub fn admit(
        &mut self,
        session_id: SessionId,
        user: UserName,
        sender: ClientSender,
        joined_at: Timestamp,
    ) -> Result<(), RoomError> {
        if self.sessions.len() >= self.session_capacity {
            return Err(RoomError::CapacityExceeded {
                capacity: self.session_capacity,
                current: self.sessions.len(),
            });
        }
        if !self.members.contains(&user) {
            self.members.push(user.clone());
        }
        self.sessions.insert(
            session_id,
            SessionHandle {
                user,
                sender,
                joined_at,
            },
        );
        Ok(())
    }

    /// Remove a session. Its name leaves the member list only when no other
    /// session still claims it.
    ///
    /// Returns the removed session, if it was present.
    pub fn release(&mut self, session_id: &SessionId) -> Option<SessionHandle> {
        let handle = self.sessions.remove(session_id)?;
        let still_claimed = self.sessions.values().any(|s| s.user == handle.user);
        if !still_claimed {
            self.members.retain(|m| m != &handle.user);
        }
        Some(handle)
    }

    /// Member display names in join order
    pub fn members(&self) -> &[UserName] {
        &self.members
    }

    /// Active sessions of the room
    pub fn sessions(&self) -> impl Iterator<Item = (&SessionId, &SessionHandle)> {
        self.sessions.iter()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// A room without active sessions may be removed from the registry
    pub fn is_vacant(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Select the story being estimated. Votes of every story are kept.
    ///
    /// Returns the story's position in the room's story list.
    pub fn select_story(&mut self, story: StoryId) -> usize {
        let index = match self.stories.iter().position(|s| s == &story) {
            Some(index) => index,
            None => {
                self.stories.push(story.clone());
                self.stories.len() - 1
            }
        };
        self.current_story = Some(story);
        index
    }

    pub fn current_story(&self) -> Option<&StoryId> {
        self.current_story.as_ref()
    }

    /// Position of the current story in the story list
    pub fn current_story_index(&self) -> Option<usize> {
        let current = self.current_story.as_ref()?;
        self.stories.iter().position(|s| s == current)
    }

    /// Stories in the order they were first selected
    pub fn stories(&self) -> &[StoryId] {
        &self.stories
    }

    /// Record (or overwrite) `user`'s vote on the current story.
    ///
    /// # Errors
    ///
    /// Returns `RoomError::NoStorySelected` if no story is selected
    pub fn cast_vote(&mut self, user: UserName, vote: VoteValue) -> Result<&StoryId, RoomError> {
        let story = self
            .current_story
            .as_ref()
            .ok_or(RoomError::NoStorySelected)?;
        self.votes.entry(story.clone()).or_default().insert(user, vote);
        Ok(story)
    }

    /// Votes recorded for `story` (empty if none)
    pub fn votes_for(&self, story: &StoryId) -> VoteMap {
        self.votes.get(story).cloned().unwrap_or_default()
    }

    /// Mark the current story as revealed, returning it with its votes.
    ///
    /// # Errors
    ///
    /// Returns `RoomError::NoStorySelected` if no story is selected
    pub fn reveal(&mut self) -> Result<(StoryId, VoteMap), RoomError> {
        let story = self
            .current_story
            .clone()
            .ok_or(RoomError::NoStorySelected)?;
        self.revealed.insert(story.clone());
        let votes = self.votes_for(&story);
        Ok((story, votes))
    }

    pub fn is_revealed(&self, story: &StoryId) -> bool {
        self.revealed.contains(story)
    }

    /// Clear the votes of `story`, or of the current story when `None`.
    /// Other stories are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `RoomError::NoStorySelected` if no story is given or selected
    pub fn reset_votes(&mut self, story: Option<StoryId>) -> Result<StoryId, RoomError> {
        let story = story
            .or_else(|| self.current_story.clone())
            .ok_or(RoomError::NoStorySelected)?;
        self.votes.remove(&story);
        self.revealed.remove(&story);
        Ok(story)
    }

    /// Attach a file descriptor from the upload service
    pub fn attach_file(&mut self, file: FileDescriptor) {
        self.files.push(file);
    }

    pub fn files(&self) -> &[FileDescriptor] {
        &self.files
    }

    /// Mark the room as removed from the registry. A retired room accepts no
    /// further joins.
    pub fn retire(&mut self) {
        self.retired = true;
    }

    pub fn is_retired(&self) -> bool {
        self.retired
    }
}
