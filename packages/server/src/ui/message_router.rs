//! Message Router: decodes inbound frames and dispatches them to the use case
//! for their type.

use std::sync::Arc;

use thiserror::Error;

use crate::{
    domain::{ConnectionSession, FileDescriptor, RoomId, RoomRepository, StoryId, UserName, VoteValue},
    infrastructure::{
        broadcast::Broadcaster,
        dto::websocket::{ClientMessage, DecodeError, ServerMessage, decode_client_message},
    },
    usecase::{
        CastVoteUseCase, ChangeStoryUseCase, JoinRoomUseCase, ResetVotesUseCase,
        RevealVotesUseCase, RoomOperationError, ShareFileUseCase,
    },
};

/// Why a frame was dropped. Never fatal to the connection.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("`{kind}` rejected: {source}")]
    Rejected {
        kind: &'static str,
        #[source]
        source: RoomOperationError,
    },
}

#[derive(Clone)]
pub struct MessageRouter {
    repository: Arc<dyn RoomRepository>,
}

impl MessageRouter {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// Decode one text frame and route it.
    pub async fn handle_text(
        &self,
        session: &mut ConnectionSession,
        text: &str,
    ) -> Result<(), RouteError> {
        let message = decode_client_message(text)?;
        self.route(session, message).await
    }

    /// Route a decoded message on behalf of `session`.
    pub async fn route(
        &self,
        session: &mut ConnectionSession,
        message: ClientMessage,
    ) -> Result<(), RouteError> {
        let kind = message.kind();
        if message.requires_membership() && session.membership().is_none() {
            return Err(RouteError::Rejected {
                kind,
                source: RoomOperationError::NotJoined,
            });
        }

        self.dispatch(session, message)
            .await
            .map_err(|source| RouteError::Rejected { kind, source })
    }

    async fn dispatch(
        &self,
        session: &mut ConnectionSession,
        message: ClientMessage,
    ) -> Result<(), RoomOperationError> {
        let repository = self.repository.clone();
        match message {
            ClientMessage::Join { room_id, user } => {
                let room_id = RoomId::try_from(room_id)?;
                let user = UserName::try_from(user)?;
                let members = JoinRoomUseCase::new(repository)
                    .execute(session, room_id.clone(), user.clone())
                    .await?;
                tracing::info!(
                    "Session '{}' joined room '{}' as '{}' ({} member(s))",
                    session.id(),
                    room_id,
                    user,
                    members.len()
                );
            }
            ClientMessage::Vote { vote } => {
                let vote = VoteValue::try_from(vote)?;
                CastVoteUseCase::new(repository).execute(session, vote).await?;
            }
            ClientMessage::StoryChange { story } => {
                let story = StoryId::try_from(story)?;
                ChangeStoryUseCase::new(repository)
                    .execute(session, story)
                    .await?;
            }
            ClientMessage::RevealVotes => {
                let (story, votes) = RevealVotesUseCase::new(repository).execute(session).await?;
                tracing::info!("Revealed {} vote(s) for '{}'", votes.len(), story);
            }
            ClientMessage::ResetVotes { story } => {
                let story = story.map(StoryId::try_from).transpose()?;
                ResetVotesUseCase::new(repository)
                    .execute(session, story)
                    .await?;
            }
            ClientMessage::FileUploaded { file } => {
                let file = FileDescriptor::new(file)?;
                ShareFileUseCase::new(repository).execute(session, file).await?;
            }
            ClientMessage::Ping => {
                if !Broadcaster::send_to(session.sender(), &ServerMessage::Pong) {
                    tracing::debug!("Session '{}' closed before pong", session.id());
                }
            }
        }
        Ok(())
    }
}
