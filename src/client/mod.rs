//! Protocol collaborator seam.
//!
//! The messaging transport itself is a supplied capability: something that
//! can send messages, fetch group metadata, and change participant roles,
//! and that feeds [`ClientEvent`]s into the runtime. Everything the rest of
//! the crate needs from it fits behind the [`ChatClient`] trait, so tests
//! and the stdio driver can stand in for the real connection.

mod types;

pub mod stdio;

pub use types::{
    BotIdentity, ButtonReply, ClientEvent, ContextInfo, DisconnectInfo, ExtendedText,
    GroupMetadata, InboundMessage, ListReply, MediaContent, MessageBody, MessageKey,
    OutgoingContent, Participant, ParticipantRole, RoleAction, RoleChangeEvent, SendOptions,
    TemplateReply, GROUP_SUFFIX, STATUS_BROADCAST,
};

use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by the protocol client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("send failed: {0}")]
    Send(String),

    #[error("group metadata unavailable for {0}")]
    Metadata(String),

    #[error("role update rejected: {0}")]
    RoleUpdate(String),

    #[error("not connected")]
    NotConnected,
}

/// The narrow interface the dispatch layer consumes from the transport.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send a message to a chat.
    async fn send_message(
        &self,
        chat_id: &str,
        content: OutgoingContent,
        options: SendOptions,
    ) -> Result<(), ClientError>;

    /// Fetch the metadata of a group chat (subject and participant roles).
    async fn group_metadata(&self, chat_id: &str) -> Result<GroupMetadata, ClientError>;

    /// Promote or demote the given participants in a group.
    async fn update_participant_roles(
        &self,
        chat_id: &str,
        participants: &[String],
        action: RoleAction,
    ) -> Result<(), ClientError>;
}
