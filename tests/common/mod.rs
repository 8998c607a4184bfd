//! Shared test harness: an in-memory chat client and envelope builders.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use warden::client::{
    ChatClient, ClientError, GroupMetadata, InboundMessage, MessageBody, MessageKey,
    OutgoingContent, Participant, ParticipantRole, RoleAction, SendOptions,
};
use warden::config::{Config, ModerationStrictness};

/// Records every outbound call; group metadata is configurable per test.
#[derive(Default)]
pub struct FakeClient {
    pub sent: Mutex<Vec<(String, OutgoingContent, SendOptions)>>,
    pub role_calls: Mutex<Vec<(String, Vec<String>, RoleAction)>>,
    pub metadata: Mutex<Option<GroupMetadata>>,
}

impl FakeClient {
    pub fn new() -> Arc<Self> {
        Arc::new(FakeClient::default())
    }

    pub fn set_metadata(&self, metadata: GroupMetadata) {
        *self.metadata.lock() = Some(metadata);
    }

    /// All outbound text payloads, in send order.
    pub fn texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .iter()
            .filter_map(|(_, content, _)| match content {
                OutgoingContent::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn reactions(&self) -> usize {
        self.sent
            .lock()
            .iter()
            .filter(|(_, content, _)| matches!(content, OutgoingContent::Reaction { .. }))
            .count()
    }

    pub fn deletions(&self) -> usize {
        self.sent
            .lock()
            .iter()
            .filter(|(_, content, _)| matches!(content, OutgoingContent::Delete { .. }))
            .count()
    }

    pub fn outbound_count(&self) -> usize {
        self.sent.lock().len()
    }
}

#[async_trait]
impl ChatClient for FakeClient {
    async fn send_message(
        &self,
        chat_id: &str,
        content: OutgoingContent,
        options: SendOptions,
    ) -> Result<(), ClientError> {
        self.sent
            .lock()
            .push((chat_id.to_string(), content, options));
        Ok(())
    }

    async fn group_metadata(&self, chat_id: &str) -> Result<GroupMetadata, ClientError> {
        self.metadata
            .lock()
            .clone()
            .ok_or_else(|| ClientError::Metadata(chat_id.to_string()))
    }

    async fn update_participant_roles(
        &self,
        chat_id: &str,
        participants: &[String],
        action: RoleAction,
    ) -> Result<(), ClientError> {
        self.role_calls
            .lock()
            .push((chat_id.to_string(), participants.to_vec(), action));
        Ok(())
    }
}

/// A config with test-friendly defaults and a throwaway data directory.
pub fn test_config(data_dir: &std::path::Path) -> Config {
    Config {
        prefix: ".".to_string(),
        owner_number: String::new(),
        owner_name: String::new(),
        session_id: None,
        paste_token: None,
        auth_dir: data_dir.join("session"),
        data_dir: data_dir.to_path_buf(),
        theme_dir: data_dir.join("themes"),
        bot_theme: "default".to_string(),
        allow_self_commands: true,
        moderation_strictness: ModerationStrictness::Assume,
        ack_reaction: "✅".to_string(),
    }
}

/// A plain text message envelope.
pub fn text_message(chat_id: &str, sender: Option<&str>, text: &str) -> InboundMessage {
    InboundMessage {
        key: MessageKey {
            chat_id: chat_id.to_string(),
            sender_id: sender.map(str::to_string),
            from_self: false,
            id: "TEST".to_string(),
        },
        push_name: None,
        body: MessageBody {
            conversation: Some(text.to_string()),
            ..Default::default()
        },
    }
}

/// Group metadata with the given (id, admin?) participants.
pub fn group_roster(group_id: &str, members: &[(&str, bool)]) -> GroupMetadata {
    GroupMetadata {
        id: group_id.to_string(),
        subject: "Test Group".to_string(),
        participants: members
            .iter()
            .map(|(id, admin)| Participant {
                id: id.to_string(),
                role: if *admin {
                    ParticipantRole::Admin
                } else {
                    ParticipantRole::Member
                },
            })
            .collect(),
    }
}
