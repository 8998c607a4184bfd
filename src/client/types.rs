//! Wire-shaped types shared between the transport, the dispatcher and the
//! reactors. Everything here derives serde so the stdio driver and tests
//! can build events from JSON.

use serde::{Deserialize, Serialize};

use crate::utils::bare_number;

/// Domain suffix that marks a group conversation.
pub const GROUP_SUFFIX: &str = "@g.us";

/// Pseudo-chat carrying status updates. Never a command source.
pub const STATUS_BROADCAST: &str = "status@broadcast";

/// Routing key of a single message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageKey {
    /// Conversation the message belongs to (direct chat or group).
    pub chat_id: String,
    /// Raw sender identifier. Absent for self-sent messages and direct
    /// chats, where the chat id itself names the peer.
    pub sender_id: Option<String>,
    /// True when the connected account itself produced the message.
    pub from_self: bool,
    /// Protocol message id, used for reactions and deletions.
    pub id: String,
}

/// Extended text content, optionally carrying quoted-message context.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtendedText {
    pub text: String,
    pub context: Option<ContextInfo>,
}

/// Context attached to a reply: who and what was quoted, plus mentions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextInfo {
    /// Author of the quoted message (set in groups).
    pub participant: Option<String>,
    /// Chat the quoted message came from.
    pub remote_jid: Option<String>,
    /// Whether a quoted message is actually attached.
    pub quoted: bool,
    /// Identifiers mentioned in the message body.
    pub mentioned: Vec<String>,
}

/// Media content; only the caption matters to the dispatch layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaContent {
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonReply {
    pub selected_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListReply {
    pub selected_row_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateReply {
    pub selected_id: String,
}

/// The protocol message-content union, as a struct of optional shapes.
///
/// A real envelope populates at most a couple of these; text extraction
/// probes them in a fixed priority order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageBody {
    pub conversation: Option<String>,
    pub extended_text: Option<ExtendedText>,
    pub image: Option<MediaContent>,
    pub video: Option<MediaContent>,
    pub button_reply: Option<ButtonReply>,
    pub list_reply: Option<ListReply>,
    pub template_reply: Option<TemplateReply>,
}

/// One inbound message envelope. Ephemeral: lives for a single dispatch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InboundMessage {
    pub key: MessageKey,
    /// Display name the sender advertises, if any.
    pub push_name: Option<String>,
    pub body: MessageBody,
}

impl InboundMessage {
    /// Whether this message belongs to a group conversation.
    pub fn is_group(&self) -> bool {
        self.key.chat_id.ends_with(GROUP_SUFFIX)
    }

    /// Raw sender identifier, given the connected account's own id.
    ///
    /// Self-sent messages resolve to the bot id; group messages carry an
    /// explicit participant; direct chats are named by the chat id itself.
    pub fn sender_raw<'a>(&'a self, bot_raw: &'a str) -> Option<&'a str> {
        if self.key.from_self {
            return Some(bot_raw);
        }
        if self.is_group() {
            return self.key.sender_id.as_deref();
        }
        Some(&self.key.chat_id)
    }

    /// Quoted-reply context, when the message is an extended-text reply.
    pub fn context(&self) -> Option<&ContextInfo> {
        self.body.extended_text.as_ref()?.context.as_ref()
    }

    /// Raw identifier of the quoted message's author, if this is a reply.
    pub fn quoted_sender(&self) -> Option<&str> {
        let ctx = self.context()?;
        if !ctx.quoted {
            return None;
        }
        ctx.participant.as_deref().or(ctx.remote_jid.as_deref())
    }

    /// Identifiers mentioned in the message body.
    pub fn mentions(&self) -> &[String] {
        self.context().map(|c| c.mentioned.as_slice()).unwrap_or(&[])
    }
}

/// Role a participant holds inside a group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantRole {
    #[default]
    Member,
    Admin,
    Superadmin,
}

impl ParticipantRole {
    /// Admin-capable roles.
    pub fn is_admin(&self) -> bool {
        matches!(self, ParticipantRole::Admin | ParticipantRole::Superadmin)
    }
}

/// One group member, as reported by the transport.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Participant {
    pub id: String,
    pub role: ParticipantRole,
}

/// Group metadata snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupMetadata {
    pub id: String,
    pub subject: String,
    pub participants: Vec<Participant>,
}

impl GroupMetadata {
    /// Find a participant whose normalized id matches the given bare number.
    pub fn participant_by_bare(&self, bare: &str) -> Option<&Participant> {
        if bare.is_empty() {
            return None;
        }
        self.participants
            .iter()
            .find(|p| bare_number(&p.id) == bare)
    }
}

/// A promote/demote action, as carried by role-change events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleAction {
    Promote,
    Demote,
}

impl RoleAction {
    /// The compensating action.
    pub fn reversal(&self) -> RoleAction {
        match self {
            RoleAction::Promote => RoleAction::Demote,
            RoleAction::Demote => RoleAction::Promote,
        }
    }
}

/// A group role-change notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleChangeEvent {
    pub group_id: String,
    pub participants: Vec<String>,
    pub action: RoleAction,
}

/// The connected account's identity, learned from the connection-open
/// event. Group rosters may list the account under the alternate linked
/// id rather than the primary one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BotIdentity {
    pub id: String,
    pub lid: Option<String>,
}

impl BotIdentity {
    /// Bare form of the primary identifier.
    pub fn bare(&self) -> String {
        bare_number(&self.id)
    }

    /// Bare form of the alternate linked identifier, when present.
    pub fn bare_lid(&self) -> Option<String> {
        self.lid
            .as_deref()
            .map(bare_number)
            .filter(|s| !s.is_empty())
    }

    /// Whether a raw identifier refers to this account, under either id.
    pub fn matches(&self, raw: &str) -> bool {
        let bare = bare_number(raw);
        if bare.is_empty() {
            return false;
        }
        bare == self.bare() || self.bare_lid().is_some_and(|lid| bare == lid)
    }
}

/// Detail attached to a disconnection event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisconnectInfo {
    /// True for session/auth invalidation: the one fatal class.
    pub fatal: bool,
    pub reason: String,
}

/// Events the transport feeds into the runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ClientEvent {
    /// The connection opened; carries the account identity. This is the
    /// identity-resolution bootstrap, never message traffic.
    Connected { identity: BotIdentity },
    /// The connection dropped. Non-fatal drops are the transport's problem.
    Disconnected { info: DisconnectInfo },
    /// An inbound chat message.
    Message(InboundMessage),
    /// A group promote/demote notification.
    RoleChange(RoleChangeEvent),
}

/// Outbound message content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutgoingContent {
    /// Plain text, optionally mentioning participants.
    Text {
        text: String,
        #[serde(default)]
        mentions: Vec<String>,
    },
    /// An emoji reaction on an existing message. Cosmetic only.
    Reaction { emoji: String, target: MessageKey },
    /// Deletion of an existing message.
    Delete { target: MessageKey },
}

impl OutgoingContent {
    /// Plain text with no mentions.
    pub fn text(text: impl Into<String>) -> Self {
        OutgoingContent::Text {
            text: text.into(),
            mentions: Vec::new(),
        }
    }

    /// Text mentioning the given raw identifiers.
    pub fn text_with_mentions(text: impl Into<String>, mentions: Vec<String>) -> Self {
        OutgoingContent::Text {
            text: text.into(),
            mentions,
        }
    }
}

/// Send options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SendOptions {
    /// Message to quote, making the send a visible reply.
    pub quoted: Option<MessageKey>,
}

impl SendOptions {
    /// Quote the given message.
    pub fn quoting(key: &MessageKey) -> Self {
        SendOptions {
            quoted: Some(key.clone()),
        }
    }
}
