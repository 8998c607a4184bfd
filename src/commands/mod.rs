//! Command system.
//!
//! One module per command. Add a new command by:
//! 1. Creating a new file in this directory
//! 2. Adding `pub mod your_command;` below
//! 3. Appending its constructor to `builtin_commands()`

pub mod access;
pub mod antidemote;
pub mod antilink;
pub mod antipromote;
pub mod ban;
pub mod dev;
pub mod menu;
pub mod ping;
pub mod private;
pub mod rank;
pub mod registry;
pub mod theme;
pub mod unban;

use std::sync::Arc;

use async_trait::async_trait;

use crate::client::{ChatClient, InboundMessage, OutgoingContent, SendOptions};
use crate::permissions::PermissionSnapshot;
use crate::store::Stores;
use crate::theme::ThemeManager;
use crate::utils::bare_number;

pub use registry::CommandRegistry;

/// A registered command handler.
#[async_trait]
pub trait Command: Send + Sync {
    /// Registration key, matched case-insensitively.
    fn name(&self) -> &str;

    /// One-line description shown in the menu.
    fn description(&self) -> &str;

    /// Restrict to senders with owner-equivalent privilege.
    fn owner_only(&self) -> bool {
        false
    }

    /// Execute the command with the prepared context.
    async fn execute(&self, ctx: &CommandContext) -> anyhow::Result<()>;
}

/// Execution context injected into every command handler.
pub struct CommandContext {
    /// Protocol client handle.
    pub client: Arc<dyn ChatClient>,
    /// The originating message envelope.
    pub message: InboundMessage,
    /// Positional arguments after the command name, casing preserved.
    pub args: Vec<String>,
    /// Originating conversation.
    pub chat_id: String,
    /// Normalized sender identifier.
    pub sender: String,
    /// Normalized identifier of the connected account.
    pub bot_id: String,
    /// Active command prefix.
    pub prefix: String,
    /// Whether the conversation is a group.
    pub is_group: bool,
    /// Permission facts resolved for this message.
    pub perms: PermissionSnapshot,
    /// Persisted stores (load/save pairs per concern).
    pub stores: Arc<Stores>,
    /// Theme data for rendered output.
    pub themes: Arc<ThemeManager>,
    /// The registry, for commands that enumerate commands.
    pub registry: Arc<CommandRegistry>,
}

impl CommandContext {
    /// Send a quoted text reply to the originating chat.
    pub async fn reply(&self, text: impl Into<String>) -> anyhow::Result<()> {
        self.client
            .send_message(
                &self.chat_id,
                OutgoingContent::text(text),
                SendOptions::quoting(&self.message.key),
            )
            .await?;
        Ok(())
    }

    /// Quoted reply mentioning the given raw identifiers.
    pub async fn reply_mentioning(
        &self,
        text: impl Into<String>,
        mentions: Vec<String>,
    ) -> anyhow::Result<()> {
        self.client
            .send_message(
                &self.chat_id,
                OutgoingContent::text_with_mentions(text, mentions),
                SendOptions::quoting(&self.message.key),
            )
            .await?;
        Ok(())
    }

    /// Bare number of the quoted message's author, if the command message
    /// is a reply.
    pub fn quoted_target(&self) -> Option<String> {
        self.message
            .quoted_sender()
            .map(bare_number)
            .filter(|s| !s.is_empty())
    }

    /// Resolve a target user: first mention, then quoted reply, then a
    /// bare-number argument at `arg_index`. Returns the bare number.
    pub fn target_user(&self, arg_index: usize) -> Option<String> {
        if let Some(mentioned) = self.message.mentions().first() {
            let bare = bare_number(mentioned);
            if !bare.is_empty() {
                return Some(bare);
            }
        }
        if let Some(quoted) = self.quoted_target() {
            return Some(quoted);
        }
        self.args
            .get(arg_index)
            .map(|a| bare_number(a))
            .filter(|s| !s.is_empty())
    }
}

/// The built-in command set, in registration order.
pub fn builtin_commands() -> Vec<Arc<dyn Command>> {
    vec![
        Arc::new(ping::Ping),
        Arc::new(menu::Menu),
        Arc::new(menu::Help),
        Arc::new(dev::Dev),
        Arc::new(rank::Rank),
        Arc::new(theme::ThemeCommand),
        Arc::new(ban::Ban),
        Arc::new(unban::Unban),
        Arc::new(private::Private),
        Arc::new(access::Access),
        Arc::new(antipromote::AntiPromote),
        Arc::new(antidemote::AntiDemote),
        Arc::new(antilink::AntiLink),
    ]
}

/// Build a registry holding the built-in command set.
pub fn default_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    for command in builtin_commands() {
        registry.register(command);
    }
    registry
}
