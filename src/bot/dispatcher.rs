//! Message dispatcher.
//!
//! One inbound message walks a fixed pipeline: text extraction, prefix
//! parse, permission snapshot, private-mode and ban gates, registry
//! lookup, owner gate, handler execution inside an error boundary, and a
//! best-effort acknowledgement reaction. Nothing a handler does can crash
//! the loop.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::{debug, error, info, warn};

use crate::client::{
    BotIdentity, ChatClient, InboundMessage, OutgoingContent, SendOptions, STATUS_BROADCAST,
};
use crate::commands::{CommandContext, CommandRegistry};
use crate::config::Config;
use crate::permissions::PermissionResolver;
use crate::store::Stores;
use crate::theme::ThemeManager;
use crate::utils::{bare_number, extract_text};

/// Commands that stay reachable for banned senders: they must still be
/// able to learn they are banned and verify liveness.
const BAN_EXEMPT: &[&str] = &["menu", "ping"];

/// How long a banned sender stays quiet after one warning.
const BAN_WARN_WINDOW: Duration = Duration::from_secs(60);

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    /// First token after the prefix, lower-cased.
    pub name: String,
    /// Remaining tokens, original casing and order preserved.
    pub args: Vec<String>,
    /// The full extracted text, untouched.
    pub raw_text: String,
}

/// Parse a command invocation out of extracted text.
///
/// A message is a command iff the text is non-empty and starts with the
/// prefix; the remainder splits on runs of whitespace.
pub fn parse_invocation(prefix: &str, text: &str) -> Option<CommandInvocation> {
    if prefix.is_empty() || !text.starts_with(prefix) {
        return None;
    }
    let mut parts = text[prefix.len()..].split_whitespace();
    let name = parts.next()?.to_lowercase();
    let args = parts.map(str::to_string).collect();
    Some(CommandInvocation {
        name,
        args,
        raw_text: text.to_string(),
    })
}

/// Rate limiter for ban warnings: at most one reply per sender per
/// rolling window, tracked in memory.
#[derive(Debug)]
pub struct BanWarnLimiter {
    last: DashMap<String, Instant>,
    window: Duration,
}

impl BanWarnLimiter {
    pub fn new(window: Duration) -> Self {
        BanWarnLimiter {
            last: DashMap::new(),
            window,
        }
    }

    /// Whether a warning may go out now; records the attempt if so.
    pub fn should_warn(&self, sender: &str) -> bool {
        let now = Instant::now();
        match self.last.entry(sender.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(mut entry) => {
                if now.duration_since(*entry.get()) >= self.window {
                    entry.insert(now);
                    true
                } else {
                    false
                }
            }
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(now);
                true
            }
        }
    }
}

/// The dispatch pipeline and the shared state it needs.
pub struct Dispatcher {
    client: Arc<dyn ChatClient>,
    stores: Arc<Stores>,
    registry: Arc<CommandRegistry>,
    themes: Arc<ThemeManager>,
    config: Arc<Config>,
    resolver: PermissionResolver,
    identity: parking_lot::RwLock<Option<BotIdentity>>,
    ban_warnings: BanWarnLimiter,
}

impl Dispatcher {
    pub fn new(
        client: Arc<dyn ChatClient>,
        stores: Arc<Stores>,
        registry: Arc<CommandRegistry>,
        themes: Arc<ThemeManager>,
        config: Arc<Config>,
    ) -> Self {
        let resolver = PermissionResolver::new(&config.owner_number);
        Dispatcher {
            client,
            stores,
            registry,
            themes,
            config,
            resolver,
            identity: parking_lot::RwLock::new(None),
            ban_warnings: BanWarnLimiter::new(BAN_WARN_WINDOW),
        }
    }

    /// Record the connected account's identity. Called from the
    /// connection-open event, never from message traffic.
    pub fn set_identity(&self, identity: BotIdentity) {
        info!("connected as {}", bare_number(&identity.id));
        *self.identity.write() = Some(identity);
    }

    /// The connected account's identity, if the bootstrap happened.
    pub fn identity(&self) -> Option<BotIdentity> {
        self.identity.read().clone()
    }

    pub fn client(&self) -> Arc<dyn ChatClient> {
        Arc::clone(&self.client)
    }

    pub fn stores(&self) -> Arc<Stores> {
        Arc::clone(&self.stores)
    }

    /// Run one inbound message through the pipeline.
    ///
    /// Always returns `Ok`: every failure mode inside is either replied
    /// to, logged, or both. The caller never needs to special-case it.
    pub async fn handle_message(&self, msg: InboundMessage) -> anyhow::Result<()> {
        let chat_id = msg.key.chat_id.clone();
        if chat_id.is_empty() || chat_id == STATUS_BROADCAST {
            return Ok(());
        }

        let Some(identity) = self.identity() else {
            debug!("message before identity bootstrap, ignoring");
            return Ok(());
        };

        if msg.key.from_self && !self.config.allow_self_commands {
            return Ok(());
        }

        let Some(sender_raw) = msg.sender_raw(&identity.id).map(str::to_string) else {
            return Ok(());
        };

        let text = extract_text(&msg.body).to_string();
        let Some(invocation) = parse_invocation(&self.config.prefix, &text) else {
            return Ok(());
        };

        let is_group = msg.is_group();
        let sender = bare_number(&sender_raw);
        let perms = self
            .resolver
            .resolve(
                self.client.as_ref(),
                &sender_raw,
                &identity.id,
                &chat_id,
                is_group,
                &self.stores,
            )
            .await;

        // Private mode drops silently: a stealth gate, unlike the ban.
        let private = self.stores.private.load().await;
        if private.enabled && !perms.can_use_owner_commands() && !private.allows(&sender) {
            debug!("private mode: dropping {} from {sender}", invocation.name);
            return Ok(());
        }

        if perms.is_banned && !BAN_EXEMPT.contains(&invocation.name.as_str()) {
            if !msg.key.from_self && self.ban_warnings.should_warn(&sender) {
                self.send_reply(&msg, "⛔ You are banned from this bot.").await;
            }
            debug!("banned sender {sender}, dropping {}", invocation.name);
            return Ok(());
        }

        let Some(command) = self.registry.lookup(&invocation.name) else {
            // Unknown commands get a reply even when self-sent; that is
            // how operators discover typos.
            self.send_reply(
                &msg,
                &format!(
                    "❌ Unknown command. Type {}menu to see the available commands.",
                    self.config.prefix
                ),
            )
            .await;
            return Ok(());
        };

        if command.owner_only() && !perms.can_use_owner_commands() {
            self.send_reply(&msg, "❌ This command is reserved for the owner.")
                .await;
            return Ok(());
        }

        info!(
            command = %invocation.name,
            sender = %sender,
            chat = %chat_id,
            group = is_group,
            "executing command"
        );

        let ctx = CommandContext {
            client: Arc::clone(&self.client),
            message: msg.clone(),
            args: invocation.args.clone(),
            chat_id: chat_id.clone(),
            sender: sender.clone(),
            bot_id: identity.bare(),
            prefix: self.config.prefix.clone(),
            is_group,
            perms,
            stores: Arc::clone(&self.stores),
            themes: Arc::clone(&self.themes),
            registry: Arc::clone(&self.registry),
        };

        match command.execute(&ctx).await {
            Ok(()) => {
                self.acknowledge(&msg).await;
                self.record_usage(&sender).await;
            }
            Err(e) => {
                error!(command = %invocation.name, "command failed: {e:#}");
                self.send_reply(
                    &msg,
                    &format!("❌ The {} command failed. Please try again.", invocation.name),
                )
                .await;
            }
        }

        Ok(())
    }

    /// Best-effort quoted reply. Send failures are logged and swallowed;
    /// there is no reply-to-a-failed-reply path.
    async fn send_reply(&self, msg: &InboundMessage, text: &str) {
        if let Err(e) = self
            .client
            .send_message(
                &msg.key.chat_id,
                OutgoingContent::text(text),
                SendOptions::quoting(&msg.key),
            )
            .await
        {
            warn!("reply to {} failed: {e}", msg.key.chat_id);
        }
    }

    /// Best-effort acknowledgement reaction. Reactions are cosmetic,
    /// never load-bearing.
    async fn acknowledge(&self, msg: &InboundMessage) {
        let _ = self
            .client
            .send_message(
                &msg.key.chat_id,
                OutgoingContent::Reaction {
                    emoji: self.config.ack_reaction.clone(),
                    target: msg.key.clone(),
                },
                SendOptions::default(),
            )
            .await;
    }

    /// Bump the sender's usage counters after a successful command.
    async fn record_usage(&self, sender: &str) {
        if sender.is_empty() {
            return;
        }
        let now = chrono::Utc::now().to_rfc3339();
        if let Err(e) = self
            .stores
            .users
            .update(|stats| stats.record_command(sender, now))
            .await
        {
            warn!("failed to record usage for {sender}: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_invocation() {
        let inv = parse_invocation(".", ".ban 12345").unwrap();
        assert_eq!(inv.name, "ban");
        assert_eq!(inv.args, vec!["12345".to_string()]);
        assert_eq!(inv.raw_text, ".ban 12345");
    }

    #[test]
    fn test_parse_lowercases_name_keeps_arg_case() {
        let inv = parse_invocation(".", ".BAN Add Someone").unwrap();
        assert_eq!(inv.name, "ban");
        assert_eq!(inv.args, vec!["Add".to_string(), "Someone".to_string()]);
    }

    #[test]
    fn test_parse_collapses_whitespace_runs() {
        let inv = parse_invocation(".", ".private   add    42").unwrap();
        assert_eq!(inv.args, vec!["add".to_string(), "42".to_string()]);
    }

    #[test]
    fn test_parse_rejects_non_commands() {
        assert!(parse_invocation(".", "hello there").is_none());
        assert!(parse_invocation(".", "").is_none());
        assert!(parse_invocation(".", ".").is_none());
        assert!(parse_invocation(".", ".   ").is_none());
    }

    #[test]
    fn test_ban_warn_limiter_window() {
        let limiter = BanWarnLimiter::new(Duration::from_secs(60));
        assert!(limiter.should_warn("123"));
        assert!(!limiter.should_warn("123"));
        // A different sender has its own window.
        assert!(limiter.should_warn("456"));
    }

    #[test]
    fn test_ban_warn_limiter_expiry() {
        let limiter = BanWarnLimiter::new(Duration::from_millis(0));
        assert!(limiter.should_warn("123"));
        assert!(limiter.should_warn("123"));
    }
}
