//! Link policing for group messages.
//!
//! When a group has an antilink toggle on and the bot holds an admin
//! role, messages carrying links are deleted and the sender is warned.
//! The `antilink` toggle covers any link; `antilink_whatsapp` covers only
//! chat-invite links.

use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::{debug, info, warn};

use crate::client::{BotIdentity, ChatClient, InboundMessage, OutgoingContent, SendOptions};
use crate::store::Stores;
use crate::utils::{bare_number, extract_text};

/// Hosts that mark a chat-invite link.
static INVITE_HOSTS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "chat.whatsapp.com/",
        "whatsapp.com/channel/",
        "invite.whatsapp.com/",
    ]
});

/// Whether the text contains any link: an explicit scheme, a `www.` host,
/// or a bare domain token.
pub fn contains_link(text: &str) -> bool {
    let lowered = text.to_lowercase();
    if lowered.contains("http://") || lowered.contains("https://") || lowered.contains("www.") {
        return true;
    }
    lowered.split_whitespace().any(looks_like_domain)
}

/// Whether the text contains a chat-invite link.
pub fn contains_invite_link(text: &str) -> bool {
    let lowered = text.to_lowercase();
    INVITE_HOSTS.iter().any(|host| lowered.contains(host))
}

/// Heuristic for bare domain tokens like `example.com` or
/// `sub.example.org/path`.
fn looks_like_domain(token: &str) -> bool {
    let token = token.trim_matches(|c: char| !c.is_ascii_alphanumeric() && c != '.' && c != '/');
    let host = token.split('/').next().unwrap_or("");
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let tld = labels[labels.len() - 1];
    if tld.len() < 2 || !tld.chars().all(|c| c.is_ascii_alphabetic()) {
        return false;
    }
    labels.iter().all(|label| {
        !label.is_empty()
            && label
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

/// Inspects group messages and enforces the antilink toggles.
pub struct LinkGuard {
    client: Arc<dyn ChatClient>,
    stores: Arc<Stores>,
}

impl LinkGuard {
    pub fn new(client: Arc<dyn ChatClient>, stores: Arc<Stores>) -> Self {
        LinkGuard { client, stores }
    }

    /// Check one inbound message. Self-sent and non-group messages pass
    /// through untouched.
    pub async fn inspect(
        &self,
        msg: &InboundMessage,
        identity: Option<&BotIdentity>,
    ) -> anyhow::Result<()> {
        if !msg.is_group() || msg.key.from_self {
            return Ok(());
        }
        let text = extract_text(&msg.body);
        if text.is_empty() {
            return Ok(());
        }

        let group_id = &msg.key.chat_id;
        let toggles = self.stores.toggles.load().await;
        let all_links = toggles.antilink.enabled(group_id);
        let invite_links = toggles.antilink_whatsapp.enabled(group_id);
        if !all_links && !invite_links {
            return Ok(());
        }

        // Deleting messages needs an admin role; stand down otherwise.
        let Some(identity) = identity else {
            return Ok(());
        };
        let bot_is_admin = match self.client.group_metadata(group_id).await {
            Ok(metadata) => metadata
                .participant_by_bare(&identity.bare())
                .or_else(|| {
                    identity
                        .bare_lid()
                        .and_then(|lid| metadata.participant_by_bare(&lid))
                })
                .map(|p| p.role.is_admin())
                .unwrap_or(false),
            Err(e) => {
                debug!("metadata fetch failed for {group_id}: {e}");
                false
            }
        };
        if !bot_is_admin {
            return Ok(());
        }

        let kind = if all_links && contains_link(text) {
            Some("links")
        } else if invite_links && contains_invite_link(text) {
            Some("invite links")
        } else {
            None
        };
        let Some(kind) = kind else {
            return Ok(());
        };

        if let Err(e) = self
            .client
            .send_message(
                group_id,
                OutgoingContent::Delete {
                    target: msg.key.clone(),
                },
                SendOptions::default(),
            )
            .await
        {
            warn!("could not delete link message in {group_id}: {e}");
            return Ok(());
        }

        let sender_raw = msg.key.sender_id.clone().unwrap_or_default();
        let sender = bare_number(&sender_raw);
        let warning = format!("⚠️ @{sender}, {kind} are not allowed in this group.");
        if let Err(e) = self
            .client
            .send_message(
                group_id,
                OutgoingContent::text_with_mentions(warning, vec![sender_raw]),
                SendOptions::default(),
            )
            .await
        {
            warn!("antilink warning in {group_id} failed: {e}");
        }

        info!(group = %group_id, sender = %sender, "removed {kind} message");
        Ok(())
    }
}
