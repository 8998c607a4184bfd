//! Per-message permission resolution.
//!
//! Every dispatch computes a fresh [`PermissionSnapshot`]; nothing here is
//! cached across messages, because group admin status can change between
//! any two of them.

use tracing::debug;

use crate::client::ChatClient;
use crate::store::Stores;
use crate::utils::bare_number;

/// The boolean permission facts for one inbound message.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionSnapshot {
    /// Sender is the connected account itself or the configured owner.
    pub is_owner: bool,
    /// Sender is on the extra-authorized list: a distinct, additive,
    /// revocable capability.
    pub is_authorized_extra: bool,
    /// Sender is on the ban list.
    pub is_banned: bool,
    /// Sender holds an admin role in the originating group.
    pub is_group_admin: bool,
    /// The bot holds an admin role in the originating group.
    pub is_bot_group_admin: bool,
}

impl PermissionSnapshot {
    /// Gate for `owner_only` commands. Owner-only does not mean
    /// owner-exclusive: the extra-authorized list qualifies too.
    pub fn can_use_owner_commands(&self) -> bool {
        self.is_owner || self.is_authorized_extra
    }
}

/// Resolves permission snapshots against the stores and group metadata.
#[derive(Debug, Clone)]
pub struct PermissionResolver {
    /// Configured owner number, already in bare form. May be empty.
    owner_number: String,
}

impl PermissionResolver {
    pub fn new(owner_number: &str) -> Self {
        PermissionResolver {
            owner_number: bare_number(owner_number),
        }
    }

    /// Compute the snapshot for one message.
    ///
    /// Group admin facts are only queried for group chats, and a metadata
    /// fetch failure degrades them to false instead of failing the
    /// dispatch.
    pub async fn resolve(
        &self,
        client: &dyn ChatClient,
        sender_raw: &str,
        bot_raw: &str,
        chat_id: &str,
        is_group: bool,
        stores: &Stores,
    ) -> PermissionSnapshot {
        let sender = bare_number(sender_raw);
        let bot = bare_number(bot_raw);

        let is_owner = !sender.is_empty()
            && (sender == bot || (!self.owner_number.is_empty() && sender == self.owner_number));

        let access = stores.access.load().await;
        let is_authorized_extra = access.contains(&sender);

        let banned = stores.banned.load().await;
        let is_banned = banned.contains(&sender);

        let (is_group_admin, is_bot_group_admin) = if is_group {
            match client.group_metadata(chat_id).await {
                Ok(metadata) => {
                    let sender_admin = metadata
                        .participant_by_bare(&sender)
                        .map(|p| p.role.is_admin())
                        .unwrap_or(false);
                    let bot_admin = metadata
                        .participant_by_bare(&bot)
                        .map(|p| p.role.is_admin())
                        .unwrap_or(false);
                    (sender_admin, bot_admin)
                }
                Err(e) => {
                    debug!("group metadata fetch failed for {chat_id}: {e}");
                    (false, false)
                }
            }
        } else {
            (false, false)
        };

        PermissionSnapshot {
            is_owner,
            is_authorized_extra,
            is_banned,
            is_group_admin,
            is_bot_group_admin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_gate_is_additive() {
        let snapshot = PermissionSnapshot {
            is_owner: false,
            is_authorized_extra: true,
            ..Default::default()
        };
        assert!(snapshot.can_use_owner_commands());

        let owner = PermissionSnapshot {
            is_owner: true,
            ..Default::default()
        };
        assert!(owner.can_use_owner_commands());

        let neither = PermissionSnapshot::default();
        assert!(!neither.can_use_owner_commands());
    }
}
