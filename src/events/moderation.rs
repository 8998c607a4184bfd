//! Group moderation reactor.
//!
//! Reverses role changes in groups where the anti-promote or anti-demote
//! toggle is on: a fresh promotion is demoted back, a demoted admin is
//! re-promoted, and the chat is told who was affected.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, info, warn};

use crate::client::{
    BotIdentity, ChatClient, GroupMetadata, OutgoingContent, RoleAction, RoleChangeEvent,
    SendOptions,
};
use crate::config::ModerationStrictness;
use crate::store::Stores;
use crate::utils::bare_number;

/// Group metadata cache lifetime. Short: roles are exactly what these
/// events change.
const METADATA_TTL: Duration = Duration::from_secs(30);

/// Reacts to group promote/demote events.
pub struct ModerationReactor {
    client: Arc<dyn ChatClient>,
    stores: Arc<Stores>,
    strictness: ModerationStrictness,
    metadata: Cache<String, Arc<GroupMetadata>>,
}

impl ModerationReactor {
    pub fn new(
        client: Arc<dyn ChatClient>,
        stores: Arc<Stores>,
        strictness: ModerationStrictness,
    ) -> Self {
        ModerationReactor {
            client,
            stores,
            strictness,
            metadata: Cache::builder()
                .max_capacity(500)
                .time_to_live(METADATA_TTL)
                .build(),
        }
    }

    /// Handle one role-change event.
    pub async fn handle(
        &self,
        event: RoleChangeEvent,
        identity: Option<BotIdentity>,
    ) -> anyhow::Result<()> {
        let toggles = self.stores.toggles.load().await;
        let enabled = match event.action {
            RoleAction::Promote => toggles.antipromote.enabled(&event.group_id),
            RoleAction::Demote => toggles.antidemote.enabled(&event.group_id),
        };
        if !enabled {
            return Ok(());
        }

        let metadata = match self.group_metadata(&event.group_id).await {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!("metadata fetch failed for {}: {e}", event.group_id);
                return Ok(());
            }
        };

        // Group rosters may list the account under its alternate linked
        // id, so try both identities.
        let bot_entry = identity.as_ref().and_then(|id| {
            metadata
                .participant_by_bare(&id.bare())
                .or_else(|| id.bare_lid().and_then(|lid| metadata.participant_by_bare(&lid)))
        });

        match bot_entry {
            Some(entry) if !entry.role.is_admin() => {
                debug!("not admin in {}, staying out of it", event.group_id);
                return Ok(());
            }
            Some(_) => {}
            None => match self.strictness {
                ModerationStrictness::Strict => {
                    warn!(
                        "own entry not found in {} roster, strict mode skips the event",
                        event.group_id
                    );
                    return Ok(());
                }
                ModerationStrictness::Assume => {
                    // Receiving the event implies membership; a non-admin
                    // attempt fails at the protocol layer and is caught
                    // below.
                    debug!(
                        "own entry not found in {} roster, acting anyway",
                        event.group_id
                    );
                }
            },
        }

        let reversal = event.action.reversal();
        for participant in &event.participants {
            if identity.as_ref().is_some_and(|id| id.matches(participant)) {
                continue;
            }

            if let Err(e) = self
                .client
                .update_participant_roles(
                    &event.group_id,
                    std::slice::from_ref(participant),
                    reversal,
                )
                .await
            {
                warn!("role reversal for {participant} failed: {e}");
                continue;
            }

            // Roles just changed under us.
            self.metadata.invalidate(&event.group_id).await;

            let bare = bare_number(participant);
            let text = match event.action {
                RoleAction::Promote => {
                    format!("⚠️ *ANTI-PROMOTE*\n\n@{bare} was automatically demoted.")
                }
                RoleAction::Demote => {
                    format!("⚠️ *ANTI-DEMOTE*\n\n@{bare} was automatically re-promoted.")
                }
            };
            if let Err(e) = self
                .client
                .send_message(
                    &event.group_id,
                    OutgoingContent::text_with_mentions(text, vec![participant.clone()]),
                    SendOptions::default(),
                )
                .await
            {
                warn!("moderation notice for {participant} failed: {e}");
            }

            info!(
                group = %event.group_id,
                participant = %bare,
                action = ?event.action,
                "reversed role change"
            );
        }

        Ok(())
    }

    async fn group_metadata(&self, group_id: &str) -> anyhow::Result<Arc<GroupMetadata>> {
        let client = Arc::clone(&self.client);
        let id = group_id.to_string();
        self.metadata
            .try_get_with(id.clone(), async move {
                client.group_metadata(&id).await.map(Arc::new)
            })
            .await
            .map_err(|e| anyhow::anyhow!("{e}"))
    }
}
