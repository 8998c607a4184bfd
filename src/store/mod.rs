//! Flat JSON persistence.
//!
//! Every store is one pretty-printed JSON document, read and written
//! wholesale. Missing files are lazily created with their default shape;
//! malformed files fail closed to the same default rather than crashing.
//! Mutations run under a per-store writer lock so at most one
//! read-modify-write is in flight per document.

mod json;
mod models;

pub use json::{JsonStore, StoreError};
pub use models::{
    level_for, level_title, AccessList, BanList, ModerationToggles, PrivateMode, ToggleMap,
    UserRecord, UserStats,
};

use std::path::Path;

use tracing::info;

/// The bundle of persisted stores handed to the dispatcher and handlers.
#[derive(Debug)]
pub struct Stores {
    /// Generic per-user stats (messages, commands, level).
    pub users: JsonStore<UserStats>,
    /// Bot-wide ban list.
    pub banned: JsonStore<BanList>,
    /// Private-mode flag and allow-list.
    pub private: JsonStore<PrivateMode>,
    /// Extra owner-equivalent authorization list.
    pub access: JsonStore<AccessList>,
    /// Per-group moderation toggles.
    pub toggles: JsonStore<ModerationToggles>,
}

impl Stores {
    /// Open the store bundle under `data_dir`, creating the directory and
    /// initializing any missing documents with their default shapes.
    pub async fn open(data_dir: &Path) -> Result<Self, StoreError> {
        tokio::fs::create_dir_all(data_dir)
            .await
            .map_err(|e| StoreError::Io(data_dir.display().to_string(), e))?;

        let stores = Stores {
            users: JsonStore::new(data_dir.join("database.json")),
            banned: JsonStore::new(data_dir.join("banned.json")),
            private: JsonStore::new(data_dir.join("private.json")),
            access: JsonStore::new(data_dir.join("acces.json")),
            toggles: JsonStore::new(data_dir.join("antilinks.json")),
        };

        stores.users.init().await?;
        stores.banned.init().await?;
        stores.private.init().await?;
        stores.access.init().await?;
        stores.toggles.init().await?;

        info!("stores ready under {}", data_dir.display());
        Ok(stores)
    }
}
