//! On-disk document shapes.
//!
//! Field names (including the legacy `groupes` and `authorizedIds` keys)
//! match the data directories of existing deployments, so a bot can be
//! pointed at an old `db/` folder and keep its lists. Maps are BTreeMaps
//! to keep serialization byte-stable across load/save round-trips.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Bot-wide ban list: `{ "banned": [] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BanList {
    pub banned: Vec<String>,
}

impl BanList {
    pub fn contains(&self, bare: &str) -> bool {
        self.banned.iter().any(|b| b == bare)
    }

    /// Add an id. Returns false when already present.
    pub fn add(&mut self, bare: impl Into<String>) -> bool {
        let bare = bare.into();
        if self.contains(&bare) {
            return false;
        }
        self.banned.push(bare);
        true
    }

    /// Remove an id. Returns false when absent.
    pub fn remove(&mut self, bare: &str) -> bool {
        let before = self.banned.len();
        self.banned.retain(|b| b != bare);
        self.banned.len() != before
    }
}

/// Private mode: `{ "enabled": false, "allowed": [] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrivateMode {
    pub enabled: bool,
    pub allowed: Vec<String>,
}

impl PrivateMode {
    pub fn allows(&self, bare: &str) -> bool {
        self.allowed.iter().any(|a| a == bare)
    }
}

/// Extra owner-equivalent authorization: `{ "authorizedIds": [] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessList {
    #[serde(rename = "authorizedIds")]
    pub authorized_ids: Vec<String>,
}

impl AccessList {
    pub fn contains(&self, bare: &str) -> bool {
        self.authorized_ids.iter().any(|a| a == bare)
    }
}

/// Per-group boolean toggle map: `{ "groupes": {} }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToggleMap {
    #[serde(rename = "groupes")]
    pub groups: BTreeMap<String, bool>,
}

impl ToggleMap {
    pub fn enabled(&self, group_id: &str) -> bool {
        self.groups.get(group_id).copied().unwrap_or(false)
    }

    pub fn enable(&mut self, group_id: impl Into<String>) {
        self.groups.insert(group_id.into(), true);
    }

    /// Disabling removes the key, keeping documents small.
    pub fn disable(&mut self, group_id: &str) {
        self.groups.remove(group_id);
    }
}

/// Per-group moderation toggles, one map per policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationToggles {
    pub antipromote: ToggleMap,
    pub antidemote: ToggleMap,
    pub antilink: ToggleMap,
    pub antilink_whatsapp: ToggleMap,
}

/// One user's activity record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserRecord {
    pub messages: u64,
    pub commands: u64,
    pub level: u32,
    #[serde(rename = "firstSeen")]
    pub first_seen: String,
    #[serde(rename = "lastSeen")]
    pub last_seen: String,
}

/// Activity level thresholds, by message count.
pub(crate) const LEVELS: &[(u32, u64, &str)] = &[
    (1, 0, "🌱 Novice"),
    (2, 10, "🔰 Apprentice"),
    (3, 50, "🔥 Active"),
    (4, 200, "💫 Expert"),
    (5, 500, "👑 Elite"),
    (6, 1000, "⚜️ Master"),
    (7, 2000, "💎 Legend"),
    (8, 5000, "🏆 Mythic"),
];

/// Level reached for a given message count.
pub fn level_for(messages: u64) -> u32 {
    LEVELS
        .iter()
        .rev()
        .find(|(_, min, _)| messages >= *min)
        .map(|(level, _, _)| *level)
        .unwrap_or(1)
}

/// Display title for a level.
pub fn level_title(level: u32) -> &'static str {
    LEVELS
        .iter()
        .find(|(l, _, _)| *l == level)
        .map(|(_, _, title)| *title)
        .unwrap_or(LEVELS[0].2)
}

/// Generic user stats store: `{ "users": {} }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserStats {
    pub users: BTreeMap<String, UserRecord>,
}

impl UserStats {
    /// Record one executed command for a user, stamping first/last-seen
    /// and recomputing the level.
    pub fn record_command(&mut self, bare: &str, now_iso: String) {
        let record = self.users.entry(bare.to_string()).or_default();
        if record.first_seen.is_empty() {
            record.first_seen = now_iso.clone();
        }
        record.last_seen = now_iso;
        record.messages += 1;
        record.commands += 1;
        record.level = level_for(record.messages);
    }

    pub fn get(&self, bare: &str) -> Option<&UserRecord> {
        self.users.get(bare)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ban_list_add_remove() {
        let mut list = BanList::default();
        assert!(list.add("123"));
        assert!(!list.add("123"));
        assert!(list.contains("123"));
        assert!(list.remove("123"));
        assert!(!list.remove("123"));
    }

    #[test]
    fn test_toggle_map_disable_removes_key() {
        let mut map = ToggleMap::default();
        map.enable("g@g.us");
        assert!(map.enabled("g@g.us"));
        map.disable("g@g.us");
        assert!(!map.enabled("g@g.us"));
        assert!(map.groups.is_empty());
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(level_for(0), 1);
        assert_eq!(level_for(9), 1);
        assert_eq!(level_for(10), 2);
        assert_eq!(level_for(4999), 7);
        assert_eq!(level_for(5000), 8);
    }

    #[test]
    fn test_record_command_stamps_and_levels() {
        let mut stats = UserStats::default();
        for _ in 0..10 {
            stats.record_command("42", "2024-01-01T00:00:00Z".to_string());
        }
        let rec = stats.get("42").unwrap();
        assert_eq!(rec.messages, 10);
        assert_eq!(rec.commands, 10);
        assert_eq!(rec.level, 2);
        assert_eq!(rec.first_seen, "2024-01-01T00:00:00Z");
    }

    #[test]
    fn test_legacy_key_names_survive_round_trip() {
        let toggles = ModerationToggles::default();
        let json = serde_json::to_string(&toggles).unwrap();
        assert!(json.contains("groupes"));

        let access = AccessList::default();
        let json = serde_json::to_string(&access).unwrap();
        assert!(json.contains("authorizedIds"));
    }
}
