//! Theme loading.
//!
//! Themes are JSON documents in a themes directory; `config.json` inside
//! that directory names the default. A theme only contributes data
//! (strings and image URLs) to command output, nothing else.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Strings shared by every command that renders themed output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalStrings {
    #[serde(rename = "botName")]
    pub bot_name: String,
    pub emojii: String,
    pub greet: String,
    pub footer: String,
    pub images: Vec<String>,
}

impl Default for GlobalStrings {
    fn default() -> Self {
        GlobalStrings {
            bot_name: "WARDEN".to_string(),
            emojii: "🤖".to_string(),
            greet: "Welcome".to_string(),
            footer: "warden".to_string(),
            images: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeStrings {
    pub global: GlobalStrings,
}

/// One loaded theme document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Display name; falls back to the file stem.
    pub theme: String,
    #[serde(rename = "STRINGS")]
    pub strings: ThemeStrings,
}

/// Theme selection persisted next to the theme files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct ThemeConfig {
    #[serde(rename = "defaultTheme")]
    default_theme: String,
    #[serde(rename = "availableThemes")]
    available_themes: Vec<String>,
}

static FALLBACK_THEME: Lazy<Theme> = Lazy::new(|| Theme {
    theme: "default".to_string(),
    strings: ThemeStrings::default(),
});

/// Loads themes at startup and tracks the active selection.
#[derive(Debug)]
pub struct ThemeManager {
    dir: PathBuf,
    themes: BTreeMap<String, Theme>,
    current: RwLock<String>,
}

impl ThemeManager {
    /// Scan `dir` for `*.json` themes (excluding `config.json`) and pick
    /// the active one: `config.json`'s `defaultTheme` wins over
    /// `preferred`. A missing or empty directory leaves only the built-in
    /// fallback theme.
    pub fn load(dir: &Path, preferred: &str) -> Self {
        let mut themes = BTreeMap::new();

        match std::fs::read_dir(dir) {
            Ok(entries) => {
                for entry in entries.flatten() {
                    let path = entry.path();
                    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                        continue;
                    };
                    if path.extension().and_then(|e| e.to_str()) != Some("json")
                        || stem == "config"
                    {
                        continue;
                    }
                    match std::fs::read_to_string(&path)
                        .map_err(anyhow::Error::from)
                        .and_then(|raw| Ok(serde_json::from_str::<Theme>(&raw)?))
                    {
                        Ok(mut theme) => {
                            if theme.theme.is_empty() {
                                theme.theme = stem.to_string();
                            }
                            themes.insert(stem.to_uppercase(), theme);
                        }
                        Err(e) => warn!("skipping theme {}: {e}", path.display()),
                    }
                }
            }
            Err(e) => info!("no theme directory at {} ({e})", dir.display()),
        }

        let configured = Self::read_config(dir)
            .map(|c| c.default_theme)
            .filter(|s| !s.is_empty());

        let current = configured
            .unwrap_or_else(|| preferred.to_string())
            .to_uppercase();
        let current = if themes.contains_key(&current) {
            current
        } else {
            themes.keys().next().cloned().unwrap_or_default()
        };

        if !themes.is_empty() {
            info!("loaded {} theme(s), active: {current}", themes.len());
        }

        ThemeManager {
            dir: dir.to_path_buf(),
            themes,
            current: RwLock::new(current),
        }
    }

    fn read_config(dir: &Path) -> Option<ThemeConfig> {
        let raw = std::fs::read_to_string(dir.join("config.json")).ok()?;
        serde_json::from_str(&raw).ok()
    }

    /// Name of the active theme.
    pub fn current_name(&self) -> String {
        let name = self.current.read().clone();
        if name.is_empty() {
            FALLBACK_THEME.theme.clone()
        } else {
            name
        }
    }

    /// The active theme, or the built-in fallback.
    pub fn current(&self) -> Theme {
        let name = self.current.read().clone();
        self.themes
            .get(&name)
            .cloned()
            .unwrap_or_else(|| FALLBACK_THEME.clone())
    }

    /// Available theme names, in stable order.
    pub fn list(&self) -> Vec<String> {
        self.themes.keys().cloned().collect()
    }

    /// Switch to a theme by name and persist the selection.
    /// Returns false when the theme does not exist.
    pub async fn switch(&self, name: &str) -> bool {
        let key = name.to_uppercase();
        if !self.themes.contains_key(&key) {
            return false;
        }
        *self.current.write() = key.clone();

        let config = ThemeConfig {
            default_theme: key,
            available_themes: self.list(),
        };
        match serde_json::to_string_pretty(&config) {
            Ok(body) => {
                if let Err(e) = tokio::fs::write(self.dir.join("config.json"), body).await {
                    warn!("failed to persist theme selection: {e}");
                }
            }
            Err(e) => warn!("failed to encode theme selection: {e}"),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_directory_falls_back() {
        let manager = ThemeManager::load(Path::new("/nonexistent/themes"), "default");
        assert!(manager.list().is_empty());
        assert_eq!(manager.current().strings.global.bot_name, "WARDEN");
    }

    #[tokio::test]
    async fn test_load_and_switch() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("dusk.json"),
            r#"{"theme":"Dusk","STRINGS":{"global":{"botName":"DUSK-BOT"}}}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("dawn.json"), r#"{"theme":"Dawn"}"#).unwrap();

        let manager = ThemeManager::load(dir.path(), "dusk");
        assert_eq!(manager.list(), vec!["DAWN".to_string(), "DUSK".to_string()]);
        assert_eq!(manager.current().strings.global.bot_name, "DUSK-BOT");

        assert!(manager.switch("dawn").await);
        assert_eq!(manager.current_name(), "DAWN");
        assert!(!manager.switch("nope").await);

        // The selection is persisted for the next load.
        let reloaded = ThemeManager::load(dir.path(), "dusk");
        assert_eq!(reloaded.current_name(), "DAWN");
    }
}
