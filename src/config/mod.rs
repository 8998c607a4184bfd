//! Configuration module.
//!
//! Loads configuration from environment variables.

use std::env;
use std::path::PathBuf;

/// How the moderation reactor behaves when it cannot find the bot's own
/// entry in a group roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationStrictness {
    /// Act anyway: receiving the event implies membership, and a
    /// non-admin attempt simply fails at the protocol layer.
    Assume,
    /// Do nothing unless the bot's admin role is confirmed.
    Strict,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Leading marker for command messages.
    pub prefix: String,

    /// Statically configured owner number (bare digits). The connected
    /// account itself always counts as owner; this adds a second identity
    /// that qualifies. May be empty.
    pub owner_number: String,

    /// Display name used by the dev command.
    pub owner_name: String,

    /// Session archive id on the paste host, optionally carrying the
    /// `WARDEN_` marker prefix.
    pub session_id: Option<String>,

    /// Token for the paste host API (private archives).
    pub paste_token: Option<String>,

    /// Directory holding the protocol session credentials.
    pub auth_dir: PathBuf,

    /// Directory holding the JSON stores.
    pub data_dir: PathBuf,

    /// Directory holding theme JSON files.
    pub theme_dir: PathBuf,

    /// Name of the theme to start with.
    pub bot_theme: String,

    /// Whether commands sent by the connected account itself are
    /// dispatched. On by default: the bot account is the control account.
    pub allow_self_commands: bool,

    /// Moderation reactor fallback policy.
    pub moderation_strictness: ModerationStrictness,

    /// Emoji used for the post-execution acknowledgement reaction.
    pub ack_reaction: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let prefix = env::var("PREFIX")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| ".".to_string());

        let owner_number = env::var("OWNER_NUMBER")
            .unwrap_or_default()
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();

        let moderation_strictness = match env::var("MODERATION_STRICTNESS")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "strict" => ModerationStrictness::Strict,
            _ => ModerationStrictness::Assume,
        };

        let allow_self_commands = env::var("ALLOW_SELF_COMMANDS")
            .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
            .unwrap_or(true);

        Self {
            prefix,
            owner_number,
            owner_name: env::var("OWNER_NAME").unwrap_or_default(),
            session_id: env::var("SESSION_ID").ok().filter(|s| !s.is_empty()),
            paste_token: env::var("PASTE_TOKEN").ok().filter(|s| !s.is_empty()),
            auth_dir: env::var("AUTH_DIR")
                .unwrap_or_else(|_| "session".to_string())
                .into(),
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "db".to_string()).into(),
            theme_dir: env::var("THEME_DIR")
                .unwrap_or_else(|_| "themes".to_string())
                .into(),
            bot_theme: env::var("BOT_THEME").unwrap_or_else(|_| "default".to_string()),
            allow_self_commands,
            moderation_strictness,
            ack_reaction: env::var("ACK_REACTION").unwrap_or_else(|_| "✅".to_string()),
        }
    }
}
