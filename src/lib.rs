//! Warden - command-dispatch and moderation layer for a WhatsApp-style bot.
//!
//! The messaging transport is a supplied capability behind the
//! [`client::ChatClient`] trait; this crate owns everything between the
//! protocol socket and the command handlers.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `client` - Protocol collaborator seam (trait, envelope, events)
//! - `store` - Flat JSON persistence (ban list, private mode, toggles)
//! - `permissions` - Per-message permission snapshot resolution
//! - `commands` - Command trait, registry and the built-in command set
//! - `bot` - Dispatcher state machine and the event-loop runtime
//! - `events` - Reactors for role-change and link-bearing messages
//! - `theme` - Theme JSON loading (menu strings and images)
//! - `session` - Session bootstrap from the paste host
//! - `utils` - Identifier normalization and text extraction

pub mod bot;
pub mod client;
pub mod commands;
pub mod config;
pub mod events;
pub mod permissions;
pub mod session;
pub mod store;
pub mod theme;
pub mod utils;
