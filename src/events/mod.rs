//! Event reactors.
//!
//! Reactors handle non-command events: group role changes and
//! link-bearing group messages. Each runs in its own task and contains
//! its own failures.

pub mod antilink;
pub mod moderation;

pub use antilink::LinkGuard;
pub use moderation::ModerationReactor;
