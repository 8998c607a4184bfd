//! Utility functions.

pub mod jid;
pub mod text;

pub use jid::{bare_number, to_canonical_jid};
pub use text::extract_text;
