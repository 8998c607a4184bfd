//! Core bot functionality.

pub mod dispatcher;
pub mod runtime;

pub use dispatcher::{parse_invocation, BanWarnLimiter, CommandInvocation, Dispatcher};
pub use runtime::Runtime;
