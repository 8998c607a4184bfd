//! Command registry.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use super::Command;

/// Mapping from lower-cased command name to handler.
///
/// Built once at startup and read-only during dispatch. Later
/// registrations for the same name overwrite earlier ones; registration
/// order carries no meaning.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Arc<dyn Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command under its lower-cased name.
    ///
    /// A command without a usable name is rejected with a warning, not an
    /// error: one bad unit must not take the whole set down.
    pub fn register(&mut self, command: Arc<dyn Command>) {
        let name = command.name().trim().to_lowercase();
        if name.is_empty() {
            warn!("skipping command registration with empty name");
            return;
        }
        if self.commands.insert(name.clone(), command).is_some() {
            debug!("command {name} re-registered, keeping the latest");
        }
    }

    /// Look up a command by name, case-insensitively.
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands.get(&name.to_lowercase()).cloned()
    }

    /// All registered commands, in no particular order.
    pub fn all(&self) -> Vec<Arc<dyn Command>> {
        self.commands.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandContext;
    use async_trait::async_trait;

    struct Named(&'static str, &'static str);

    #[async_trait]
    impl Command for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            self.1
        }

        async fn execute(&self, _ctx: &CommandContext) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut registry = CommandRegistry::new();
        registry.register(Arc::new(Named("Ping", "a")));

        assert!(registry.lookup("ping").is_some());
        assert!(registry.lookup("PING").is_some());
        assert!(registry.lookup("pong").is_none());
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = CommandRegistry::new();
        registry.register(Arc::new(Named("ping", "first")));
        registry.register(Arc::new(Named("ping", "second")));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("ping").unwrap().description(), "second");
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let mut registry = CommandRegistry::new();
        registry.register(Arc::new(Named("  ", "blank")));
        assert!(registry.is_empty());
    }
}
