//! Bot runtime.
//!
//! Drains transport events and fans each one out into its own task, so a
//! slow handler never blocks the next event. The loop ends on ctrl-c, on
//! a closed event channel, or on a fatal disconnect.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use super::dispatcher::Dispatcher;
use crate::client::ClientEvent;
use crate::events::{LinkGuard, ModerationReactor};
use crate::session;

/// The long-lived event loop and the reactors it feeds.
pub struct Runtime {
    dispatcher: Arc<Dispatcher>,
    moderation: Arc<ModerationReactor>,
    antilink: Arc<LinkGuard>,
    auth_dir: PathBuf,
}

impl Runtime {
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        moderation: Arc<ModerationReactor>,
        antilink: Arc<LinkGuard>,
        auth_dir: PathBuf,
    ) -> Self {
        Runtime {
            dispatcher,
            moderation,
            antilink,
            auth_dir,
        }
    }

    /// Run until the event feed ends, a fatal disconnect arrives, or the
    /// process is interrupted.
    pub async fn run(
        self: Arc<Self>,
        mut events: mpsc::UnboundedReceiver<ClientEvent>,
    ) -> anyhow::Result<()> {
        info!("runtime started");
        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("interrupt received, shutting down");
                    return Ok(());
                }
                event = events.recv() => {
                    let Some(event) = event else {
                        info!("event feed closed, shutting down");
                        return Ok(());
                    };
                    if let Some(fatal) = self.clone().handle_event(event) {
                        // Session invalidation is the one error class
                        // allowed to end the process.
                        session::clean(&self.auth_dir).await;
                        return Err(anyhow::anyhow!("session invalidated: {fatal}"));
                    }
                }
            }
        }
    }

    /// Route one event. Returns the reason string for fatal disconnects.
    fn handle_event(self: Arc<Self>, event: ClientEvent) -> Option<String> {
        match event {
            ClientEvent::Connected { identity } => {
                self.dispatcher.set_identity(identity);
            }
            ClientEvent::Disconnected { info } => {
                if info.fatal {
                    error!("fatal disconnect: {}", info.reason);
                    return Some(info.reason);
                }
                warn!("disconnected: {} (transport will reconnect)", info.reason);
            }
            ClientEvent::Message(msg) => {
                let runtime = Arc::clone(&self);
                tokio::spawn(async move {
                    let identity = runtime.dispatcher.identity();
                    if let Err(e) = runtime.antilink.inspect(&msg, identity.as_ref()).await {
                        error!("antilink check failed: {e:#}");
                    }
                    if let Err(e) = runtime.dispatcher.handle_message(msg).await {
                        error!("dispatch failed: {e:#}");
                    }
                });
            }
            ClientEvent::RoleChange(change) => {
                let runtime = Arc::clone(&self);
                tokio::spawn(async move {
                    let identity = runtime.dispatcher.identity();
                    if let Err(e) = runtime.moderation.handle(change, identity).await {
                        error!("moderation reactor failed: {e:#}");
                    }
                });
            }
        }
        None
    }
}
