//! Stdio development driver.
//!
//! Runs the full dispatch pipeline with the transport supplied
//! out-of-process: inbound [`ClientEvent`]s arrive as JSON lines on stdin,
//! outbound protocol calls leave as JSON lines on stdout. Useful for
//! exercising the bot without a live connection; a production embedding
//! links the library and passes its own [`ChatClient`] instead.

use async_trait::async_trait;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::{
    ChatClient, ClientError, ClientEvent, GroupMetadata, OutgoingContent, RoleAction, SendOptions,
};

/// Outbound call record written to stdout.
#[derive(Debug, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
enum OutboundCall<'a> {
    SendMessage {
        chat_id: &'a str,
        content: &'a OutgoingContent,
        options: &'a SendOptions,
    },
    GroupMetadata {
        chat_id: &'a str,
    },
    UpdateParticipantRoles {
        chat_id: &'a str,
        participants: &'a [String],
        action: RoleAction,
    },
}

/// A [`ChatClient`] that records outbound calls as JSON lines on stdout.
///
/// Group metadata is not available from a line-oriented driver, so
/// metadata queries fail; the pipeline is built to degrade on exactly
/// that failure.
#[derive(Debug, Default)]
pub struct StdioClient;

impl StdioClient {
    pub fn new() -> Self {
        StdioClient
    }

    fn emit(&self, call: &OutboundCall<'_>) {
        match serde_json::to_string(call) {
            Ok(line) => println!("{line}"),
            Err(e) => warn!("failed to encode outbound call: {e}"),
        }
    }
}

#[async_trait]
impl ChatClient for StdioClient {
    async fn send_message(
        &self,
        chat_id: &str,
        content: OutgoingContent,
        options: SendOptions,
    ) -> Result<(), ClientError> {
        self.emit(&OutboundCall::SendMessage {
            chat_id,
            content: &content,
            options: &options,
        });
        Ok(())
    }

    async fn group_metadata(&self, chat_id: &str) -> Result<GroupMetadata, ClientError> {
        self.emit(&OutboundCall::GroupMetadata { chat_id });
        Err(ClientError::Metadata(chat_id.to_string()))
    }

    async fn update_participant_roles(
        &self,
        chat_id: &str,
        participants: &[String],
        action: RoleAction,
    ) -> Result<(), ClientError> {
        self.emit(&OutboundCall::UpdateParticipantRoles {
            chat_id,
            participants,
            action,
        });
        Ok(())
    }
}

/// Read JSON-encoded [`ClientEvent`]s from stdin into an event channel.
///
/// Malformed lines are logged and skipped. The channel closes when stdin
/// reaches end of file, which ends the run loop.
pub fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<ClientEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<ClientEvent>(line) {
                        Ok(event) => {
                            if tx.send(event).is_err() {
                                break;
                            }
                        }
                        Err(e) => warn!("skipping malformed event line: {e}"),
                    }
                }
                Ok(None) => {
                    debug!("stdin closed, ending event feed");
                    break;
                }
                Err(e) => {
                    warn!("stdin read error: {e}");
                    break;
                }
            }
        }
    });

    rx
}
