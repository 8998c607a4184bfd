//! Latency check.

use std::time::Instant;

use async_trait::async_trait;

use super::{Command, CommandContext};

/// Always available, even to banned senders: the cheapest way to verify
/// the bot is alive.
pub struct Ping;

#[async_trait]
impl Command for Ping {
    fn name(&self) -> &str {
        "ping"
    }

    fn description(&self) -> &str {
        "Check the bot's latency"
    }

    async fn execute(&self, ctx: &CommandContext) -> anyhow::Result<()> {
        let start = Instant::now();
        ctx.reply("🏓 Pong!").await?;
        let latency = start.elapsed().as_millis();

        ctx.client
            .send_message(
                &ctx.chat_id,
                crate::client::OutgoingContent::text(format!("📡 Latency: {latency}ms")),
                crate::client::SendOptions::default(),
            )
            .await?;
        Ok(())
    }
}
