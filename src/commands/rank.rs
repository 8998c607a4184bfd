//! User activity stats.

use async_trait::async_trait;

use super::{Command, CommandContext};
use crate::store::level_title;
use crate::utils::to_canonical_jid;

pub struct Rank;

#[async_trait]
impl Command for Rank {
    fn name(&self) -> &str {
        "rank"
    }

    fn description(&self) -> &str {
        "Show your rank and activity stats"
    }

    async fn execute(&self, ctx: &CommandContext) -> anyhow::Result<()> {
        // Target: mention, quoted reply or number argument; yourself
        // otherwise.
        let target = ctx.target_user(0).unwrap_or_else(|| ctx.sender.clone());
        let about_self = target == ctx.sender;

        let stats = ctx.stores.users.load().await;
        let record = stats.get(&target).cloned().unwrap_or_default();
        let level = record.level.max(1);
        let title = level_title(level);

        let who = if about_self {
            "you".to_string()
        } else {
            format!("@{target}")
        };

        let text = format!(
            "📈 *RANK & STATS*\n\n\
             👤 *User:* {who}\n\
             📊 *Messages:* {}\n\
             ⚡ *Commands:* {}\n\
             🏆 *Level {level}:* {title}\n\n\
             💡 _Stay active to level up!_",
            record.messages, record.commands,
        );

        if about_self {
            ctx.reply(text).await
        } else {
            let mention = to_canonical_jid(&target).unwrap_or_default();
            ctx.reply_mentioning(text, vec![mention]).await
        }
    }
}
