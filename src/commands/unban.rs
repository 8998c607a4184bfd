//! Direct unban by reply, mention or number.

use async_trait::async_trait;

use super::{Command, CommandContext};
use crate::utils::to_canonical_jid;

/// Numbers shorter than this cannot be real; catches typos.
const MIN_NUMBER_LEN: usize = 7;

pub struct Unban;

#[async_trait]
impl Command for Unban {
    fn name(&self) -> &str {
        "unban"
    }

    fn description(&self) -> &str {
        "Unban a user"
    }

    fn owner_only(&self) -> bool {
        true
    }

    async fn execute(&self, ctx: &CommandContext) -> anyhow::Result<()> {
        let Some(target) = ctx.target_user(0) else {
            return ctx
                .reply(format!(
                    "❌ Mention, reply, or give a number.\nExample: {p}unban @user or {p}unban 22512345678",
                    p = ctx.prefix
                ))
                .await;
        };

        if target.len() < MIN_NUMBER_LEN {
            return ctx.reply("❌ Invalid number.").await;
        }

        let removed = ctx.stores.banned.update(|list| list.remove(&target)).await?;
        if !removed {
            return ctx
                .reply(format!("❌ User {target} is not on the ban list."))
                .await;
        }

        let mention = to_canonical_jid(&target).unwrap_or_default();
        ctx.reply_mentioning(
            format!("✅ @{target} was unbanned.\n\nThey can use the bot again."),
            vec![mention],
        )
        .await
    }
}
