//! Anti-promote toggle.

use async_trait::async_trait;

use super::{Command, CommandContext};

pub struct AntiPromote;

#[async_trait]
impl Command for AntiPromote {
    fn name(&self) -> &str {
        "antipromote"
    }

    fn description(&self) -> &str {
        "Automatically demote anyone who gets promoted"
    }

    async fn execute(&self, ctx: &CommandContext) -> anyhow::Result<()> {
        if !ctx.is_group {
            return ctx.reply("❌ This command can only be used in a group.").await;
        }
        if !ctx.perms.is_group_admin && !ctx.perms.can_use_owner_commands() {
            return ctx.reply("❌ You must be a group admin to use this command.").await;
        }

        let group_id = ctx.chat_id.clone();
        match ctx.args.first().map(|a| a.to_lowercase()).as_deref() {
            Some("on") | Some("enable") | Some("1") => {
                ctx.stores
                    .toggles
                    .update(|t| t.antipromote.enable(group_id.clone()))
                    .await?;
                ctx.reply(
                    "✅ *Anti-promote enabled!*\n\nFrom now on, anyone promoted to admin will be demoted automatically.",
                )
                .await
            }
            Some("off") | Some("disable") | Some("0") => {
                ctx.stores
                    .toggles
                    .update(|t| t.antipromote.disable(&group_id))
                    .await?;
                ctx.reply("❌ *Anti-promote disabled.*").await
            }
            _ => {
                let toggles = ctx.stores.toggles.load().await;
                let status = if toggles.antipromote.enabled(&group_id) {
                    "✅ Enabled"
                } else {
                    "❌ Disabled"
                };
                ctx.reply(format!(
                    "📋 *Anti-promote status*\n\nThis group: {status}\n\nUsage:\n- *{p}antipromote on*: Enable\n- *{p}antipromote off*: Disable",
                    p = ctx.prefix
                ))
                .await
            }
        }
    }
}
