//! Anti-demote toggle.

use async_trait::async_trait;

use super::{Command, CommandContext};

pub struct AntiDemote;

#[async_trait]
impl Command for AntiDemote {
    fn name(&self) -> &str {
        "antidemote"
    }

    fn description(&self) -> &str {
        "Automatically re-promote admins who get demoted"
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
                    .update(|t| t.antidemote.enable(group_id.clone()))
                    .await?;
                ctx.reply(
                    "✅ *Anti-demote enabled!*\n\nFrom now on, any demoted admin will be re-promoted automatically.",
                )
                .await
            }
            Some("off") | Some("disable") | Some("0") => {
                ctx.stores
                    .toggles
                    .update(|t| t.antidemote.disable(&group_id))
                    .await?;
                ctx.reply("❌ *Anti-demote disabled.*").await
            }
            _ => {
                let toggles = ctx.stores.toggles.load().await;
                let status = if toggles.antidemote.enabled(&group_id) {
                    "✅ Enabled"
                } else {
                    "❌ Disabled"
                };
                ctx.reply(format!(
                    "📋 *Anti-demote status*\n\nThis group: {status}\n\nUsage:\n- *{p}antidemote on*: Enable\n- *{p}antidemote off*: Disable",
                    p = ctx.prefix
                ))
                .await
            }
        }
    }
}
