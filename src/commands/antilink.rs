//! Antilink toggles.
//!
//! Two independent per-group switches: `all` removes any link, `wa`
//! removes only chat-invite links. Enforcement lives in
//! `events::antilink`.

use async_trait::async_trait;

use super::{Command, CommandContext};

pub struct AntiLink;

#[async_trait]
impl Command for AntiLink {
    fn name(&self) -> &str {
        "antilink"
    }

    fn description(&self) -> &str {
        "Delete messages containing links"
    }

    async fn execute(&self, ctx: &CommandContext) -> anyhow::Result<()> {
        if !ctx.is_group {
            return ctx.reply("❌ This command can only be used in a group.").await;
        }
        if !ctx.perms.is_group_admin && !ctx.perms.can_use_owner_commands() {
            return ctx.reply("❌ You must be a group admin to use this command.").await;
        }

        let group_id = ctx.chat_id.clone();
        let action = ctx.args.first().map(|a| a.to_lowercase());
        let setting = ctx.args.get(1).map(|a| a.to_lowercase());

        match (action.as_deref(), setting.as_deref()) {
            (None, _) => {
                let toggles = ctx.stores.toggles.load().await;
                let all = if toggles.antilink.enabled(&group_id) {
                    "✅ Enabled"
                } else {
                    "❌ Disabled"
                };
                let wa = if toggles.antilink_whatsapp.enabled(&group_id) {
                    "✅ Enabled"
                } else {
                    "❌ Disabled"
                };
                ctx.reply(format!(
                    "📋 *ANTILINK STATUS*\n\n\
                     ▸ *All links*: {all}\n\
                     ▸ *Invite links*: {wa}\n\n\
                     *Usage:*\n\
                     • {p}antilink all on/off - Any link\n\
                     • {p}antilink wa on/off - Invite links only\n\
                     • {p}antilink off - Disable everything",
                    p = ctx.prefix
                ))
                .await
            }
            (Some("off"), _) => {
                ctx.stores
                    .toggles
                    .update(|t| {
                        t.antilink.disable(&group_id);
                        t.antilink_whatsapp.disable(&group_id);
                    })
                    .await?;
                ctx.reply("❌ *Antilink fully disabled.*").await
            }
            (Some("all"), Some("on")) => {
                ctx.stores
                    .toggles
                    .update(|t| t.antilink.enable(group_id.clone()))
                    .await?;
                ctx.reply("✅ *Antilink enabled.*\n\nEvery message containing a link will be deleted.")
                    .await
            }
            (Some("all"), Some("off")) => {
                ctx.stores
                    .toggles
                    .update(|t| t.antilink.disable(&group_id))
                    .await?;
                ctx.reply("❌ *Antilink for all links disabled.*").await
            }
            (Some("wa"), Some("on")) => {
                ctx.stores
                    .toggles
                    .update(|t| t.antilink_whatsapp.enable(group_id.clone()))
                    .await?;
                ctx.reply("✅ *Antilink enabled for invite links.*").await
            }
            (Some("wa"), Some("off")) => {
                ctx.stores
                    .toggles
                    .update(|t| t.antilink_whatsapp.disable(&group_id))
                    .await?;
                ctx.reply("❌ *Antilink for invite links disabled.*").await
            }
            _ => {
                ctx.reply(format!(
                    "❌ Unknown option. Type {}antilink to see the usage.",
                    ctx.prefix
                ))
                .await
            }
        }
    }
}
