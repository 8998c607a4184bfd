//! Ban list management.

use async_trait::async_trait;

use super::{Command, CommandContext};
use crate::store::BanList;
use crate::utils::to_canonical_jid;

fn render_list(list: &BanList, prefix: &str) -> String {
    let mut text = String::from("⛔ *Banned users*\n\n");
    if list.banned.is_empty() {
        text.push_str("No one is banned.");
    } else {
        for (i, id) in list.banned.iter().enumerate() {
            text.push_str(&format!("{}. {id}\n", i + 1));
        }
    }
    text.push_str(&format!(
        "\n\n*Usage:*\n\
         ▸ Reply to someone with {prefix}ban add\n\
         ▸ Reply to someone with {prefix}ban remove\n\
         ▸ {prefix}ban list - Show this list\n\
         ▸ {prefix}ban clear - Unban everyone"
    ));
    text
}

pub struct Ban;

#[async_trait]
impl Command for Ban {
    fn name(&self) -> &str {
        "ban"
    }

    fn description(&self) -> &str {
        "Ban a user from the bot (reply to their message)"
    }

    fn owner_only(&self) -> bool {
        true
    }

    async fn execute(&self, ctx: &CommandContext) -> anyhow::Result<()> {
        let sub = ctx.args.first().map(|a| a.to_lowercase());

        match sub.as_deref() {
            None | Some("list") => {
                let list = ctx.stores.banned.load().await;
                ctx.reply(render_list(&list, &ctx.prefix)).await
            }
            Some("add") => {
                let Some(target) = ctx.quoted_target() else {
                    return ctx
                        .reply("❌ Reply to the message of the person you want to ban.")
                        .await;
                };
                if target == ctx.bot_id {
                    return ctx.reply("⚠️ You cannot ban the bot itself.").await;
                }

                let added = ctx
                    .stores
                    .banned
                    .update(|list| list.add(target.clone()))
                    .await?;
                if !added {
                    return ctx.reply(format!("⚠️ User {target} is already banned.")).await;
                }

                let mention = to_canonical_jid(&target).unwrap_or_default();
                ctx.reply_mentioning(format!("✅ User @{target} was banned from the bot."), vec![mention])
                    .await
            }
            Some("remove") => {
                let Some(target) = ctx.quoted_target() else {
                    return ctx
                        .reply("❌ Reply to the message of the person you want to unban.")
                        .await;
                };

                let removed = ctx.stores.banned.update(|list| list.remove(&target)).await?;
                if !removed {
                    return ctx
                        .reply(format!("❌ User {target} is not on the ban list."))
                        .await;
                }
                ctx.reply(format!("✅ User {target} was unbanned.")).await
            }
            Some("clear") => {
                ctx.stores.banned.update(|list| list.banned.clear()).await?;
                ctx.reply("✅ Everyone has been unbanned.").await
            }
            Some(_) => {
                ctx.reply("❌ Unknown subcommand. Use: add, remove, clear or list")
                    .await
            }
        }
    }
}
