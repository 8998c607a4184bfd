//! Extra-authorized list management.
//!
//! Grants owner-equivalent command access to other accounts. Additive and
//! revocable; distinct from being the owner.

use async_trait::async_trait;

use super::{Command, CommandContext};

pub struct Access;

#[async_trait]
impl Command for Access {
    fn name(&self) -> &str {
        "access"
    }

    fn description(&self) -> &str {
        "Manage users allowed to run owner commands (reply to their message)"
    }

    fn owner_only(&self) -> bool {
        true
    }

    async fn execute(&self, ctx: &CommandContext) -> anyhow::Result<()> {
        // Authorization grants are managed in direct chats only.
        if ctx.is_group {
            return ctx.reply("❌ This command can only be used in a direct chat.").await;
        }

        let sub = ctx.args.first().map(|a| a.to_lowercase());

        match sub.as_deref() {
            None | Some("list") => {
                let access = ctx.stores.access.load().await;
                let mut text = String::from("👥 *Users allowed to run owner commands*\n\n");
                if access.authorized_ids.is_empty() {
                    text.push_str("No authorized users.");
                } else {
                    for (i, id) in access.authorized_ids.iter().enumerate() {
                        text.push_str(&format!("{}. {id}\n", i + 1));
                    }
                }
                text.push_str(&format!(
                    "\n\n*Usage:*\n\
                     ▸ *Reply* to someone's message with {p}access add\n\
                     ▸ *Reply* to someone's message with {p}access remove\n\
                     ▸ {p}access list - Show the list\n\
                     ▸ {p}access clear - Remove every id",
                    p = ctx.prefix
                ));
                ctx.reply(text).await
            }
            Some("add") => {
                let Some(target) = ctx.quoted_target() else {
                    return ctx
                        .reply("❌ Reply to the message of the person you want to authorize.")
                        .await;
                };
                if target == ctx.bot_id {
                    return ctx.reply("⚠️ The bot is already owner by default.").await;
                }

                let added = ctx
                    .stores
                    .access
                    .update(|a| {
                        if a.contains(&target) {
                            false
                        } else {
                            a.authorized_ids.push(target.clone());
                            true
                        }
                    })
                    .await?;
                if !added {
                    return ctx.reply("⚠️ That user is already on the authorized list.").await;
                }
                ctx.reply("✅ User added to the authorized list.").await
            }
            Some("remove") => {
                let Some(target) = ctx.quoted_target() else {
                    return ctx
                        .reply("❌ Reply to the message of the person you want to remove.")
                        .await;
                };

                let removed = ctx
                    .stores
                    .access
                    .update(|a| {
                        let before = a.authorized_ids.len();
                        a.authorized_ids.retain(|id| id != &target);
                        a.authorized_ids.len() != before
                    })
                    .await?;
                if !removed {
                    return ctx.reply("❌ That user is not on the authorized list.").await;
                }
                ctx.reply("✅ User removed from the authorized list.").await
            }
            Some("clear") => {
                ctx.stores.access.update(|a| a.authorized_ids.clear()).await?;
                ctx.reply("✅ All authorized ids were removed.").await
            }
            Some(_) => {
                ctx.reply(format!(
                    "❌ Unknown subcommand. Type {}access to see the options.",
                    ctx.prefix
                ))
                .await
            }
        }
    }
}
