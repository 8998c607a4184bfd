//! Private mode management.
//!
//! With private mode on, only owner-equivalent senders and the allow-list
//! can use the bot; everyone else is dropped without a reply.

use async_trait::async_trait;

use super::{Command, CommandContext};
use crate::store::PrivateMode;

fn render_status(config: &PrivateMode, prefix: &str) -> String {
    let mut text = format!(
        "🔒 *Private mode*\n\nState: {}\n\n",
        if config.enabled { "✅ Enabled" } else { "❌ Disabled" }
    );

    if config.allowed.is_empty() {
        text.push_str("👥 No extra allowed ids");
    } else {
        text.push_str("👥 *Allowed ids:*\n");
        for (i, id) in config.allowed.iter().enumerate() {
            text.push_str(&format!("{}. {id}\n", i + 1));
        }
    }

    text.push_str(&format!(
        "\n\n*Commands:*\n\
         ▸ {prefix}private on - Enable\n\
         ▸ {prefix}private off - Disable\n\
         ▸ *Reply to a message* with {prefix}private add\n\
         ▸ *Reply to a message* with {prefix}private remove\n\
         ▸ {prefix}private list - Show allowed ids\n\
         ▸ {prefix}private clear - Remove all ids"
    ));
    text
}

pub struct Private;

#[async_trait]
impl Command for Private {
    fn name(&self) -> &str {
        "private"
    }

    fn description(&self) -> &str {
        "Manage the bot's private mode"
    }

    fn owner_only(&self) -> bool {
        true
    }

    async fn execute(&self, ctx: &CommandContext) -> anyhow::Result<()> {
        let sub = ctx.args.first().map(|a| a.to_lowercase());

        match sub.as_deref() {
            None | Some("status") => {
                let config = ctx.stores.private.load().await;
                ctx.reply(render_status(&config, &ctx.prefix)).await
            }
            Some("on") => {
                ctx.stores.private.update(|c| c.enabled = true).await?;
                ctx.reply("✅ Private mode enabled. Only the owner and allowed ids can use the bot.")
                    .await
            }
            Some("off") => {
                ctx.stores.private.update(|c| c.enabled = false).await?;
                ctx.reply("✅ Private mode disabled. Everyone can use the bot.")
                    .await
            }
            Some("add") => {
                let Some(target) = ctx.quoted_target() else {
                    return ctx
                        .reply("❌ Reply to the message of the person you want to allow.")
                        .await;
                };
                if target == ctx.bot_id {
                    return ctx.reply("⚠️ The bot is already owner by default.").await;
                }

                let added = ctx
                    .stores
                    .private
                    .update(|c| {
                        if c.allows(&target) {
                            false
                        } else {
                            c.allowed.push(target.clone());
                            true
                        }
                    })
                    .await?;
                if !added {
                    return ctx.reply(format!("⚠️ Id {target} is already on the list.")).await;
                }
                ctx.reply(format!("✅ Id {target} added to the allow-list.")).await
            }
            Some("remove") => {
                let Some(target) = ctx.quoted_target() else {
                    return ctx
                        .reply("❌ Reply to the message of the person you want to remove.")
                        .await;
                };

                let removed = ctx
                    .stores
                    .private
                    .update(|c| {
                        let before = c.allowed.len();
                        c.allowed.retain(|a| a != &target);
                        c.allowed.len() != before
                    })
                    .await?;
                if !removed {
                    return ctx.reply(format!("❌ Id {target} is not on the list.")).await;
                }
                ctx.reply(format!("✅ Id {target} removed from the list.")).await
            }
            Some("list") => {
                let config = ctx.stores.private.load().await;
                if config.allowed.is_empty() {
                    return ctx.reply("👥 No extra allowed ids.").await;
                }
                let mut text = String::from("👥 *Allowed ids:*\n\n");
                for (i, id) in config.allowed.iter().enumerate() {
                    text.push_str(&format!("{}. {id}\n", i + 1));
                }
                ctx.reply(text).await
            }
            Some("clear") => {
                ctx.stores.private.update(|c| c.allowed.clear()).await?;
                ctx.reply("✅ All allowed ids were removed.").await
            }
            Some(_) => {
                ctx.reply(format!(
                    "❌ Unknown subcommand. Type {}private to see the options.",
                    ctx.prefix
                ))
                .await
            }
        }
    }
}
