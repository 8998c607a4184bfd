//! Theme inspection and switching.

use async_trait::async_trait;

use super::{Command, CommandContext};

pub struct ThemeCommand;

#[async_trait]
impl Command for ThemeCommand {
    fn name(&self) -> &str {
        "theme"
    }

    fn description(&self) -> &str {
        "Show or change the bot theme"
    }

    async fn execute(&self, ctx: &CommandContext) -> anyhow::Result<()> {
        let action = ctx.args.first().map(|a| a.to_lowercase());

        match action.as_deref() {
            None | Some("current") => {
                let theme = ctx.themes.current();
                let global = &theme.strings.global;
                ctx.reply(format!(
                    "🎨 *Current theme: {}*\n\n\
                     {} *Bot name:* {}\n\
                     👋 *Greeting:* {}\n\n\
                     _Type {}theme list to see the available themes._",
                    ctx.themes.current_name(),
                    global.emojii,
                    global.bot_name,
                    global.greet,
                    ctx.prefix,
                ))
                .await
            }
            Some("list") => {
                let current = ctx.themes.current_name();
                let mut text = String::from("🎨 *Available themes*\n\n");
                let themes = ctx.themes.list();
                if themes.is_empty() {
                    text.push_str("No themes installed.");
                } else {
                    for name in themes {
                        if name == current {
                            text.push_str(&format!("▸ *{name}* (active)\n"));
                        } else {
                            text.push_str(&format!("▸ {name}\n"));
                        }
                    }
                }
                text.push_str(&format!("\n_Switch with {}theme <name>_", ctx.prefix));
                ctx.reply(text).await
            }
            Some(name) => {
                // Switching is an owner action; looking is not.
                if !ctx.perms.can_use_owner_commands() {
                    return ctx.reply("❌ Only the owner can change the theme.").await;
                }
                if ctx.themes.switch(name).await {
                    ctx.reply(format!("✅ Theme switched to *{}*.", name.to_uppercase()))
                        .await
                } else {
                    ctx.reply(format!(
                        "❌ Unknown theme. Type {}theme list to see the available themes.",
                        ctx.prefix
                    ))
                    .await
                }
            }
        }
    }
}
