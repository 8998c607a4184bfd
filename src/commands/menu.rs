//! Menu and help.

use async_trait::async_trait;
use chrono::Local;

use super::{Command, CommandContext};

/// Render the command menu from the registry and the active theme.
async fn render_menu(ctx: &CommandContext) -> anyhow::Result<()> {
    let theme = ctx.themes.current();
    let global = &theme.strings.global;

    let mut public = Vec::new();
    let mut owner = Vec::new();
    for command in ctx.registry.all() {
        if command.owner_only() {
            owner.push((command.name().to_string(), command.description().to_string()));
        } else {
            public.push((command.name().to_string(), command.description().to_string()));
        }
    }
    public.sort();
    owner.sort();

    let now = Local::now();
    let mut text = format!(
        "╭───❍ *{} {}*\n│\n\
         │ 👋 {}\n\
         │ 🎨 *Theme:* {}\n\
         │ ⏰ *Time:* {}\n\
         │ 📅 *Date:* {}\n\
         │ ✨ *Prefix:* {}\n\
         │\n",
        global.bot_name,
        global.emojii,
        global.greet,
        ctx.themes.current_name(),
        now.format("%H:%M"),
        now.format("%d/%m/%Y"),
        ctx.prefix,
    );

    text.push_str(&format!("│ 📖 *Commands ({})*\n", public.len()));
    for (name, description) in &public {
        text.push_str(&format!("│ ▸ {}{name} - {description}\n", ctx.prefix));
    }

    if !owner.is_empty() {
        text.push_str(&format!("│\n│ 🔐 *Owner commands ({})*\n", owner.len()));
        for (name, description) in &owner {
            text.push_str(&format!("│ ▸ {}{name} - {description}\n", ctx.prefix));
        }
    }

    text.push_str(&format!("│\n╰───❍ _{}_", global.footer));

    ctx.reply(text).await
}

pub struct Menu;

#[async_trait]
impl Command for Menu {
    fn name(&self) -> &str {
        "menu"
    }

    fn description(&self) -> &str {
        "Show the command menu"
    }

    async fn execute(&self, ctx: &CommandContext) -> anyhow::Result<()> {
        render_menu(ctx).await
    }
}

/// Alias for the menu.
pub struct Help;

#[async_trait]
impl Command for Help {
    fn name(&self) -> &str {
        "help"
    }

    fn description(&self) -> &str {
        "Alias for the menu command"
    }

    async fn execute(&self, ctx: &CommandContext) -> anyhow::Result<()> {
        render_menu(ctx).await
    }
}
