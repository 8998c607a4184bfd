//! Developer info.

use async_trait::async_trait;

use super::{Command, CommandContext};

pub struct Dev;

#[async_trait]
impl Command for Dev {
    fn name(&self) -> &str {
        "dev"
    }

    fn description(&self) -> &str {
        "Show developer information"
    }

    async fn execute(&self, ctx: &CommandContext) -> anyhow::Result<()> {
        let theme = ctx.themes.current();
        let global = &theme.strings.global;

        let text = format!(
            "👨‍💻 *{} - DEVELOPER*\n\n\
             ┌─ *Bot*\n\
             │ {} Name: {}\n\
             │ 📞 Number: +{}\n\
             │ ✨ Prefix: {}\n\
             ╰─────────────\n\n\
             _{}_",
            global.bot_name, global.emojii, global.bot_name, ctx.bot_id, ctx.prefix, global.footer,
        );
        ctx.reply(text).await
    }
}
