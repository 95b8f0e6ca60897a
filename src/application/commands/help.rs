use serenity::all::{
    CommandInteraction, CreateCommand, CreateInteractionResponse, CreateInteractionResponseMessage,
};
use serenity::prelude::*;
use tracing::error;

pub fn register_help_command() -> CreateCommand {
    CreateCommand::new("help").description("Show available commands")
}

pub async fn run_help_command(ctx: &Context, command: &CommandInteraction) {
    let content = "\
**Available Commands:**\n\
`/ping` - Check that StreamBot is responding\n\
`/set_default_channel` - Choose the channel for stream announcements (Manage Channels only)\n\
`/help` - Show this help message";

    let builder = CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::default()
            .content(content)
            .ephemeral(true),
    );

    if let Err(err) = command.create_response(&ctx.http, builder).await {
        error!("Error executing /help: {:?}", err);
    }
}
