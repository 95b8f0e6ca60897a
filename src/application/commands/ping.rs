use serenity::all::{
    CommandInteraction, CreateCommand, CreateInteractionResponse, CreateInteractionResponseMessage,
};
use serenity::prelude::*;
use tracing::error;

pub fn register_ping_command() -> CreateCommand {
    CreateCommand::new("ping").description("Check that StreamBot is responding")
}

pub async fn run_ping_command(ctx: &Context, command: &CommandInteraction) {
    let content = format!("Hello {}", command.user.mention());

    let builder = CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::default().content(content),
    );

    if let Err(err) = command.create_response(&ctx.http, builder).await {
        error!("Error executing /ping: {:?}", err);
    }
}
