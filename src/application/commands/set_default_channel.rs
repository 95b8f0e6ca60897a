use crate::application::services::preferences_service::PreferencesService;
use crate::domain::repositories::preferences_repository::ChannelUpdateError;
use serenity::{
    all::{CommandDataOptionValue, CommandInteraction, CreateInteractionResponse},
    builder::{CreateCommand, CreateInteractionResponseMessage, EditInteractionResponse},
    prelude::*,
};

/// Register the /set_default_channel command
pub fn register_set_default_channel_command() -> CreateCommand {
    CreateCommand::new("set_default_channel")
        .description("Choose the channel where stream announcements are sent (Manage Channels only)")
        .add_option(
            serenity::builder::CreateCommandOption::new(
                serenity::model::prelude::CommandOptionType::Channel,
                "channel",
                "Select the channel for announcements",
            )
            .required(true),
        )
}

/// Run the command to set the guild's default channel
pub async fn run_set_default_channel(
    ctx: &Context,
    command: &CommandInteraction,
    preferences: &PreferencesService,
) {
    // defer response immediately to avoid timeout
    if let Err(_e) = command
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Defer(
                CreateInteractionResponseMessage::new().ephemeral(true),
            ),
        )
        .await
    {
        return;
    }

    let has_permission = command.member.as_ref().map_or(false, |member| {
        member
            .permissions
            .map_or(false, |perms| perms.manage_channels())
    });

    if !has_permission {
        let _ = command
            .edit_response(
                &ctx.http,
                EditInteractionResponse::new()
                    .content("❌ You need the **Manage Channels** permission to use this command"),
            )
            .await;
        return;
    }

    let guild_id = match preferences
        .validate_guild_context(command.guild_id.map(|gid| gid.get()))
        .await
    {
        Ok(gid) => gid,
        Err(error) => {
            let _ = command
                .edit_response(
                    &ctx.http,
                    EditInteractionResponse::new().content(format!("❌ {}", error)),
                )
                .await;
            return;
        }
    };

    // Extract channel ID from command option
    let channel_id = match command
        .data
        .options
        .get(0)
        .and_then(|opt| match &opt.value {
            CommandDataOptionValue::Channel(channel_id) => Some(*channel_id),
            _ => None,
        }) {
        Some(c) => c,
        None => {
            let _ = command
                .edit_response(
                    &ctx.http,
                    EditInteractionResponse::new().content("❌ Select a valid channel"),
                )
                .await;
            return;
        }
    };

    let guild_key = guild_id.to_string();
    let channel_value = channel_id.get().to_string();

    // An update is only valid for guilds the store already knows about; on
    // NotFound the documented recovery is to create the entry instead.
    let result = match preferences
        .set_default_channel(&guild_key, &channel_value)
        .await
    {
        Err(ChannelUpdateError::NotFound(_)) => preferences
            .register_guild(&guild_key, &channel_value)
            .await
            .map_err(|err| err.to_string()),
        other => other.map_err(|err| err.to_string()),
    };

    match result {
        Ok(()) => {
            let _ = command
                .edit_response(
                    &ctx.http,
                    EditInteractionResponse::new().content(format!(
                        "✅ Stream announcements will now be sent in <#{}>",
                        channel_id
                    )),
                )
                .await;
        }
        Err(error) => {
            let _ = command
                .edit_response(
                    &ctx.http,
                    EditInteractionResponse::new().content(format!(
                        "❌ Failed to save the default channel: {}. Run the command again to retry",
                        error
                    )),
                )
                .await;
        }
    }
}
