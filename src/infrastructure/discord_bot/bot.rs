use crate::application::commands::{
    register_help_command, register_ping_command, register_set_default_channel_command,
    run_help_command, run_ping_command, run_set_default_channel,
};
use crate::application::services::notification_service::NotificationService;
use crate::application::services::preferences_service::PreferencesService;
use crate::infrastructure::repositories::text_preferences_repository::TextPreferencesRepository;

use anyhow::Context as _;
use serenity::model::{
    application::Interaction,
    gateway::{ActivityType, Presence, Ready},
    guild::Guild,
    id::GuildId,
};
use serenity::prelude::*;
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct StreamBotHandler {
    pub preferences: PreferencesService,
    pub notifications: NotificationService,
}

impl StreamBotHandler {
    async fn register_guild_commands(&self, ctx: &Context, guild_id: GuildId) {
        let _ = guild_id
            .create_command(&ctx.http, register_help_command())
            .await;
        let _ = guild_id
            .create_command(&ctx.http, register_ping_command())
            .await;
        let _ = guild_id
            .create_command(&ctx.http, register_set_default_channel_command())
            .await;
    }
}

#[serenity::async_trait]
impl EventHandler for StreamBotHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("Bot ready as {}", ready.user.name);

        // register commands in each guild
        for guild_status in ready.guilds {
            self.register_guild_commands(&ctx, guild_status.id).await;
            info!("Commands registered for guild {}", guild_status.id.get());
        }
    }

    async fn guild_create(&self, ctx: Context, guild: Guild, is_new: Option<bool>) {
        // guild_create also fires for every guild on startup; only fresh
        // joins get the onboarding treatment
        if is_new != Some(true) {
            return;
        }

        info!("Joined guild {} ({})", guild.name, guild.id.get());
        self.register_guild_commands(&ctx, guild.id).await;

        // seed the new guild's entry with its system channel, when it has
        // one; a guild rejoining with an entry on file keeps its choice
        let guild_key = guild.id.get().to_string();
        if let Some(system_channel) = guild.system_channel_id {
            if !self.preferences.has_guild(&guild_key).await {
                let registered = self
                    .preferences
                    .register_guild(&guild_key, &system_channel.get().to_string())
                    .await;

                if let Err(err) = registered {
                    error!("Failed to save preferences for guild {}: {}", guild_key, err);
                    if let Err(err) = self
                        .notifications
                        .send_save_failure_notice(&ctx, guild.id)
                        .await
                    {
                        warn!("{}", err);
                    }
                }
            }
        }

        if let Err(err) = self.notifications.send_introduction(&ctx, guild.id).await {
            warn!("{}", err);
        }
    }

    async fn presence_update(&self, ctx: Context, new_data: Presence) {
        let Some(guild_id) = new_data.guild_id else {
            return;
        };

        let Some(stream) = new_data
            .activities
            .iter()
            .find(|activity| activity.kind == ActivityType::Streaming)
        else {
            return;
        };

        // presences carry a partial user; fall back to the cache for the name
        let user_name = new_data
            .user
            .name
            .clone()
            .or_else(|| ctx.cache.user(new_data.user.id).map(|user| user.name.clone()))
            .unwrap_or_else(|| "A member".to_string());

        let stream_url = stream.url.as_ref().map(|url| url.as_str().to_owned());

        if let Err(err) = self
            .notifications
            .announce_stream(
                &ctx,
                guild_id,
                &user_name,
                &stream.name,
                stream_url.as_deref(),
            )
            .await
        {
            warn!("{}", err);
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        // handle slash commands
        if let Some(command) = interaction.command() {
            info!("Received command interaction: {}", command.data.name);
            match command.data.name.as_str() {
                "help" => run_help_command(&ctx, &command).await,
                "ping" => run_ping_command(&ctx, &command).await,
                "set_default_channel" => {
                    run_set_default_channel(&ctx, &command, &self.preferences).await
                }
                _ => warn!("Command not recognized: {}", command.data.name),
            }
        }
    }
}

pub async fn run_bot() -> anyhow::Result<()> {
    let token = std::env::var("DISCORD_TOKEN").context("DISCORD_TOKEN must be set")?;
    let preferences_file =
        std::env::var("PREFERENCES_FILE").unwrap_or_else(|_| "data/preferences.txt".to_string());

    let repository = TextPreferencesRepository::new(&preferences_file);
    if !repository.load() {
        info!(
            "No preferences file at {}, starting with an empty table",
            preferences_file
        );
    }

    let preferences = PreferencesService::new(Arc::new(repository));
    let notifications = NotificationService::new(preferences.clone());

    let handler = StreamBotHandler {
        preferences,
        notifications,
    };

    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_PRESENCES;

    let mut client = Client::builder(&token, intents)
        .event_handler(handler)
        .await
        .context("failed to build Discord client")?;

    client.start().await.context("client error")?;
    Ok(())
}
