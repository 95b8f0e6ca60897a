use crate::application::services::preferences_service::PreferencesService;
use serenity::builder::CreateMessage;
use serenity::model::id::{ChannelId, GuildId};
use serenity::prelude::Context;

/// Composes and delivers the messages StreamBot sends on its own initiative.
/// Everything goes through the guild's default channel, registering the
/// guild on the fly when it has no stored entry yet.
#[derive(Clone)]
pub struct NotificationService {
    preferences: PreferencesService,
}

impl NotificationService {
    pub fn new(preferences: PreferencesService) -> Self {
        Self { preferences }
    }

    /// Announces that a member has gone live.
    pub async fn announce_stream(
        &self,
        ctx: &Context,
        guild_id: GuildId,
        user_name: &str,
        activity_name: &str,
        stream_url: Option<&str>,
    ) -> Result<(), String> {
        let mut content = format!(
            "@everyone, {} has started streaming {}.",
            user_name, activity_name
        );
        if let Some(url) = stream_url {
            content.push('\n');
            content.push_str(url);
        }

        self.send_to_default_channel(ctx, guild_id, content).await
    }

    /// Onboarding message sent right after StreamBot joins a guild.
    pub async fn send_introduction(&self, ctx: &Context, guild_id: GuildId) -> Result<(), String> {
        let content = "Thank you for adding StreamBot to your server. \
            When a member has linked their streaming service, such as Twitch or \
            YouTube, with Discord, StreamBot announces it here whenever that \
            member goes live. Use `/set_default_channel` to choose where \
            announcements are sent, and `/help` for the full command list."
            .to_string();

        self.send_to_default_channel(ctx, guild_id, content).await
    }

    /// Tells the guild that a preference change could not be saved and
    /// invites a retry of the originating command.
    pub async fn send_save_failure_notice(
        &self,
        ctx: &Context,
        guild_id: GuildId,
    ) -> Result<(), String> {
        let content = "An error occurred while saving this server's preferences. \
            Run the command again to retry; if it keeps failing, remove \
            StreamBot from the server and add it back."
            .to_string();

        self.send_to_default_channel(ctx, guild_id, content).await
    }

    /// Resolves the guild's default channel and sends `content` there. For
    /// guilds with no stored entry the system channel doubles as the
    /// registration fallback, so the store heals itself on the first send.
    async fn send_to_default_channel(
        &self,
        ctx: &Context,
        guild_id: GuildId,
        content: String,
    ) -> Result<(), String> {
        let guild_key = guild_id.get().to_string();

        let system_channel = ctx
            .cache
            .guild(guild_id)
            .and_then(|guild| guild.system_channel_id);

        let channel_id = match system_channel {
            Some(fallback) => self
                .preferences
                .resolve_channel(&guild_key, &fallback.get().to_string())
                .await
                .map_err(|err| format!("Failed to register guild {}: {}", guild_key, err))?,
            None => self
                .preferences
                .get_default_channel(&guild_key)
                .await
                .map_err(|err| format!("No channel known for guild {}: {}", guild_key, err))?,
        };

        // ChannelId::new rejects zero, so filter it out along with non-numbers.
        let channel_id = match channel_id.parse::<u64>() {
            Ok(id) if id != 0 => id,
            _ => {
                return Err(format!(
                    "Stored channel id `{}` for guild {} is not a valid id",
                    channel_id, guild_key
                ));
            }
        };

        ChannelId::new(channel_id)
            .send_message(&ctx.http, CreateMessage::new().content(content))
            .await
            .map_err(|err| format!("Failed to send message to guild {}: {}", guild_key, err))?;

        Ok(())
    }
}
