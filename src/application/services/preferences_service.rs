use crate::domain::repositories::PreferencesRepository;
use crate::domain::repositories::preferences_repository::{
    ChannelUpdateError, GuildNotFound, PersistError,
};
use std::sync::Arc;

/// Policy layer over the preference store. The store never auto-creates
/// entries, so consumers that just need "the channel for this guild" would
/// each repeat the lookup, register-on-miss, retry dance; this service owns
/// that fallback contract.
#[derive(Clone)]
pub struct PreferencesService {
    preferences: Arc<dyn PreferencesRepository>,
}

impl PreferencesService {
    pub fn new(preferences: Arc<dyn PreferencesRepository>) -> Self {
        Self { preferences }
    }

    /// Looks up the guild's default channel. On a miss, registers the guild
    /// with `fallback_channel_id` and returns it; a later call with a
    /// different fallback keeps the stored value. Not atomic across the two
    /// store calls, but registration is an upsert, so a racing duplicate
    /// registration is harmless and repeated calls converge.
    pub async fn resolve_channel(
        &self,
        guild_key: &str,
        fallback_channel_id: &str,
    ) -> Result<String, PersistError> {
        match self.preferences.get_default_channel(guild_key) {
            Ok(channel_id) => Ok(channel_id),
            Err(GuildNotFound(_)) => {
                self.preferences
                    .register_guild(guild_key, fallback_channel_id)?;
                Ok(fallback_channel_id.to_owned())
            }
        }
    }

    pub async fn register_guild(
        &self,
        guild_key: &str,
        default_channel_id: &str,
    ) -> Result<(), PersistError> {
        self.preferences.register_guild(guild_key, default_channel_id)
    }

    pub async fn set_default_channel(
        &self,
        guild_key: &str,
        channel_id: &str,
    ) -> Result<(), ChannelUpdateError> {
        self.preferences.set_default_channel(guild_key, channel_id)
    }

    pub async fn get_default_channel(&self, guild_key: &str) -> Result<String, GuildNotFound> {
        self.preferences.get_default_channel(guild_key)
    }

    pub async fn has_guild(&self, guild_key: &str) -> bool {
        self.preferences.has_guild(guild_key)
    }

    pub async fn validate_guild_context(&self, guild_id: Option<u64>) -> Result<u64, String> {
        guild_id.ok_or_else(|| "This command can only be used in a server".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::repositories::memory_preferences_repository::MemoryPreferencesRepository;
    use crate::infrastructure::repositories::text_preferences_repository::TextPreferencesRepository;

    fn service() -> PreferencesService {
        PreferencesService::new(Arc::new(MemoryPreferencesRepository::new()))
    }

    #[tokio::test]
    async fn resolve_channel_registers_on_first_miss() {
        let service = service();

        let channel = service.resolve_channel("guildA", "chanX").await.unwrap();
        assert_eq!(channel, "chanX");
        assert!(service.has_guild("guildA").await);
    }

    #[tokio::test]
    async fn resolve_channel_keeps_the_existing_value() {
        let service = service();

        service.resolve_channel("guildA", "chanX").await.unwrap();
        let channel = service.resolve_channel("guildA", "chanZ").await.unwrap();
        assert_eq!(channel, "chanX");
    }

    #[tokio::test]
    async fn guild_only_commands_reject_a_missing_guild_id() {
        let service = service();

        assert!(service.validate_guild_context(None).await.is_err());
        assert_eq!(service.validate_guild_context(Some(42)).await, Ok(42));
    }

    #[tokio::test]
    async fn preferences_survive_a_restart() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("preferences.txt");

        let service = PreferencesService::new(Arc::new(TextPreferencesRepository::new(&path)));
        service.register_guild("g1", "100").await.unwrap();
        service.set_default_channel("g1", "200").await.unwrap();
        assert_eq!(service.get_default_channel("g1").await.unwrap(), "200");

        let restarted = TextPreferencesRepository::new(&path);
        assert!(restarted.load());
        let service = PreferencesService::new(Arc::new(restarted));
        assert_eq!(service.get_default_channel("g1").await.unwrap(), "200");
    }
}
