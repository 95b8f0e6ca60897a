use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::domain::entities::guild_preferences::GuildPreferences;
use crate::domain::repositories::preferences_repository::{
    ChannelUpdateError, GuildNotFound, PersistError, PreferencesRepository,
};

/// In-memory implementation of PreferencesRepository.
/// Useful for testing or simple setups without a backing file.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MemoryPreferencesRepository {
    guild_preferences: Arc<RwLock<HashMap<String, GuildPreferences>>>,
}

#[allow(dead_code)]
impl MemoryPreferencesRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferencesRepository for MemoryPreferencesRepository {
    fn register_guild(
        &self,
        guild_key: &str,
        default_channel_id: &str,
    ) -> Result<(), PersistError> {
        let mut map = self.guild_preferences.write().unwrap_or_else(|e| e.into_inner());
        map.insert(
            guild_key.to_owned(),
            GuildPreferences::new(guild_key, default_channel_id),
        );
        Ok(())
    }

    fn set_default_channel(
        &self,
        guild_key: &str,
        channel_id: &str,
    ) -> Result<(), ChannelUpdateError> {
        let mut map = self.guild_preferences.write().unwrap_or_else(|e| e.into_inner());
        match map.get_mut(guild_key) {
            Some(prefs) => {
                prefs.set_default_channel_id(channel_id);
                Ok(())
            }
            None => Err(ChannelUpdateError::NotFound(guild_key.to_owned())),
        }
    }

    fn get_default_channel(&self, guild_key: &str) -> Result<String, GuildNotFound> {
        let map = self.guild_preferences.read().unwrap_or_else(|e| e.into_inner());
        map.get(guild_key)
            .map(|prefs| prefs.default_channel_id().to_owned())
            .ok_or_else(|| GuildNotFound(guild_key.to_owned()))
    }

    fn has_guild(&self, guild_key: &str) -> bool {
        let map = self.guild_preferences.read().unwrap_or_else(|e| e.into_inner());
        map.contains_key(guild_key)
    }
}
