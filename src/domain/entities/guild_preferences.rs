/// Per-guild bot settings. One record per guild the bot is a member of.
///
/// `guild_key` is fixed at construction; the default channel is the only
/// field that changes over a record's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildPreferences {
    guild_key: String,
    default_channel_id: String,
}

impl GuildPreferences {
    pub fn new(guild_key: impl Into<String>, default_channel_id: impl Into<String>) -> Self {
        Self {
            guild_key: guild_key.into(),
            default_channel_id: default_channel_id.into(),
        }
    }

    pub fn guild_key(&self) -> &str {
        &self.guild_key
    }

    /// The channel that receives messages not provoked by a command.
    pub fn default_channel_id(&self) -> &str {
        &self.default_channel_id
    }

    pub fn set_default_channel_id(&mut self, channel_id: impl Into<String>) {
        self.default_channel_id = channel_id.into();
    }
}
