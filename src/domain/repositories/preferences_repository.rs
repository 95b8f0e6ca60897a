use thiserror::Error;

/// The full-table rewrite could not complete. The in-memory table keeps the
/// attempted change; the durable copy may be stale until a later mutation
/// succeeds. Callers decide whether to surface this and invite a retry.
#[derive(Debug, Error)]
#[error("unable to save guild preferences: {0}")]
pub struct PersistError(#[from] std::io::Error);

/// Failure modes of [`PreferencesRepository::set_default_channel`].
#[derive(Debug, Error)]
pub enum ChannelUpdateError {
    /// No record for the guild. Nothing was mutated; the caller's recovery
    /// path is `register_guild`.
    #[error("no preferences recorded for guild {0}")]
    NotFound(String),
    #[error(transparent)]
    PersistFailed(#[from] PersistError),
}

/// Lookup miss. Recoverable by registering the guild with a fallback channel.
#[derive(Debug, Error)]
#[error("no preferences recorded for guild {0}")]
pub struct GuildNotFound(pub String);

/// Source of truth for guild preferences. Implementations guarantee that a
/// successful mutating call is visible to every subsequent read, and that
/// the durable copy equals the in-memory table after every success.
pub trait PreferencesRepository: Send + Sync {
    /// Inserts or unconditionally overwrites the record for `guild_key`,
    /// then persists the whole table. Safe to call for an existing guild;
    /// this is the idempotent create-or-repair entry point.
    fn register_guild(
        &self,
        guild_key: &str,
        default_channel_id: &str,
    ) -> Result<(), PersistError>;

    /// Changes the default channel of an already registered guild and
    /// persists the table. Returns [`ChannelUpdateError::NotFound`] without
    /// mutating anything when the guild has no record.
    fn set_default_channel(
        &self,
        guild_key: &str,
        channel_id: &str,
    ) -> Result<(), ChannelUpdateError>;

    /// Pure lookup, no side effects.
    fn get_default_channel(&self, guild_key: &str) -> Result<String, GuildNotFound>;

    /// Pure existence check, never fails.
    fn has_guild(&self, guild_key: &str) -> bool;
}
