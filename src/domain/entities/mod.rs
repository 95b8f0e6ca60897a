pub mod guild_preferences;
