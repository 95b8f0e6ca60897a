use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use tracing::warn;

use crate::domain::entities::guild_preferences::GuildPreferences;
use crate::domain::repositories::preferences_repository::{
    ChannelUpdateError, GuildNotFound, PersistError, PreferencesRepository,
};

/// Field separator in the preferences file. Identifiers must not contain it;
/// gateway snowflake ids are numeric, so this holds without runtime checks.
const DELIMITER: char = ':';

/// File-backed preference store. One record per line, `guild:channel`.
///
/// Every mutation rewrites the whole file while the write lock is held, so
/// the table and the file cannot diverge between a successful call and the
/// next read. Guild counts are small; the O(n) rewrite is not a concern.
pub struct TextPreferencesRepository {
    file_path: PathBuf,
    data: RwLock<HashMap<String, GuildPreferences>>,
}

impl TextPreferencesRepository {
    /// Creates the store with an empty table. The disk is not touched until
    /// [`load`](Self::load) or the first mutation.
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Reads the preferences file and repopulates the table. Call once at
    /// startup, before the store is shared with the event handlers.
    ///
    /// Returns `false` when the file is missing or unreadable; that leaves
    /// an empty, fully usable table (a fresh install has no file yet).
    /// Lines without a delimiter are skipped, everything parseable is kept.
    pub fn load(&self) -> bool {
        let content = match fs::read_to_string(&self.file_path) {
            Ok(content) => content,
            Err(err) => {
                warn!(
                    "Could not open preferences file {}: {}",
                    self.file_path.display(),
                    err
                );
                return false;
            }
        };

        let mut data = self.data.write().unwrap_or_else(|e| e.into_inner());
        data.clear();
        for line in content.lines() {
            if line.is_empty() {
                continue;
            }
            match line.split_once(DELIMITER) {
                Some((guild_key, channel_id)) => {
                    data.insert(
                        guild_key.to_owned(),
                        GuildPreferences::new(guild_key, channel_id),
                    );
                }
                None => warn!("Skipping malformed preferences line: {}", line),
            }
        }
        true
    }

    /// Full-snapshot rewrite of the preferences file. Runs with the write
    /// lock held by the caller.
    fn save(&self, data: &HashMap<String, GuildPreferences>) -> Result<(), PersistError> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut contents = String::new();
        for prefs in data.values() {
            contents.push_str(prefs.guild_key());
            contents.push(DELIMITER);
            contents.push_str(prefs.default_channel_id());
            contents.push('\n');
        }

        fs::write(&self.file_path, contents)?;
        Ok(())
    }
}

impl PreferencesRepository for TextPreferencesRepository {
    fn register_guild(
        &self,
        guild_key: &str,
        default_channel_id: &str,
    ) -> Result<(), PersistError> {
        let mut data = self.data.write().unwrap_or_else(|e| e.into_inner());
        data.insert(
            guild_key.to_owned(),
            GuildPreferences::new(guild_key, default_channel_id),
        );
        self.save(&data)
    }

    fn set_default_channel(
        &self,
        guild_key: &str,
        channel_id: &str,
    ) -> Result<(), ChannelUpdateError> {
        let mut data = self.data.write().unwrap_or_else(|e| e.into_inner());
        match data.get_mut(guild_key) {
            Some(prefs) => prefs.set_default_channel_id(channel_id),
            None => return Err(ChannelUpdateError::NotFound(guild_key.to_owned())),
        }
        self.save(&data)?;
        Ok(())
    }

    fn get_default_channel(&self, guild_key: &str) -> Result<String, GuildNotFound> {
        let data = self.data.read().unwrap_or_else(|e| e.into_inner());
        data.get(guild_key)
            .map(|prefs| prefs.default_channel_id().to_owned())
            .ok_or_else(|| GuildNotFound(guild_key.to_owned()))
    }

    fn has_guild(&self, guild_key: &str) -> bool {
        let data = self.data.read().unwrap_or_else(|e| e.into_inner());
        data.contains_key(guild_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn repo_at(dir: &TempDir) -> TextPreferencesRepository {
        TextPreferencesRepository::new(dir.path().join("preferences.txt"))
    }

    #[test]
    fn load_without_file_starts_empty_and_usable() {
        let dir = TempDir::new().unwrap();
        let repo = repo_at(&dir);

        assert!(!repo.load());
        assert!(!repo.has_guild("guildA"));

        repo.register_guild("guildA", "100").unwrap();
        assert_eq!(repo.get_default_channel("guildA").unwrap(), "100");
    }

    #[test]
    fn register_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let repo = repo_at(&dir);

        repo.register_guild("guildA", "100").unwrap();
        repo.register_guild("guildA", "100").unwrap();

        assert_eq!(repo.get_default_channel("guildA").unwrap(), "100");
        let on_disk = fs::read_to_string(dir.path().join("preferences.txt")).unwrap();
        assert_eq!(on_disk, "guildA:100\n");
    }

    #[test]
    fn register_overwrites_an_existing_record() {
        let dir = TempDir::new().unwrap();
        let repo = repo_at(&dir);

        repo.register_guild("guildA", "100").unwrap();
        repo.register_guild("guildA", "300").unwrap();

        assert_eq!(repo.get_default_channel("guildA").unwrap(), "300");
    }

    #[test]
    fn update_requires_an_existing_guild() {
        let dir = TempDir::new().unwrap();
        let repo = repo_at(&dir);

        let err = repo
            .set_default_channel("unknownGuild", "chanY")
            .unwrap_err();
        assert!(matches!(err, ChannelUpdateError::NotFound(_)));
        assert!(!repo.has_guild("unknownGuild"));
    }

    #[test]
    fn table_survives_restart() {
        let dir = TempDir::new().unwrap();

        let repo = repo_at(&dir);
        repo.register_guild("g1", "100").unwrap();
        repo.register_guild("g2", "300").unwrap();
        repo.set_default_channel("g1", "200").unwrap();
        assert_eq!(repo.get_default_channel("g1").unwrap(), "200");

        let restarted = repo_at(&dir);
        assert!(restarted.load());
        assert_eq!(restarted.get_default_channel("g1").unwrap(), "200");
        assert_eq!(restarted.get_default_channel("g2").unwrap(), "300");
        assert!(!restarted.has_guild("g3"));
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.txt");
        fs::write(&path, "g1:100\nnot a record\ng2:200\n").unwrap();

        let repo = TextPreferencesRepository::new(&path);
        assert!(repo.load());
        assert_eq!(repo.get_default_channel("g1").unwrap(), "100");
        assert_eq!(repo.get_default_channel("g2").unwrap(), "200");
        assert!(!repo.has_guild("not a record"));
    }

    #[test]
    fn persist_failure_keeps_the_in_memory_change() {
        // A plain file where the parent directory should be makes every
        // save fail.
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let repo = TextPreferencesRepository::new(blocker.join("preferences.txt"));
        assert!(repo.register_guild("g1", "100").is_err());
        // The table already holds the change, so a caller can retry later.
        assert!(repo.has_guild("g1"));
    }
}
