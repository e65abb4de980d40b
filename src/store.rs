use anyhow::{Context, Result};
use std::collections::BTreeMap;
#[cfg(test)]
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Persisted session entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKey {
    WorkingDir,
    WorkingTags,
}

impl SessionKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKey::WorkingDir => "workingDir",
            SessionKey::WorkingTags => "workingTags",
        }
    }
}

/// What a previous run left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub working_dir: Option<PathBuf>,
    pub working_tags: Vec<String>,
}

impl SessionSnapshot {
    fn from_values(dir: Option<&str>, tags: Option<&str>) -> Self {
        let working_dir = dir.filter(|d| !d.is_empty()).map(PathBuf::from);
        let working_tags = match tags {
            Some(raw) => serde_json::from_str::<Vec<String>>(raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "ignoring unreadable working tags");
                Vec::new()
            }),
            None => Vec::new(),
        };
        Self {
            working_dir,
            working_tags,
        }
    }
}

/// Encode the working tag vocabulary the way it is stored.
pub fn encode_tags(tags: &[String]) -> String {
    serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string())
}

/// Key-value persistence for the working directory and tag vocabulary.
pub trait SessionStore {
    fn load(&self) -> Result<SessionSnapshot>;
    fn save(&mut self, key: SessionKey, value: &str) -> Result<()>;
}

/// Session entries kept as a JSON object of strings on disk.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the platform data directory.
    pub fn open_default() -> Self {
        Self::new(Self::default_path())
    }

    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "tagdeck", "tagdeck")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
            .join("session.json")
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        match serde_json::from_str(&data) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "session file is corrupt, starting fresh");
                Ok(BTreeMap::new())
            }
        }
    }
}

impl SessionStore for JsonFileStore {
    fn load(&self) -> Result<SessionSnapshot> {
        let entries = self.read_entries()?;
        Ok(SessionSnapshot::from_values(
            entries.get(SessionKey::WorkingDir.as_str()).map(String::as_str),
            entries.get(SessionKey::WorkingTags.as_str()).map(String::as_str),
        ))
    }

    fn save(&mut self, key: SessionKey, value: &str) -> Result<()> {
        let mut entries = self.read_entries()?;
        entries.insert(key.as_str().to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(&entries)?;
        fs::write(&self.path, data)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        tracing::debug!(key = key.as_str(), "session entry saved");
        Ok(())
    }
}

/// In-memory store.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<SessionKey, String>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn get(&self, key: SessionKey) -> Option<&str> {
        self.entries.get(&key).map(String::as_str)
    }
}

#[cfg(test)]
impl SessionStore for MemoryStore {
    fn load(&self) -> Result<SessionSnapshot> {
        Ok(SessionSnapshot::from_values(
            self.get(SessionKey::WorkingDir),
            self.get(SessionKey::WorkingTags),
        ))
    }

    fn save(&mut self, key: SessionKey, value: &str) -> Result<()> {
        self.entries.insert(key, value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trips_both_keys() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("session.json");
        let mut store = JsonFileStore::new(&path);

        assert_eq!(store.load()?, SessionSnapshot::default());

        store.save(SessionKey::WorkingDir, "/pics/holiday")?;
        store.save(
            SessionKey::WorkingTags,
            &encode_tags(&["Red".to_string(), "to sort".to_string()]),
        )?;

        let reopened = JsonFileStore::new(&path).load()?;
        assert_eq!(reopened.working_dir, Some(PathBuf::from("/pics/holiday")));
        assert_eq!(reopened.working_tags, vec!["Red", "to sort"]);

        let raw = fs::read_to_string(&path)?;
        assert!(raw.contains("\"workingDir\""));
        assert!(raw.contains("\"workingTags\""));
        Ok(())
    }

    #[test]
    fn corrupt_entries_fall_back_to_empty() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("session.json");

        fs::write(&path, "{ not json")?;
        assert_eq!(JsonFileStore::new(&path).load()?, SessionSnapshot::default());

        fs::write(&path, r#"{"workingDir":"/x","workingTags":"oops"}"#)?;
        let snapshot = JsonFileStore::new(&path).load()?;
        assert_eq!(snapshot.working_dir, Some(PathBuf::from("/x")));
        assert!(snapshot.working_tags.is_empty());
        Ok(())
    }

    #[test]
    fn memory_store_keeps_values() -> Result<()> {
        let mut store = MemoryStore::default();
        store.save(SessionKey::WorkingTags, r#"["a","b"]"#)?;
        assert_eq!(store.get(SessionKey::WorkingTags), Some(r#"["a","b"]"#));
        assert_eq!(store.load()?.working_tags, vec!["a", "b"]);
        assert_eq!(store.load()?.working_dir, None);
        Ok(())
    }
}
