use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::SolvemarkError;

/// Injectable key-value store for user preferences. Synchronous, like the
/// browser storage it stands in for.
pub trait PrefStore {
    fn get(&mut self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), SolvemarkError>;
}

pub struct FilePrefStore {
    prefs: HashMap<String, String>,
    prefs_file: PathBuf,
    loaded: bool,
}

impl FilePrefStore {
    pub fn new(prefs_file: PathBuf) -> Self {
        Self {
            prefs: HashMap::new(),
            prefs_file,
            loaded: false,
        }
    }

    fn load(&mut self) {
        if self.loaded {
            return;
        }
        if let Ok(data) = std::fs::read_to_string(&self.prefs_file) {
            if let Ok(parsed) = serde_json::from_str(&data) {
                self.prefs = parsed;
            }
        }
        self.loaded = true;
    }

    fn save(&self) -> Result<(), SolvemarkError> {
        if let Some(dir) = self.prefs_file.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(&self.prefs)?;
        std::fs::write(&self.prefs_file, json)?;
        Ok(())
    }
}

impl PrefStore for FilePrefStore {
    fn get(&mut self, key: &str) -> Option<String> {
        self.load();
        self.prefs.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SolvemarkError> {
        self.load();
        self.prefs.insert(key.to_string(), value.to_string());
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FilePrefStore::new(dir.path().join("prefs.json"));
        assert_eq!(store.get("darkMode"), None);
    }

    #[test]
    fn test_set_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FilePrefStore::new(dir.path().join("prefs.json"));
        store.set("darkMode", "enabled").unwrap();
        assert_eq!(store.get("darkMode").as_deref(), Some("enabled"));
    }

    #[test]
    fn test_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let mut store = FilePrefStore::new(path.clone());
        store.set("darkMode", "disabled").unwrap();

        let mut reopened = FilePrefStore::new(path);
        assert_eq!(reopened.get("darkMode").as_deref(), Some("disabled"));
    }

    #[test]
    fn test_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("prefs.json");
        let mut store = FilePrefStore::new(path);
        assert!(store.set("key", "value").is_ok());
    }

    #[test]
    fn test_corrupt_file_treated_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "not json{").unwrap();

        let mut store = FilePrefStore::new(path);
        assert_eq!(store.get("darkMode"), None);
    }
}
