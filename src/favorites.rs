//! Persisted favorites: a map from record id to the full record.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::data::model::StartupRecord;
use crate::error::StoreError;

/// Saved startups keyed by record id.
pub type SavedMap = BTreeMap<String, StartupRecord>;

/// Where favorites live between sessions.
pub trait FavoritesRepository: Send {
    fn load(&self) -> Result<SavedMap, StoreError>;
    fn save(&self, saved: &SavedMap) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// JSON file store
// ---------------------------------------------------------------------------

/// Favorites stored as one JSON object on disk.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FavoritesRepository for JsonFileRepository {
    /// A missing file is an empty set of favorites.
    fn load(&self) -> Result<SavedMap, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(SavedMap::new()),
            Err(e) => return Err(e.into()),
        };
        if text.trim().is_empty() {
            return Ok(SavedMap::new());
        }
        Ok(serde_json::from_str(&text)?)
    }

    fn save(&self, saved: &SavedMap) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(saved)?;
        // write-then-rename so a crash mid-write keeps the previous file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;
        log::debug!("Saved {} favorites to {}", saved.len(), self.path.display());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Keeps favorites for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    saved: Mutex<SavedMap>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_saved(saved: SavedMap) -> Self {
        Self {
            saved: Mutex::new(saved),
        }
    }
}

impl FavoritesRepository for InMemoryRepository {
    fn load(&self) -> Result<SavedMap, StoreError> {
        let saved = self
            .saved
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("Lock error: {e}")))?;
        Ok(saved.clone())
    }

    fn save(&self, saved: &SavedMap) -> Result<(), StoreError> {
        let mut slot = self
            .saved
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("Lock error: {e}")))?;
        *slot = saved.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::normalize::normalize_startup;
    use serde_json::json;

    fn saved_map() -> SavedMap {
        let rec = normalize_startup(&json!({"id": "a1", "nome": "Foo", "setor": "Fintech", "valor": "2M"}));
        SavedMap::from([(rec.id.clone(), rec)])
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("nested").join("saved.json"));

        assert!(repo.load().unwrap().is_empty());
        repo.save(&saved_map()).unwrap();
        assert_eq!(repo.load().unwrap(), saved_map());

        repo.save(&SavedMap::new()).unwrap();
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.json");
        fs::write(&path, "{not json").unwrap();
        let err = JsonFileRepository::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Json(_)));
    }

    #[test]
    fn memory_round_trip() {
        let repo = InMemoryRepository::new();
        repo.save(&saved_map()).unwrap();
        assert_eq!(repo.load().unwrap(), saved_map());
        assert_eq!(InMemoryRepository::with_saved(saved_map()).load().unwrap().len(), 1);
    }
}
