//! Set of order ids that have already raised a notification.

use super::Result;
use crate::error::StorageError;
use indexmap::IndexSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Most ids kept; the oldest are dropped first.
pub const MAX_SEEN: usize = 5000;

/// Ordered set of notified order ids, optionally mirrored to a JSON file.
#[derive(Debug, Clone, Default)]
pub struct SeenOrders {
    ids: IndexSet<String>,
    path: Option<PathBuf>,
}

impl SeenOrders {
    /// Empty set that lives only as long as its owner.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load from `path` (missing file means empty); later inserts are saved back.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let ids = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|source| StorageError::FileIo {
                path: path.to_string_lossy().to_string(),
                source,
            })?;
            let ids: Vec<String> = serde_json::from_str(&content).map_err(|e| StorageError::SeenOrders {
                path: path.to_string_lossy().to_string(),
                message: e.to_string(),
            })?;
            let skip = ids.len().saturating_sub(MAX_SEEN);
            ids.into_iter().skip(skip).collect()
        } else {
            IndexSet::new()
        };

        Ok(Self { ids, path: Some(path) })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Record an id; returns `true` when it was not seen before.
    ///
    /// Past [`MAX_SEEN`] ids the oldest is forgotten. A failed save is logged
    /// and the id stays recorded in memory.
    pub fn insert(&mut self, id: &str) -> bool {
        if !self.ids.insert(id.to_string()) {
            return false;
        }
        while self.ids.len() > MAX_SEEN {
            self.ids.shift_remove_index(0);
        }
        if let Err(e) = self.save() {
            log::warn!("Could not persist seen orders: {}", e);
        }
        true
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::FileIo {
                path: parent.to_string_lossy().to_string(),
                source,
            })?;
        }
        let ids: Vec<&String> = self.ids.iter().collect();
        let json = serde_json::to_string(&ids).map_err(|e| StorageError::SeenOrders {
            path: path.to_string_lossy().to_string(),
            message: e.to_string(),
        })?;
        fs::write(path, json).map_err(|source| StorageError::FileIo {
            path: path.to_string_lossy().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_insert_reports_first_sighting_only() {
        let mut seen = SeenOrders::in_memory();
        assert!(seen.insert("o1"));
        assert!(seen.insert("o2"));
        assert!(!seen.insert("o1"));
        assert_eq!(seen.iter().collect::<Vec<_>>(), vec!["o1", "o2"]);
        assert!(seen.path().is_none());
    }

    #[test]
    fn test_persisted_across_loads() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("state").join("seen.json");

        let mut seen = SeenOrders::load(&path).expect("load empty");
        assert!(seen.is_empty());
        seen.insert("o1");
        seen.insert("o2");

        let mut reloaded = SeenOrders::load(&path).expect("reload");
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.contains("o2"));
        assert!(!reloaded.insert("o1"));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("seen.json");
        fs::write(&path, "{not json").unwrap();
        let err = SeenOrders::load(&path).unwrap_err();
        assert!(matches!(err, StorageError::SeenOrders { .. }));
        assert!(err.to_string().starts_with("Seen orders file"));
        assert!(err.to_string().contains("seen.json"));
    }

    #[test]
    fn test_oldest_ids_are_dropped_past_the_cap() {
        let mut seen = SeenOrders::in_memory();
        for i in 0..MAX_SEEN + 2 {
            assert!(seen.insert(&format!("o{}", i)));
        }
        assert_eq!(seen.len(), MAX_SEEN);
        assert!(!seen.contains("o0"));
        assert!(!seen.contains("o1"));
        assert_eq!(seen.iter().next(), Some("o2"));
        // A forgotten id counts as new again
        assert!(seen.insert("o0"));
        assert!(!seen.contains("o2"));
    }

    #[test]
    fn test_load_keeps_most_recent_ids() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("seen.json");
        let ids: Vec<String> = (0..MAX_SEEN + 5).map(|i| format!("o{}", i)).collect();
        fs::write(&path, serde_json::to_string(&ids).unwrap()).unwrap();

        let seen = SeenOrders::load(&path).expect("load");
        assert_eq!(seen.len(), MAX_SEEN);
        assert_eq!(seen.iter().next(), Some("o5"));
        assert!(seen.contains(&format!("o{}", MAX_SEEN + 4)));
    }
}
