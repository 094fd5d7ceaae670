//! In-memory tag store

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::{TagMap, TagStore, TagStoreError};

#[derive(Debug, Default)]
struct Inner {
    files: HashMap<PathBuf, TagMap>,
    writes: Vec<(PathBuf, TagMap)>,
    failing: HashSet<PathBuf>,
}

/// Tag store keeping every file's tags in memory.
///
/// Every write is also appended to a log so callers can see exactly what was
/// committed, in order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Seed the tags of a file
    pub fn insert(&self, path: impl Into<PathBuf>, tags: TagMap) {
        self.lock().files.insert(path.into(), tags);
    }

    /// Make every write to `path` fail
    pub fn fail_writes_to(&self, path: impl Into<PathBuf>) {
        self.lock().failing.insert(path.into());
    }

    /// Current tags of a file
    #[must_use]
    pub fn get(&self, path: &Path) -> Option<TagMap> {
        self.lock().files.get(path).cloned()
    }

    /// Every successful write, oldest first
    #[must_use]
    pub fn writes(&self) -> Vec<(PathBuf, TagMap)> {
        self.lock().writes.clone()
    }
}

impl TagStore for MemoryStore {
    fn read_tags(&self, path: &Path) -> Result<TagMap, TagStoreError> {
        self.lock()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| TagStoreError::read(path, "no such file"))
    }

    fn write_tags(&self, path: &Path, tags: &TagMap) -> Result<(), TagStoreError> {
        let mut inner = self.lock();
        if inner.failing.contains(path) {
            return Err(TagStoreError::write(path, "write rejected"));
        }
        inner.files.insert(path.to_path_buf(), tags.clone());
        inner.writes.push((path.to_path_buf(), tags.clone()));
        Ok(())
    }
}
