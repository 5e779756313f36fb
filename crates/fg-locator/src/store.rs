//! Boundary persistence
//!
//! A flat JSON object mapping bracket keys (`"[0,50000]"`) to the last page
//! known to hold media for that bracket.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;

use fg_core::PopularityBracket;

use crate::error::StoreResult;

/// Page a bracket falls back to when nothing is stored
pub const DEFAULT_BOUNDARY: u32 = 1;

/// Bracket key → last known page
pub type BoundaryMap = BTreeMap<String, u32>;

/// Durable backend for the boundary map
pub trait BoundaryStore: Send + Sync {
    /// Read the whole map; a store that was never written reads as empty
    fn load(&self) -> StoreResult<BoundaryMap>;

    /// Replace the whole map
    fn save(&self, map: &BoundaryMap) -> StoreResult<()>;
}

impl<S: BoundaryStore + ?Sized> BoundaryStore for &S {
    fn load(&self) -> StoreResult<BoundaryMap> {
        (**self).load()
    }

    fn save(&self, map: &BoundaryMap) -> StoreResult<()> {
        (**self).save(map)
    }
}

impl<S: BoundaryStore + ?Sized> BoundaryStore for Arc<S> {
    fn load(&self) -> StoreResult<BoundaryMap> {
        (**self).load()
    }

    fn save(&self, map: &BoundaryMap) -> StoreResult<()> {
        (**self).save(map)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// JSON FILE STORE
// ═══════════════════════════════════════════════════════════════════════════════

/// Boundary map kept in a JSON file, replaced atomically on save
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

impl BoundaryStore for JsonFileStore {
    fn load(&self) -> StoreResult<BoundaryMap> {
        if !self.path.exists() {
            log::info!(
                "[Store] {} not found, starting from empty boundaries",
                self.path.display()
            );
            return Ok(BoundaryMap::new());
        }

        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, map: &BoundaryMap) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(map)?;

        // Write beside the target, then swap it in
        let tmp = self.tmp_path();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        log::debug!("[Store] Wrote {} boundaries to {}", map.len(), self.path.display());
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// MEMORY STORE
// ═══════════════════════════════════════════════════════════════════════════════

/// In-process store, for tests and for a compiled-in constant map
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: RwLock<BoundaryMap>,
    loads: AtomicUsize,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<K: Into<String>>(entries: impl IntoIterator<Item = (K, u32)>) -> Self {
        Self {
            map: RwLock::new(entries.into_iter().map(|(k, v)| (k.into(), v)).collect()),
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> BoundaryMap {
        self.map.read().clone()
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::Relaxed)
    }
}

impl BoundaryStore for MemoryStore {
    fn load(&self) -> StoreResult<BoundaryMap> {
        self.loads.fetch_add(1, Ordering::Relaxed);
        Ok(self.map.read().clone())
    }

    fn save(&self, map: &BoundaryMap) -> StoreResult<()> {
        self.saves.fetch_add(1, Ordering::Relaxed);
        *self.map.write() = map.clone();
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// BOUNDARY CACHE
// ═══════════════════════════════════════════════════════════════════════════════

/// Read-through view of a [`BoundaryStore`], loaded at most once.
///
/// Readers share an immutable snapshot; nothing here ever writes back.
#[derive(Debug)]
pub struct BoundaryCache<S> {
    store: S,
    snapshot: RwLock<Option<Arc<BoundaryMap>>>,
}

impl<S: BoundaryStore> BoundaryCache<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            snapshot: RwLock::new(None),
        }
    }

    /// The loaded map, reading the store on first use
    pub fn snapshot(&self) -> StoreResult<Arc<BoundaryMap>> {
        if let Some(map) = self.snapshot.read().as_ref() {
            return Ok(Arc::clone(map));
        }

        let mut slot = self.snapshot.write();
        if let Some(map) = slot.as_ref() {
            return Ok(Arc::clone(map));
        }

        let map = Arc::new(self.store.load()?);
        log::debug!("[Store] Loaded {} boundaries", map.len());
        *slot = Some(Arc::clone(&map));
        Ok(map)
    }

    /// Last known page for `bracket`, never below [`DEFAULT_BOUNDARY`]
    pub fn boundary(&self, bracket: &PopularityBracket) -> StoreResult<u32> {
        Ok(self
            .snapshot()?
            .get(&bracket.key())
            .copied()
            .unwrap_or(DEFAULT_BOUNDARY)
            .max(DEFAULT_BOUNDARY))
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("lastPage.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_file_store_persists_flat_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("lastPage.json");
        let store = JsonFileStore::new(&path);

        let mut map = BoundaryMap::new();
        map.insert(PopularityBracket::new(0, 50_000).key(), 12);
        map.insert(PopularityBracket::unbounded(400_000).key(), 3);
        store.save(&map).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["[0,50000]"], 12);
        assert_eq!(raw["[400000,null]"], 3);

        assert_eq!(store.load().unwrap(), map);
        assert!(!store.tmp_path().exists());
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lastPage.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(JsonFileStore::new(&path).load().is_err());
    }

    #[test]
    fn test_cache_loads_once() {
        let store = MemoryStore::with_entries([("[0,1000]", 7)]);
        let cache = BoundaryCache::new(&store);
        let bracket = PopularityBracket::new(0, 1_000);

        assert_eq!(cache.boundary(&bracket).unwrap(), 7);
        assert_eq!(cache.boundary(&bracket).unwrap(), 7);
        assert_eq!(store.load_count(), 1);
    }

    #[test]
    fn test_cache_defaults_unknown_bracket() {
        let cache = BoundaryCache::new(MemoryStore::with_entries([("[5,10]", 0)]));

        assert_eq!(cache.boundary(&PopularityBracket::new(0, 1)).unwrap(), 1);
        // A stored zero is clamped to the first page
        assert_eq!(cache.boundary(&PopularityBracket::new(5, 10)).unwrap(), 1);
    }

    #[test]
    fn test_cache_keeps_first_snapshot() {
        let store = MemoryStore::with_entries([("[0,1000]", 7)]);
        let cache = BoundaryCache::new(&store);
        let bracket = PopularityBracket::new(0, 1_000);

        assert_eq!(cache.boundary(&bracket).unwrap(), 7);

        let mut updated = BoundaryMap::new();
        updated.insert("[0,1000]".into(), 9);
        store.save(&updated).unwrap();

        assert_eq!(cache.boundary(&bracket).unwrap(), 7);
    }
}
