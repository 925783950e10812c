//! Where snapshots live.

use std::cell::RefCell;
use std::rc::Rc;

use super::error::StoreError;

/// A single-slot snapshot store.
pub trait SnapshotStore {
    /// The stored snapshot, `None` when nothing has been saved yet.
    fn read(&self) -> Result<Option<String>, StoreError>;
    fn write(&mut self, json: &str) -> Result<(), StoreError>;
    fn remove(&mut self) -> Result<(), StoreError>;
}

/// In-memory store. Clones share the same slot, so a test can keep a handle
/// after moving the store into an `Economy`.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    slot: Rc<RefCell<Option<String>>>,
    writes: Rc<RefCell<u32>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(json: &str) -> Self {
        let store = Self::default();
        *store.slot.borrow_mut() = Some(json.to_string());
        store
    }

    pub fn snapshot(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> u32 {
        *self.writes.borrow()
    }
}

impl SnapshotStore for MemoryStore {
    fn read(&self) -> Result<Option<String>, StoreError> {
        Ok(self.slot.borrow().clone())
    }

    fn write(&mut self, json: &str) -> Result<(), StoreError> {
        *self.slot.borrow_mut() = Some(json.to_string());
        *self.writes.borrow_mut() += 1;
        Ok(())
    }

    fn remove(&mut self) -> Result<(), StoreError> {
        *self.slot.borrow_mut() = None;
        Ok(())
    }
}

/// JSON file on disk (native targets).
#[cfg(not(target_arch = "wasm32"))]
#[derive(Clone, Debug)]
pub struct FileStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl SnapshotStore for FileStore {
    fn read(&self) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Ok(Some(json)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write to a sibling temp file and rename, so a crash mid-write never
    /// leaves a truncated snapshot behind.
    fn write(&mut self, json: &str) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn remove(&mut self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// localStorage key.
#[cfg(target_arch = "wasm32")]
pub const STORAGE_KEY: &str = "streamer_clicker_save";

/// Browser `localStorage` (wasm32).
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Debug)]
pub struct LocalStorageStore {
    key: String,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    pub fn new() -> Self {
        Self::with_key(STORAGE_KEY)
    }

    pub fn with_key(key: &str) -> Self {
        Self { key: key.to_string() }
    }

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .ok_or(StoreError::Unavailable)?
            .local_storage()
            .map_err(|e| StoreError::Backend(format!("{e:?}")))?
            .ok_or(StoreError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl SnapshotStore for LocalStorageStore {
    fn read(&self) -> Result<Option<String>, StoreError> {
        Self::storage()?
            .get_item(&self.key)
            .map_err(|e| StoreError::Backend(format!("{e:?}")))
    }

    fn write(&mut self, json: &str) -> Result<(), StoreError> {
        Self::storage()?
            .set_item(&self.key, json)
            .map_err(|e| StoreError::Backend(format!("{e:?}")))
    }

    fn remove(&mut self) -> Result<(), StoreError> {
        Self::storage()?
            .remove_item(&self.key)
            .map_err(|e| StoreError::Backend(format!("{e:?}")))
    }
}
