use super::files::{atomic_write, ensure_dir, read_file, state_file};
use anyhow::Result;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Key-value slot holding the serialized application state
pub trait StateStorage {
    /// Raw stored blob, `None` when nothing has been written yet
    fn read(&self) -> Result<Option<String>>;

    /// Replace the stored blob
    fn write(&self, payload: &str) -> Result<()>;
}

/// JSON file in the data directory
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: state_file(data_dir),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStorage for FileStorage {
    fn read(&self) -> Result<Option<String>> {
        read_file(&self.path)
    }

    fn write(&self, payload: &str) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            ensure_dir(dir)?;
        }
        atomic_write(&self.path, payload)
    }
}

/// In-memory stand-in. Clones share the same slot so a test can keep a
/// handle after giving one to the store.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    slot: Rc<RefCell<Option<String>>>,
    writes: Rc<RefCell<usize>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(payload: &str) -> Self {
        let storage = Self::default();
        *storage.slot.borrow_mut() = Some(payload.to_string());
        storage
    }

    pub fn contents(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    /// Number of writes performed so far
    pub fn write_count(&self) -> usize {
        *self.writes.borrow()
    }
}

impl StateStorage for MemoryStorage {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.contents())
    }

    fn write(&self, payload: &str) -> Result<()> {
        *self.slot.borrow_mut() = Some(payload.to_string());
        *self.writes.borrow_mut() += 1;
        Ok(())
    }
}
