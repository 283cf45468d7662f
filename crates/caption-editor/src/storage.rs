//! Key/value session storage.
//!
//! The editor persists one JSON record under one key. Hosts plug in the
//! backend: `MemoryStorage` for tests and embedding, `FileStorage` for
//! native builds, browser `localStorage` in the WASM bridge.

use caption_core::error::{EditorError, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::rc::Rc;

pub trait SessionStorage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

// ─── In-memory ───────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct MemoryInner {
    values: HashMap<String, String>,
    writes: usize,
}

/// In-memory storage. Clones share the same map, so a test can keep a handle
/// after moving one into the editor.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage(Rc<RefCell<MemoryInner>>);

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set` calls so far.
    pub fn writes(&self) -> usize {
        self.0.borrow().writes
    }

    pub fn peek(&self, key: &str) -> Option<String> {
        self.0.borrow().values.get(key).cloned()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.peek(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut inner = self.0.borrow_mut();
        inner.values.insert(key.to_owned(), value.to_owned());
        inner.writes += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.0.borrow_mut().values.remove(key);
        Ok(())
    }
}

// ─── File-backed ─────────────────────────────────────────────────────────

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn storage_err(e: std::io::Error) -> EditorError {
    EditorError::Storage(e.to_string())
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_err(e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(storage_err)?;
        std::fs::write(self.path(key), value).map_err(storage_err)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match std::fs::remove_file(self.path(key)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(storage_err(e)),
            _ => Ok(()),
        }
    }
}
