//! Durable key-value stores
//!
//! A [`KeyValueStore`] holds string values under string keys and is shared
//! with other execution contexts (other windows or processes). Each store
//! can report changes made by those other contexts, never its own writes.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use notify::{EventKind, RecursiveMode, Watcher};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, warn};

use crate::error::{StorageError, StorageResult};

/// A durable string key-value store.
pub trait KeyValueStore {
    /// Returns the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}

/// A change made to a key by another execution context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageChange {
    /// Changed key
    pub key: String,
    /// New value; `None` if the key was removed
    pub new_value: Option<String>,
}

// ============================================================================
// In-memory store
// ============================================================================

const CHANGE_CHANNEL_CAPACITY: usize = 64;

static NEXT_ORIGIN: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone)]
struct OriginChange {
    origin: u64,
    change: StorageChange,
}

/// In-memory store shared between handles.
///
/// Every handle acts as its own execution context: writes through one
/// handle are visible to all, and are reported to the subscribers of every
/// *other* handle.
#[derive(Debug)]
pub struct MemoryStore {
    data: Arc<Mutex<HashMap<String, String>>>,
    changes: broadcast::Sender<OriginChange>,
    origin: u64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            data: Arc::new(Mutex::new(HashMap::new())),
            changes,
            origin: NEXT_ORIGIN.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Returns a new handle onto the same data, acting as a separate
    /// execution context.
    #[must_use]
    pub fn handle(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
            changes: self.changes.clone(),
            origin: NEXT_ORIGIN.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Subscribes to changes made through other handles.
    #[must_use]
    pub fn subscribe(&self) -> MemoryChanges {
        MemoryChanges {
            rx: self.changes.subscribe(),
            origin: self.origin,
        }
    }

    /// Removes a key.
    pub fn remove(&self, key: &str) {
        let removed = self
            .data
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        if removed.is_some() {
            self.publish(key, None);
        }
    }

    fn publish(&self, key: &str, new_value: Option<String>) {
        // No subscribers is not an error
        let _ = self.changes.send(OriginChange {
            origin: self.origin,
            change: StorageChange {
                key: key.to_string(),
                new_value,
            },
        });
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self
            .data
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let previous = self
            .data
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        if previous.as_deref() != Some(value) {
            self.publish(key, Some(value.to_string()));
        }
        Ok(())
    }
}

/// Stream of changes made through other [`MemoryStore`] handles.
#[derive(Debug)]
pub struct MemoryChanges {
    rx: broadcast::Receiver<OriginChange>,
    origin: u64,
}

impl MemoryChanges {
    /// Waits for the next foreign change. Returns `None` once every handle
    /// is gone.
    pub async fn next(&mut self) -> Option<StorageChange> {
        loop {
            match self.rx.recv().await {
                Ok(event) if event.origin != self.origin => return Some(event.change),
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Storage change subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Returns a pending foreign change without waiting.
    pub fn try_next(&mut self) -> Option<StorageChange> {
        loop {
            match self.rx.try_recv() {
                Ok(event) if event.origin != self.origin => return Some(event.change),
                Ok(_) | Err(broadcast::error::TryRecvError::Lagged(_)) => {}
                Err(_) => return None,
            }
        }
    }
}

// ============================================================================
// File store
// ============================================================================

const FILE_EXTENSION: &str = "json";

/// Store keeping one file per key in a directory.
///
/// Other processes sharing the directory see each other's writes; a
/// [`FileWatch`] reports them.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    own_writes: Arc<Mutex<HashMap<String, String>>>,
}

impl FileStore {
    /// Creates a store in `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(Self {
            dir,
            own_writes: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Returns the directory holding the files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file backing `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty, hidden, or contains a path
    /// separator.
    pub fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.{FILE_EXTENSION}")))
    }

    /// Starts watching the directory for writes by other processes.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform watcher cannot be created.
    pub fn watch(&self) -> StorageResult<FileWatch> {
        let (tx, rx) = mpsc::unbounded_channel();
        let own_writes = Arc::clone(&self.own_writes);

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    warn!(error = %e, "Storage watcher error");
                    return;
                }
            };
            if !matches!(
                event.kind,
                EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
            ) {
                return;
            }
            for path in &event.paths {
                let Some(key) = key_for_path(path) else {
                    continue;
                };
                let new_value = fs::read_to_string(path).ok();
                {
                    let mut own_writes =
                        own_writes.lock().unwrap_or_else(PoisonError::into_inner);
                    let is_own = own_writes
                        .get(&key)
                        .map(|own| new_value.as_deref() == Some(own.as_str()));
                    match is_own {
                        Some(true) => continue,
                        // Someone else replaced our value; a later rewrite of
                        // it is theirs, not ours
                        Some(false) => {
                            own_writes.remove(&key);
                        }
                        None => {}
                    }
                }
                // Receiver gone means nobody is listening anymore
                let _ = tx.send(StorageChange { key, new_value });
            }
        })?;
        watcher.watch(&self.dir, RecursiveMode::NonRecursive)?;

        debug!(dir = %self.dir.display(), "Watching storage directory");
        Ok(FileWatch {
            _watcher: watcher,
            rx,
        })
    }

    /// Sets the value last written by this store under `key`, returning the
    /// one it replaces.
    fn record_own_write(&self, key: &str, value: Option<String>) -> Option<String> {
        let mut own_writes = self
            .own_writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match value {
            Some(value) => own_writes.insert(key.to_string(), value),
            None => own_writes.remove(key),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        let io_err = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };

        let previous = self.record_own_write(key, Some(value.to_string()));

        // Write to a sibling file and rename so readers never see a partial value
        let tmp = self.dir.join(format!(".{key}.{FILE_EXTENSION}.tmp"));
        if let Err(source) = write_replacing(&tmp, &path, value) {
            let _ = fs::remove_file(&tmp);
            self.record_own_write(key, previous);
            return Err(io_err(source));
        }
        Ok(())
    }
}

fn write_replacing(tmp: &Path, path: &Path, value: &str) -> std::io::Result<()> {
    let mut file = fs::File::create(tmp)?;
    file.write_all(value.as_bytes())?;
    file.sync_all()?;
    fs::rename(tmp, path)
}

/// Changes made to a [`FileStore`] directory by other processes.
pub struct FileWatch {
    _watcher: notify::RecommendedWatcher,
    rx: mpsc::UnboundedReceiver<StorageChange>,
}

impl FileWatch {
    /// Waits for the next foreign change.
    pub async fn next(&mut self) -> Option<StorageChange> {
        self.rx.recv().await
    }

    /// Returns a pending foreign change without waiting.
    pub fn try_next(&mut self) -> Option<StorageChange> {
        self.rx.try_recv().ok()
    }
}

fn validate_key(key: &str) -> StorageResult<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && !key.contains(['/', '\\'])
        && !key.chars().any(char::is_control);
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

fn key_for_path(path: &Path) -> Option<String> {
    if path.extension().and_then(|e| e.to_str()) != Some(FILE_EXTENSION) {
        return None;
    }
    let key = path.file_stem()?.to_str()?;
    validate_key(key).ok()?;
    Some(key.to_string())
}
