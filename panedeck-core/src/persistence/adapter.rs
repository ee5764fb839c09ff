//! Reconciliation between the workspace store and durable storage
//!
//! Writes go one way (store mutation, then an explicit [`persist`] call) and
//! external changes come back the other way through an explicit
//! [`on_external_change`] call. Two mechanisms keep the pair from feeding
//! itself: a write flag set for the duration of our own write, and a deep
//! comparison that skips incoming snapshots equal to the current state.
//!
//! [`persist`]: PersistenceAdapter::persist
//! [`on_external_change`]: PersistenceAdapter::on_external_change

use std::cell::Cell;
use std::rc::Rc;

use tracing::{debug, info, warn};

use super::snapshot::PersistedSnapshot;
use super::storage::{KeyValueStore, StorageChange};
use crate::error::{PanedeckResult, StorageResult};
use crate::tracing::span_names;
use crate::workspace::WorkspaceStore;

/// Default storage key for the workspace snapshot.
pub const DEFAULT_STORAGE_KEY: &str = "panedeck.workspace";

/// Shared flag telling whether the adapter is in the middle of a write.
#[derive(Debug, Clone, Default)]
pub struct WriteFlag(Rc<Cell<bool>>);

impl WriteFlag {
    /// Returns true while a write is in progress.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.0.get()
    }
}

/// RAII guard raising a [`WriteFlag`] until dropped.
#[derive(Debug)]
pub struct WriteGuard {
    flag: WriteFlag,
}

impl WriteGuard {
    /// Raises the flag.
    #[must_use]
    pub fn acquire(flag: &WriteFlag) -> Self {
        flag.0.set(true);
        Self { flag: flag.clone() }
    }
}

impl Drop for WriteGuard {
    fn drop(&mut self) {
        self.flag.0.set(false);
    }
}

/// What happened when loading the stored snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The stored workspace was restored.
    Restored,
    /// The stored workspace was restored after fixing it up (rescaled
    /// widths, an older format version); it has not been written back yet.
    Repaired,
    /// Nothing was stored; the store keeps its default workspace.
    Empty,
    /// The stored snapshot was unusable and the store was reset.
    Discarded,
}

/// Why an external change was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Our own write is in progress.
    WriteInProgress,
    /// The change concerns another key.
    OtherKey,
    /// The key was removed.
    Removed,
    /// The snapshot equals the current state.
    Unchanged,
    /// The snapshot is unreadable or inconsistent.
    Invalid,
}

/// Result of handling an external change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalChangeOutcome {
    /// The store now holds the incoming workspace.
    Applied,
    /// The change was skipped.
    Ignored(IgnoreReason),
}

/// Persists a [`WorkspaceStore`] under one key of a [`KeyValueStore`].
#[derive(Debug)]
pub struct PersistenceAdapter<S> {
    storage: S,
    key: String,
    writing: WriteFlag,
    last_persisted: Cell<Option<u64>>,
}

impl<S: KeyValueStore> PersistenceAdapter<S> {
    /// Creates an adapter using [`DEFAULT_STORAGE_KEY`].
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_STORAGE_KEY)
    }

    /// Creates an adapter storing the snapshot under `key`.
    #[must_use]
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            writing: WriteFlag::default(),
            last_persisted: Cell::new(None),
        }
    }

    /// Returns the storage key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the underlying storage.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns a handle on the write flag, for listeners that may be
    /// invoked synchronously from inside a write.
    #[must_use]
    pub fn write_flag(&self) -> WriteFlag {
        self.writing.clone()
    }

    /// Returns true while the adapter is writing.
    #[must_use]
    pub fn is_writing(&self) -> bool {
        self.writing.is_set()
    }

    /// Loads the stored snapshot into `store`.
    ///
    /// A snapshot that fails to parse, has no screens or comes from a newer
    /// version is discarded and the store reset to a single empty screen.
    /// A snapshot restored only after repair stays unpersisted, so the next
    /// [`persist`](Self::persist) writes the repaired state.
    ///
    /// # Errors
    ///
    /// Returns an error only if the storage itself cannot be read.
    pub fn load(&self, store: &mut WorkspaceStore) -> StorageResult<LoadOutcome> {
        let _span = crate::trace_operation!(span_names::PERSISTENCE_LOAD, key = %self.key).entered();
        let Some(json) = self.storage.get(&self.key)? else {
            debug!(key = %self.key, "No stored workspace");
            return Ok(LoadOutcome::Empty);
        };

        let parsed = PersistedSnapshot::from_json(&json).and_then(|stored| {
            let workspace = stored.clone().into_workspace()?;
            Ok((stored, workspace))
        });
        let outcome = match parsed {
            Ok((stored, workspace)) => {
                store.replace(workspace);
                let current = PersistedSnapshot::from_workspace(store.workspace());
                let repaired = current
                    != PersistedSnapshot {
                        version: current.version,
                        ..stored
                    };
                info!(
                    key = %self.key,
                    screens = store.screen_count(),
                    tabs = store.tab_count(),
                    repaired,
                    "Workspace restored"
                );
                if repaired {
                    LoadOutcome::Repaired
                } else {
                    LoadOutcome::Restored
                }
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Discarding stored workspace");
                store.reset();
                LoadOutcome::Discarded
            }
        };
        // A repaired workspace differs from what is stored and still needs
        // writing
        if outcome != LoadOutcome::Repaired {
            self.last_persisted.set(Some(store.revision()));
        }
        Ok(outcome)
    }

    /// Writes the store's snapshot if it changed since the last write.
    /// Returns true if something was written.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    pub fn persist(&self, store: &WorkspaceStore) -> PanedeckResult<bool> {
        if self.last_persisted.get() == Some(store.revision()) {
            return Ok(false);
        }
        let _span = crate::trace_operation!(
            span_names::PERSISTENCE_WRITE,
            key = %self.key,
            revision = store.revision()
        )
        .entered();
        let json = PersistedSnapshot::from_workspace(store.workspace()).to_json()?;
        {
            let _guard = WriteGuard::acquire(&self.writing);
            self.storage.set(&self.key, &json)?;
        }
        self.last_persisted.set(Some(store.revision()));
        debug!(key = %self.key, revision = store.revision(), "Workspace persisted");
        Ok(true)
    }

    /// Handles a change to the storage made by another execution context.
    ///
    /// The store is replaced only if the incoming snapshot is valid and
    /// differs from the current state.
    pub fn on_external_change(
        &self,
        store: &mut WorkspaceStore,
        change: &StorageChange,
    ) -> ExternalChangeOutcome {
        if self.is_writing() {
            return ExternalChangeOutcome::Ignored(IgnoreReason::WriteInProgress);
        }
        if change.key != self.key {
            return ExternalChangeOutcome::Ignored(IgnoreReason::OtherKey);
        }
        let Some(json) = change.new_value.as_deref() else {
            return ExternalChangeOutcome::Ignored(IgnoreReason::Removed);
        };

        let incoming = match PersistedSnapshot::from_json(json) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Ignoring unreadable external workspace");
                return ExternalChangeOutcome::Ignored(IgnoreReason::Invalid);
            }
        };
        if incoming == PersistedSnapshot::from_workspace(store.workspace()) {
            return ExternalChangeOutcome::Ignored(IgnoreReason::Unchanged);
        }

        match incoming.into_workspace() {
            Ok(workspace) => {
                store.replace(workspace);
                // The storage already holds this state
                self.last_persisted.set(Some(store.revision()));
                info!(key = %self.key, "Workspace replaced by external change");
                ExternalChangeOutcome::Applied
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Ignoring invalid external workspace");
                ExternalChangeOutcome::Ignored(IgnoreReason::Invalid)
            }
        }
    }
}
