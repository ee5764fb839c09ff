//! A workspace store bound to durable storage

use tracing::debug;

use super::adapter::{ExternalChangeOutcome, LoadOutcome, PersistenceAdapter};
use super::storage::{KeyValueStore, StorageChange};
use crate::error::PanedeckResult;
use crate::workspace::WorkspaceStore;

/// Owns a [`WorkspaceStore`] and writes it back after every mutation.
#[derive(Debug)]
pub struct WorkspaceSession<S> {
    store: WorkspaceStore,
    persistence: PersistenceAdapter<S>,
}

impl<S: KeyValueStore> WorkspaceSession<S> {
    /// Binds `store` to `persistence` without loading anything.
    #[must_use]
    pub const fn new(store: WorkspaceStore, persistence: PersistenceAdapter<S>) -> Self {
        Self { store, persistence }
    }

    /// Binds `store` to `persistence` and loads the stored workspace.
    ///
    /// A workspace that had to be repaired on load is written back right
    /// away.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be read, or the repaired
    /// workspace cannot be written.
    pub fn open(
        store: WorkspaceStore,
        persistence: PersistenceAdapter<S>,
    ) -> PanedeckResult<(Self, LoadOutcome)> {
        let mut session = Self::new(store, persistence);
        let outcome = session.persistence.load(&mut session.store)?;
        if outcome == LoadOutcome::Repaired {
            session.flush()?;
        }
        debug!(?outcome, "Workspace session opened");
        Ok((session, outcome))
    }

    /// Returns the store.
    #[must_use]
    pub const fn store(&self) -> &WorkspaceStore {
        &self.store
    }

    /// Returns the persistence adapter.
    #[must_use]
    pub const fn persistence(&self) -> &PersistenceAdapter<S> {
        &self.persistence
    }

    /// Runs `f` against the store, then persists the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written. The mutation
    /// itself has already been applied in that case.
    pub fn mutate<R>(&mut self, f: impl FnOnce(&mut WorkspaceStore) -> R) -> PanedeckResult<R> {
        let result = f(&mut self.store);
        self.persistence.persist(&self.store)?;
        Ok(result)
    }

    /// Writes the store if it changed since the last write.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    pub fn flush(&self) -> PanedeckResult<bool> {
        self.persistence.persist(&self.store)
    }

    /// Applies a change made by another execution context.
    pub fn apply_external(&mut self, change: &StorageChange) -> ExternalChangeOutcome {
        self.persistence.on_external_change(&mut self.store, change)
    }

    /// Splits the session into its parts.
    #[must_use]
    pub fn into_parts(self) -> (WorkspaceStore, PersistenceAdapter<S>) {
        (self.store, self.persistence)
    }
}
