//! Identifier generation for screens and tabs

use uuid::Uuid;

use super::types::{ScreenId, TabId};

/// Produces collision-free identifiers for new screens and tabs.
pub trait IdentifierSource {
    /// Returns a fresh identifier.
    fn next_uuid(&mut self) -> Uuid;

    /// Returns a fresh tab id.
    fn next_tab_id(&mut self) -> TabId {
        TabId(self.next_uuid())
    }

    /// Returns a fresh screen id.
    fn next_screen_id(&mut self) -> ScreenId {
        ScreenId(self.next_uuid())
    }
}

/// Random (v4) UUID source used in production.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidSource;

impl IdentifierSource for UuidSource {
    fn next_uuid(&mut self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Deterministic source yielding `start, start + 1, ...` as UUIDs.
///
/// Useful for reproducible tests and fixtures.
#[derive(Debug, Clone)]
pub struct SequentialIdSource {
    next: u128,
}

impl SequentialIdSource {
    /// Creates a source starting at `start`.
    #[must_use]
    pub const fn starting_at(start: u128) -> Self {
        Self { next: start }
    }
}

impl Default for SequentialIdSource {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdentifierSource for SequentialIdSource {
    fn next_uuid(&mut self) -> Uuid {
        let id = Uuid::from_u128(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}
