//! # Versioned-Record Backend
//!
//! The opaque persistence contract the store is written against: read a
//! record with its storage revision, write it back with compare-and-swap.
//! The store assumes nothing else about the storage engine — the shipped
//! [`InMemoryRecords`] is a `parking_lot`-guarded map, and a relational
//! or key-value backend can implement the same two methods.

use std::collections::HashMap;

use parking_lot::RwLock;
use thiserror::Error;

use psc_core::EntityId;

use crate::version::ContentEntity;

/// A compare-and-swap lost the race: the record's storage revision did
/// not match what the writer expected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("record revision mismatch: expected {expected:?}, found {found:?}")]
pub struct CasConflict {
    /// What the writer expected (`None` = record absent).
    pub expected: Option<u64>,
    /// What the backend held (`None` = record absent).
    pub found: Option<u64>,
}

/// Versioned-record storage contract.
pub trait VersionedRecords: Send + Sync {
    /// Read the record for `id` together with its storage revision.
    fn read(&self, id: &EntityId) -> Option<(ContentEntity, u64)>;

    /// Replace the record for `id` if its storage revision still equals
    /// `expected`. `expected = None` creates the record and fails when
    /// one already exists. Returns the new storage revision.
    fn compare_and_swap(
        &self,
        id: &EntityId,
        expected: Option<u64>,
        value: ContentEntity,
    ) -> Result<u64, CasConflict>;
}

/// In-memory backend.
#[derive(Default)]
pub struct InMemoryRecords {
    records: RwLock<HashMap<EntityId, (ContentEntity, u64)>>,
}

impl InMemoryRecords {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }
}

impl VersionedRecords for InMemoryRecords {
    fn read(&self, id: &EntityId) -> Option<(ContentEntity, u64)> {
        self.records.read().get(id).cloned()
    }

    fn compare_and_swap(
        &self,
        id: &EntityId,
        expected: Option<u64>,
        value: ContentEntity,
    ) -> Result<u64, CasConflict> {
        let mut records = self.records.write();
        let found = records.get(id).map(|(_, rev)| *rev);
        if found != expected {
            return Err(CasConflict { expected, found });
        }
        let next = found.unwrap_or(0) + 1;
        records.insert(*id, (value, next));
        Ok(next)
    }
}
