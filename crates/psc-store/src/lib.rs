//! # psc-store — Entity Version Store
//!
//! Owns the authoritative per-language version records of catalog
//! entities and is the single choke point every status change passes
//! through: editor commands, entity-level removal, and translation
//! completions all commit here.
//!
//! ## Modules
//!
//! - **Version records** ([`version`]): the `ContentEntity` aggregate,
//!   its `LanguageVersion`s, and the transition audit log.
//!
//! - **Backend** ([`backend`]): the opaque versioned-record contract
//!   (`read` + `compare_and_swap`) plus the in-memory implementation.
//!
//! - **Store** ([`store`]): `EntityVersionStore` — validated transitions
//!   under optimistic concurrency, atomic removal, dead-version
//!   observer notifications, and the read-only liveness projection.
//!
//! ## Crate Policy
//!
//! - All writes go through the transition table in `psc-state`; there
//!   is no way to set a status directly.
//! - Failures leave no observable state change. The one multi-version
//!   write, `remove_entity`, is a single compare-and-swap.

pub mod backend;
pub mod store;
pub mod version;

pub use backend::{CasConflict, InMemoryRecords, VersionedRecords};
pub use store::{
    EntityVersionStore, RecordingObserver, StoreError, TransitionObserver, VersionLiveness,
    MAX_CAS_ATTEMPTS,
};
pub use version::{ContentEntity, LanguageVersion, TransitionRecord};
