//! # psc-core — Foundational Types for the PSC Stack
//!
//! The leaf crate of the workspace. Defines the primitives every other
//! crate builds on; depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain identifiers.** `EntityId`,
//!    `ConnectionId`, `OrderId`, `ActorId` — no bare UUIDs or strings
//!    cross a component boundary.
//!
//! 2. **UTC-only timestamps.** The `Timestamp` type enforces UTC with
//!    seconds precision; offsets are rejected at parse time.
//!
//! 3. **Validated language codes.** `LanguageCode` cannot hold anything
//!    but 2–3 lowercase ASCII letters.
//!
//! 4. **Capability lookup, not inheritance.** Which languages an entity
//!    type may carry is one exhaustive `match` in [`language`], not a
//!    type hierarchy.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `psc-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, `Serialize`, `Deserialize`.

pub mod error;
pub mod identity;
pub mod language;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use error::CoreError;
pub use identity::{ActorId, ConnectionId, EntityId, OrderId};
pub use language::{allowed_languages, language_enabled, EntityType, LanguageCode};
pub use temporal::Timestamp;
