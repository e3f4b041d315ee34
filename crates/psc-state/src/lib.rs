//! # psc-state — Publishing Lifecycle State Machine
//!
//! Encodes the publishing lifecycle of catalog language versions:
//! the `PublishingStatus` enum, the `PublishingAction` enum, and the
//! pure transition validator.
//!
//! ## Crate Policy
//!
//! - The validator performs no I/O and mutates nothing — every function
//!   is a pure lookup over `(action, status)`.
//! - Every caller that mutates a version record must consult
//!   [`target_status`] first and abort on error.
//! - There are no string-typed status names; statuses and actions are
//!   closed enums and the allow-lists `match` exhaustively over them.

pub mod status;

pub use status::{
    can_archive, can_edit, can_publish, can_remove, can_restore, can_withdraw, is_allowed,
    target_status, PublishingAction, PublishingStatus, TransitionError,
};
