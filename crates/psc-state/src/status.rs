//! # Publishing Status State Machine
//!
//! Models the lifecycle of one language version of a catalog entity.
//!
//! ## States
//!
//! ```text
//!          ┌──edit()────────────────┐
//!          ▼                        │
//! Draft ──publish()──▶ Published ──edit()──▶ Modified ──publish()──▶ Published
//!   │                      │    │                │
//!   │                      │    └──withdraw()──▶ OldPublished
//!   │                      │                        │
//!   └──────archive()───────┴────────archive()───────┘
//!                          │
//!                          ▼
//!                       Deleted ──remove (entity-level)──▶ Removed (terminal)
//! ```
//!
//! ## Design Decision
//!
//! The validator is a set of pure functions over `(action, status)`
//! rather than methods on an aggregate. Callers must be able to ask
//! "would this be legal?" without touching any record, and the store
//! must be able to reject before mutating. The allow-lists below are
//! the authoritative business rules; in particular `Restore` accepts
//! only `Draft`, so an archived entity that was published cannot be
//! restored — a one-way archive policy, not an oversight.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─── Publishing Status ───────────────────────────────────────────────

/// The lifecycle status of a language version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PublishingStatus {
    /// Initial status of a newly created language version.
    Draft,
    /// A published version with newer unpublished edits.
    Modified,
    /// Publicly visible.
    Published,
    /// Superseded — withdrawn from publication.
    OldPublished,
    /// Archived (logically deleted, restorable only from Draft).
    Deleted,
    /// Removed for good (terminal).
    Removed,
}

impl PublishingStatus {
    /// All statuses, for exhaustive iteration in validation and tests.
    pub const ALL: [PublishingStatus; 6] = [
        PublishingStatus::Draft,
        PublishingStatus::Modified,
        PublishingStatus::Published,
        PublishingStatus::OldPublished,
        PublishingStatus::Deleted,
        PublishingStatus::Removed,
    ];

    /// Whether this status is terminal (no further transitions).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Removed)
    }

    /// Whether a version in this status counts as live for connection
    /// eligibility. `Deleted` and `Removed` versions are dead.
    pub fn is_live(&self) -> bool {
        !matches!(self, Self::Deleted | Self::Removed)
    }
}

impl std::fmt::Display for PublishingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Draft => "DRAFT",
            Self::Modified => "MODIFIED",
            Self::Published => "PUBLISHED",
            Self::OldPublished => "OLD_PUBLISHED",
            Self::Deleted => "DELETED",
            Self::Removed => "REMOVED",
        };
        f.write_str(s)
    }
}

// ─── Publishing Action ───────────────────────────────────────────────

/// A language-scoped lifecycle action.
///
/// Entity-level removal is not an action here — it runs across all
/// language versions at once through the store and cannot be requested
/// for a single language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PublishingAction {
    /// Archive the version (logical delete).
    Archive,
    /// Publish the version.
    Publish,
    /// Restore an archived draft.
    Restore,
    /// Save new content.
    Edit,
    /// Take a published version off publication.
    Withdraw,
}

impl PublishingAction {
    /// All language-scoped actions, for exhaustive iteration in tests.
    pub const ALL: [PublishingAction; 5] = [
        PublishingAction::Archive,
        PublishingAction::Publish,
        PublishingAction::Restore,
        PublishingAction::Edit,
        PublishingAction::Withdraw,
    ];
}

impl std::fmt::Display for PublishingAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Archive => "ARCHIVE",
            Self::Publish => "PUBLISH",
            Self::Restore => "RESTORE",
            Self::Edit => "EDIT",
            Self::Withdraw => "WITHDRAW",
        };
        f.write_str(s)
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// A requested action is not legal from the current status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("action {action} is not legal from status {status}")]
pub struct TransitionError {
    /// The current status.
    pub status: PublishingStatus,
    /// The rejected action.
    pub action: PublishingAction,
}

// ─── Validator ───────────────────────────────────────────────────────

/// Whether the version can be archived.
pub fn can_archive(status: PublishingStatus) -> bool {
    matches!(
        status,
        PublishingStatus::Draft
            | PublishingStatus::Published
            | PublishingStatus::OldPublished
            | PublishingStatus::Modified
    )
}

/// Whether the version can be published.
pub fn can_publish(status: PublishingStatus) -> bool {
    matches!(
        status,
        PublishingStatus::Draft | PublishingStatus::Modified | PublishingStatus::Published
    )
}

/// Whether the version can be restored.
pub fn can_restore(status: PublishingStatus) -> bool {
    matches!(status, PublishingStatus::Draft)
}

/// Whether the version is eligible for entity-level removal.
pub fn can_remove(status: PublishingStatus) -> bool {
    matches!(status, PublishingStatus::Modified | PublishingStatus::Deleted)
}

/// Whether the version can accept a content save.
pub fn can_edit(status: PublishingStatus) -> bool {
    matches!(
        status,
        PublishingStatus::Draft | PublishingStatus::Modified | PublishingStatus::Published
    )
}

/// Whether the version can be withdrawn from publication.
pub fn can_withdraw(status: PublishingStatus) -> bool {
    matches!(status, PublishingStatus::Published)
}

/// Whether `action` is legal from `status`.
pub fn is_allowed(action: PublishingAction, status: PublishingStatus) -> bool {
    match action {
        PublishingAction::Archive => can_archive(status),
        PublishingAction::Publish => can_publish(status),
        PublishingAction::Restore => can_restore(status),
        PublishingAction::Edit => can_edit(status),
        PublishingAction::Withdraw => can_withdraw(status),
    }
}

/// The status `action` produces from `status`, or a structured error
/// when the action is illegal. Pure — performs no mutation.
pub fn target_status(
    action: PublishingAction,
    status: PublishingStatus,
) -> Result<PublishingStatus, TransitionError> {
    if !is_allowed(action, status) {
        return Err(TransitionError { status, action });
    }
    let target = match action {
        PublishingAction::Archive => PublishingStatus::Deleted,
        PublishingAction::Publish => PublishingStatus::Published,
        PublishingAction::Restore => PublishingStatus::Draft,
        PublishingAction::Withdraw => PublishingStatus::OldPublished,
        // A content save on a published version leaves the published
        // copy visible and marks the record as carrying newer edits.
        PublishingAction::Edit => match status {
            PublishingStatus::Published => PublishingStatus::Modified,
            other => other,
        },
    };
    Ok(target)
}

// ─── Tests ───────────────────────────────────────────────────────────
