//! # Version Records
//!
//! The aggregate owned by the store: a content entity and its per-language
//! versions. One `LanguageVersion` per language code — the map key is the
//! uniqueness guarantee. Entities are created on first save and never
//! physically deleted; entity-level removal flips statuses to `Removed`
//! and sets the `removed` flag, keeping the record inspectable.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use psc_core::{ActorId, EntityId, EntityType, LanguageCode, Timestamp};
use psc_state::PublishingStatus;

/// One editable/publishable language instance of a content entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageVersion {
    /// The language this version is written in.
    pub language: LanguageCode,
    /// Current lifecycle status.
    pub status: PublishingStatus,
    /// The per-language display name of the entity.
    pub display_name: String,
    /// Optimistic-concurrency token. Strictly increases with every
    /// committed change; a write quoting a stale value is rejected.
    pub revision: u64,
    /// When the version was last published.
    pub published_at: Option<Timestamp>,
    /// When the version was last archived.
    pub archived_at: Option<Timestamp>,
    /// When the version was last reviewed.
    pub reviewed_at: Option<Timestamp>,
    /// Who reviewed it.
    pub reviewed_by: Option<ActorId>,
}

impl LanguageVersion {
    /// A fresh `Draft` version at revision 1.
    pub fn new(language: LanguageCode, display_name: String) -> Self {
        Self {
            language,
            status: PublishingStatus::Draft,
            display_name,
            revision: 1,
            published_at: None,
            archived_at: None,
            reviewed_at: None,
            reviewed_by: None,
        }
    }
}

/// Record of one committed status transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// The language version that moved.
    pub language: LanguageCode,
    /// Status before the transition.
    pub from_status: PublishingStatus,
    /// Status after the transition.
    pub to_status: PublishingStatus,
    /// Who requested it.
    pub actor: ActorId,
    /// When it was committed.
    pub at: Timestamp,
}

/// A content entity with its language versions and transition history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentEntity {
    /// Stable identifier, shared by all language versions.
    pub id: EntityId,
    /// What kind of catalog content this is.
    pub entity_type: EntityType,
    /// At most one version per language code.
    pub language_versions: BTreeMap<LanguageCode, LanguageVersion>,
    /// Set by entity-level removal. Once set, every version is `Removed`.
    pub removed: bool,
    /// When the entity was first saved.
    pub created_at: Timestamp,
    /// Ordered log of all committed transitions.
    pub transitions: Vec<TransitionRecord>,
}

impl ContentEntity {
    /// Create an entity with its first language version in `Draft`.
    pub fn new(entity_type: EntityType, first_version: LanguageVersion) -> Self {
        let mut language_versions = BTreeMap::new();
        language_versions.insert(first_version.language.clone(), first_version);
        Self {
            id: EntityId::new(),
            entity_type,
            language_versions,
            removed: false,
            created_at: Timestamp::now(),
            transitions: Vec::new(),
        }
    }

    /// The version for `language`, if one exists.
    pub fn version(&self, language: &LanguageCode) -> Option<&LanguageVersion> {
        self.language_versions.get(language)
    }

    /// Whether any language version is still live (not archived or removed).
    pub fn has_live_version(&self) -> bool {
        self.language_versions.values().any(|v| v.status.is_live())
    }
}
