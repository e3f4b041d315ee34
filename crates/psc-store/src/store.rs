//! # Entity Version Store
//!
//! The single choke point for publishing-status changes. Every mutation
//! validates against the pure transition table first, then commits with
//! optimistic concurrency against the versioned-record backend.
//!
//! ## Concurrency Model
//!
//! The caller-visible token is the *language-version* revision: a stale
//! token is rejected with [`StoreError::ConcurrencyConflict`] and never
//! retried here — re-reading and retrying is the caller's decision.
//!
//! The backend CAS operates on the whole entity record. A CAS miss whose
//! cause is a sibling-language commit (the caller's own language token
//! still matches after re-read) is re-driven internally, bounded by
//! [`MAX_CAS_ATTEMPTS`]. Writers on different languages of one entity
//! therefore never invalidate each other.
//!
//! Entity-level removal is a single CAS over the aggregate: either every
//! language version moves to `Removed` or none does.
//!
//! ## Observers
//!
//! Every commit that leaves a version dead (`Deleted` or `Removed`)
//! notifies registered [`TransitionObserver`]s before the call returns,
//! so connection records referencing the entity are re-checked within
//! the same logical operation.

use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use psc_core::{language_enabled, ActorId, EntityId, EntityType, LanguageCode, Timestamp};
use psc_state::{can_remove, target_status, PublishingAction, PublishingStatus, TransitionError};

use crate::backend::{InMemoryRecords, VersionedRecords};
use crate::version::{ContentEntity, LanguageVersion, TransitionRecord};

/// Upper bound on internal CAS re-drives caused by sibling-language
/// writers. Exhaustion surfaces as a retryable [`StoreError::Contention`]
/// instead of an unbounded loop.
pub const MAX_CAS_ATTEMPTS: usize = 8;

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors raised by store operations. Every failure leaves the stored
/// state untouched.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The requested action is illegal from the version's current status.
    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),

    /// The caller's revision token is stale.
    #[error("stale revision on {entity_id} [{language}]: expected {expected}, found {found}")]
    ConcurrencyConflict {
        /// The entity being written.
        entity_id: EntityId,
        /// The language version being written.
        language: LanguageCode,
        /// The revision the caller quoted.
        expected: u64,
        /// The revision actually stored.
        found: u64,
    },

    /// No entity with this identifier exists.
    #[error("{0} not found")]
    EntityNotFound(EntityId),

    /// The entity exists but has no version in this language.
    #[error("entity {entity_id} has no {language} version")]
    VersionNotFound {
        /// The entity.
        entity_id: EntityId,
        /// The missing language.
        language: LanguageCode,
    },

    /// A version in this language already exists.
    #[error("entity {entity_id} already has a {language} version")]
    VersionExists {
        /// The entity.
        entity_id: EntityId,
        /// The duplicate language.
        language: LanguageCode,
    },

    /// The language is not enabled for this entity type.
    #[error("language {language} is not enabled for {entity_type}")]
    LanguageNotEnabled {
        /// The entity type whose capability table rejected the language.
        entity_type: EntityType,
        /// The rejected language.
        language: LanguageCode,
    },

    /// Display names must carry content.
    #[error("display name must not be empty")]
    EmptyDisplayName,

    /// Reviews only apply to live versions.
    #[error("cannot review a {status} version")]
    ReviewIneligible {
        /// The status that blocked the review.
        status: PublishingStatus,
    },

    /// Entity-level removal found an ineligible version. Nothing changed.
    #[error("cannot remove entity {entity_id}: {language} version is {status}")]
    RemoveIneligible {
        /// The entity.
        entity_id: EntityId,
        /// The blocking language.
        language: LanguageCode,
        /// Its status.
        status: PublishingStatus,
    },

    /// Bounded CAS re-drive exhausted. Retryable.
    #[error("storage contention on {0}, retry the operation")]
    Contention(EntityId),
}

// ─── Observer Traits ─────────────────────────────────────────────────

/// Callback invoked synchronously after a commit left one or more
/// versions of an entity dead (`Deleted` or `Removed`).
pub trait TransitionObserver: Send + Sync {
    /// `entity_id` just lost at least one live version.
    fn on_dead_version(&self, entity_id: &EntityId);
}

/// An observer that records the entities it was notified about.
/// Useful in tests and for effect auditing.
#[derive(Default)]
pub struct RecordingObserver {
    /// All entity ids passed to `on_dead_version`, in order.
    pub notified: parking_lot::Mutex<Vec<EntityId>>,
}

impl TransitionObserver for RecordingObserver {
    fn on_dead_version(&self, entity_id: &EntityId) {
        self.notified.lock().push(*entity_id);
    }
}

/// Read-only liveness projection for collaborators that must not mutate
/// version records.
pub trait VersionLiveness: Send + Sync {
    /// Whether the entity has at least one live language version.
    fn has_live_version(&self, entity_id: &EntityId) -> bool;
}

// ─── Store ───────────────────────────────────────────────────────────

/// Owns the authoritative per-language version records.
pub struct EntityVersionStore {
    records: Arc<dyn VersionedRecords>,
    observers: RwLock<Vec<Arc<dyn TransitionObserver>>>,
}

impl EntityVersionStore {
    /// Create a store over the given backend.
    pub fn new(records: Arc<dyn VersionedRecords>) -> Self {
        Self {
            records,
            observers: RwLock::new(Vec::new()),
        }
    }

    /// Create a store over a fresh in-memory backend.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryRecords::new()))
    }

    /// Register an observer for dead-version notifications.
    pub fn register_observer(&self, observer: Arc<dyn TransitionObserver>) {
        self.observers.write().push(observer);
    }

    // ── Creation ─────────────────────────────────────────────────────

    /// First save of a new entity: creates it with one `Draft` version.
    pub fn create_entity(
        &self,
        entity_type: EntityType,
        language: LanguageCode,
        display_name: String,
    ) -> Result<ContentEntity, StoreError> {
        if display_name.trim().is_empty() {
            return Err(StoreError::EmptyDisplayName);
        }
        if !language_enabled(entity_type, &language) {
            return Err(StoreError::LanguageNotEnabled {
                entity_type,
                language,
            });
        }
        let entity = ContentEntity::new(entity_type, LanguageVersion::new(language, display_name));
        let id = entity.id;
        self.records
            .compare_and_swap(&id, None, entity.clone())
            .map_err(|_| StoreError::Contention(id))?;
        Ok(entity)
    }

    /// Add a new `Draft` version in a language the entity does not have yet.
    pub fn add_language_version(
        &self,
        entity_id: &EntityId,
        language: LanguageCode,
        display_name: String,
    ) -> Result<LanguageVersion, StoreError> {
        if display_name.trim().is_empty() {
            return Err(StoreError::EmptyDisplayName);
        }
        for _ in 0..MAX_CAS_ATTEMPTS {
            let (mut entity, record_rev) = self
                .records
                .read(entity_id)
                .ok_or(StoreError::EntityNotFound(*entity_id))?;
            if !language_enabled(entity.entity_type, &language) {
                return Err(StoreError::LanguageNotEnabled {
                    entity_type: entity.entity_type,
                    language,
                });
            }
            if entity.language_versions.contains_key(&language) {
                return Err(StoreError::VersionExists {
                    entity_id: *entity_id,
                    language,
                });
            }
            let version = LanguageVersion::new(language.clone(), display_name.clone());
            entity
                .language_versions
                .insert(language.clone(), version.clone());
            if self
                .records
                .compare_and_swap(entity_id, Some(record_rev), entity)
                .is_ok()
            {
                return Ok(version);
            }
        }
        Err(StoreError::Contention(*entity_id))
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// The whole entity record.
    pub fn get_entity(&self, entity_id: &EntityId) -> Result<ContentEntity, StoreError> {
        self.records
            .read(entity_id)
            .map(|(entity, _)| entity)
            .ok_or(StoreError::EntityNotFound(*entity_id))
    }

    /// One language version of an entity.
    pub fn get_version(
        &self,
        entity_id: &EntityId,
        language: &LanguageCode,
    ) -> Result<LanguageVersion, StoreError> {
        let entity = self.get_entity(entity_id)?;
        entity
            .version(language)
            .cloned()
            .ok_or_else(|| StoreError::VersionNotFound {
                entity_id: *entity_id,
                language: language.clone(),
            })
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Apply a lifecycle action to one language version.
    ///
    /// Legality is checked against the transition table before anything
    /// is touched; a stale `expected_revision` is rejected without
    /// retry. On success the committed version (revision bumped, the
    /// relevant timestamp stamped) is returned.
    pub fn apply_transition(
        &self,
        entity_id: &EntityId,
        language: &LanguageCode,
        action: PublishingAction,
        expected_revision: u64,
        actor: &ActorId,
    ) -> Result<LanguageVersion, StoreError> {
        self.commit_transition(entity_id, language, action, expected_revision, actor, None)
    }

    /// Save new content on a version (the `Edit` action): a published
    /// version gains unpublished edits and moves to `Modified`.
    pub fn save_content(
        &self,
        entity_id: &EntityId,
        language: &LanguageCode,
        display_name: String,
        expected_revision: u64,
        actor: &ActorId,
    ) -> Result<LanguageVersion, StoreError> {
        if display_name.trim().is_empty() {
            return Err(StoreError::EmptyDisplayName);
        }
        self.commit_transition(
            entity_id,
            language,
            PublishingAction::Edit,
            expected_revision,
            actor,
            Some(display_name),
        )
    }

    /// Record a review on a live version. No status change; the revision
    /// still advances so concurrent editors notice.
    pub fn record_review(
        &self,
        entity_id: &EntityId,
        language: &LanguageCode,
        reviewer: &ActorId,
        expected_revision: u64,
    ) -> Result<LanguageVersion, StoreError> {
        for _ in 0..MAX_CAS_ATTEMPTS {
            let (mut entity, record_rev) = self
                .records
                .read(entity_id)
                .ok_or(StoreError::EntityNotFound(*entity_id))?;
            let Some(version) = entity.language_versions.get_mut(language) else {
                return Err(StoreError::VersionNotFound {
                    entity_id: *entity_id,
                    language: language.clone(),
                });
            };
            if !version.status.is_live() {
                return Err(StoreError::ReviewIneligible {
                    status: version.status,
                });
            }
            if version.revision != expected_revision {
                return Err(StoreError::ConcurrencyConflict {
                    entity_id: *entity_id,
                    language: language.clone(),
                    expected: expected_revision,
                    found: version.revision,
                });
            }
            version.reviewed_at = Some(Timestamp::now());
            version.reviewed_by = Some(reviewer.clone());
            version.revision += 1;
            let committed = version.clone();
            if self
                .records
                .compare_and_swap(entity_id, Some(record_rev), entity)
                .is_ok()
            {
                return Ok(committed);
            }
        }
        Err(StoreError::Contention(*entity_id))
    }

    /// Remove the whole entity: every language version moves to the
    /// terminal `Removed` status in one compare-and-swap. If any version
    /// is ineligible, nothing changes.
    pub fn remove_entity(
        &self,
        entity_id: &EntityId,
        actor: &ActorId,
    ) -> Result<ContentEntity, StoreError> {
        for _ in 0..MAX_CAS_ATTEMPTS {
            let (mut entity, record_rev) = self
                .records
                .read(entity_id)
                .ok_or(StoreError::EntityNotFound(*entity_id))?;
            for (language, version) in &entity.language_versions {
                if !can_remove(version.status) {
                    return Err(StoreError::RemoveIneligible {
                        entity_id: *entity_id,
                        language: language.clone(),
                        status: version.status,
                    });
                }
            }
            let now = Timestamp::now();
            let mut records = Vec::with_capacity(entity.language_versions.len());
            for (language, version) in entity.language_versions.iter_mut() {
                records.push(TransitionRecord {
                    language: language.clone(),
                    from_status: version.status,
                    to_status: PublishingStatus::Removed,
                    actor: actor.clone(),
                    at: now,
                });
                version.status = PublishingStatus::Removed;
                version.revision += 1;
            }
            entity.transitions.extend(records);
            entity.removed = true;
            let committed = entity.clone();
            if self
                .records
                .compare_and_swap(entity_id, Some(record_rev), entity)
                .is_ok()
            {
                self.notify_dead(entity_id);
                return Ok(committed);
            }
        }
        Err(StoreError::Contention(*entity_id))
    }

    // ── Internals ────────────────────────────────────────────────────

    fn commit_transition(
        &self,
        entity_id: &EntityId,
        language: &LanguageCode,
        action: PublishingAction,
        expected_revision: u64,
        actor: &ActorId,
        new_display_name: Option<String>,
    ) -> Result<LanguageVersion, StoreError> {
        for _ in 0..MAX_CAS_ATTEMPTS {
            let (mut entity, record_rev) = self
                .records
                .read(entity_id)
                .ok_or(StoreError::EntityNotFound(*entity_id))?;
            let Some(version) = entity.language_versions.get_mut(language) else {
                return Err(StoreError::VersionNotFound {
                    entity_id: *entity_id,
                    language: language.clone(),
                });
            };

            // Transition table first: an illegal action is rejected
            // before the revision is even looked at.
            let from = version.status;
            let to = target_status(action, from)?;

            if version.revision != expected_revision {
                return Err(StoreError::ConcurrencyConflict {
                    entity_id: *entity_id,
                    language: language.clone(),
                    expected: expected_revision,
                    found: version.revision,
                });
            }

            let now = Timestamp::now();
            version.status = to;
            version.revision += 1;
            match action {
                PublishingAction::Publish => version.published_at = Some(now),
                PublishingAction::Archive => version.archived_at = Some(now),
                _ => {}
            }
            if let Some(name) = new_display_name.clone() {
                version.display_name = name;
            }
            let committed = version.clone();
            entity.transitions.push(TransitionRecord {
                language: language.clone(),
                from_status: from,
                to_status: to,
                actor: actor.clone(),
                at: now,
            });

            if self
                .records
                .compare_and_swap(entity_id, Some(record_rev), entity)
                .is_ok()
            {
                // The caller's token matched, so a record-level miss can
                // only mean a sibling-language commit; re-read and retry.
                if !to.is_live() {
                    self.notify_dead(entity_id);
                }
                return Ok(committed);
            }
        }
        Err(StoreError::Contention(*entity_id))
    }

    fn notify_dead(&self, entity_id: &EntityId) {
        let observers: Vec<Arc<dyn TransitionObserver>> = self.observers.read().clone();
        for observer in observers {
            observer.on_dead_version(entity_id);
        }
    }
}

impl VersionLiveness for EntityVersionStore {
    fn has_live_version(&self, entity_id: &EntityId) -> bool {
        self.records
            .read(entity_id)
            .map(|(entity, _)| entity.has_live_version())
            .unwrap_or(false)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn fi() -> LanguageCode {
        LanguageCode::new("fi").unwrap()
    }

    fn sv() -> LanguageCode {
        LanguageCode::new("sv").unwrap()
    }

    fn editor() -> ActorId {
        ActorId::new("editor-1")
    }

    fn make_service(store: &EntityVersionStore) -> ContentEntity {
        store
            .create_entity(EntityType::Service, fi(), "Passihakemus".to_string())
            .unwrap()
    }

    /// Drive the fi version of a fresh service to `Published`.
    fn make_published_service(store: &EntityVersionStore) -> ContentEntity {
        let entity = make_service(store);
        store
            .apply_transition(&entity.id, &fi(), PublishingAction::Publish, 1, &editor())
            .unwrap();
        store.get_entity(&entity.id).unwrap()
    }

    // ── Creation ─────────────────────────────────────────────────────

    #[test]
    fn test_create_entity_starts_in_draft() {
        let store = EntityVersionStore::in_memory();
        let entity = make_service(&store);
        let version = store.get_version(&entity.id, &fi()).unwrap();
        assert_eq!(version.status, PublishingStatus::Draft);
        assert_eq!(version.revision, 1);
    }

    #[test]
    fn test_create_entity_rejects_disabled_language() {
        let store = EntityVersionStore::in_memory();
        let smn = LanguageCode::new("smn").unwrap();
        let result = store.create_entity(EntityType::Organization, smn, "Orgaano".to_string());
        assert!(matches!(result, Err(StoreError::LanguageNotEnabled { .. })));
    }

    #[test]
    fn test_create_entity_rejects_empty_name() {
        let store = EntityVersionStore::in_memory();
        let result = store.create_entity(EntityType::Service, fi(), "   ".to_string());
        assert!(matches!(result, Err(StoreError::EmptyDisplayName)));
    }

    #[test]
    fn test_add_language_version() {
        let store = EntityVersionStore::in_memory();
        let entity = make_service(&store);
        let version = store
            .add_language_version(&entity.id, sv(), "Passansökan".to_string())
            .unwrap();
        assert_eq!(version.status, PublishingStatus::Draft);
        assert_eq!(store.get_entity(&entity.id).unwrap().language_versions.len(), 2);
    }

    #[test]
    fn test_add_duplicate_language_rejected() {
        let store = EntityVersionStore::in_memory();
        let entity = make_service(&store);
        let result = store.add_language_version(&entity.id, fi(), "Toinen".to_string());
        assert!(matches!(result, Err(StoreError::VersionExists { .. })));
    }

    // ── Transitions ──────────────────────────────────────────────────

    #[test]
    fn test_publish_stamps_published_at() {
        let store = EntityVersionStore::in_memory();
        let entity = make_service(&store);
        let version = store
            .apply_transition(&entity.id, &fi(), PublishingAction::Publish, 1, &editor())
            .unwrap();
        assert_eq!(version.status, PublishingStatus::Published);
        assert_eq!(version.revision, 2);
        assert!(version.published_at.is_some());
    }

    #[test]
    fn test_archive_stamps_archived_at() {
        let store = EntityVersionStore::in_memory();
        let entity = make_published_service(&store);
        let version = store
            .apply_transition(&entity.id, &fi(), PublishingAction::Archive, 2, &editor())
            .unwrap();
        assert_eq!(version.status, PublishingStatus::Deleted);
        assert!(version.archived_at.is_some());
    }

    #[test]
    fn test_stale_revision_rejected_without_mutation() {
        let store = EntityVersionStore::in_memory();
        let entity = make_service(&store);
        store
            .apply_transition(&entity.id, &fi(), PublishingAction::Publish, 1, &editor())
            .unwrap();
        // Replay with the consumed token.
        let err = store
            .apply_transition(&entity.id, &fi(), PublishingAction::Publish, 1, &editor())
            .unwrap_err();
        match err {
            StoreError::ConcurrencyConflict { expected, found, .. } => {
                assert_eq!(expected, 1);
                assert_eq!(found, 2);
            }
            other => panic!("expected ConcurrencyConflict, got: {other}"),
        }
        // No double effect.
        let version = store.get_version(&entity.id, &fi()).unwrap();
        assert_eq!(version.revision, 2);
    }

    #[test]
    fn test_illegal_action_rejected_without_mutation() {
        let store = EntityVersionStore::in_memory();
        let entity = make_published_service(&store);
        // Withdraw twice: the second starts from OldPublished and fails.
        store
            .apply_transition(&entity.id, &fi(), PublishingAction::Withdraw, 2, &editor())
            .unwrap();
        let err = store
            .apply_transition(&entity.id, &fi(), PublishingAction::Withdraw, 3, &editor())
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidTransition(_)));
        let version = store.get_version(&entity.id, &fi()).unwrap();
        assert_eq!(version.status, PublishingStatus::OldPublished);
        assert_eq!(version.revision, 3);
    }

    #[test]
    fn test_archived_published_version_cannot_be_restored() {
        let store = EntityVersionStore::in_memory();
        let entity = make_published_service(&store);
        store
            .apply_transition(&entity.id, &fi(), PublishingAction::Archive, 2, &editor())
            .unwrap();
        let err = store
            .apply_transition(&entity.id, &fi(), PublishingAction::Restore, 3, &editor())
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidTransition(_)));
    }

    #[test]
    fn test_restore_keeps_draft_and_advances_revision() {
        let store = EntityVersionStore::in_memory();
        let entity = make_service(&store);
        let version = store
            .apply_transition(&entity.id, &fi(), PublishingAction::Restore, 1, &editor())
            .unwrap();
        assert_eq!(version.status, PublishingStatus::Draft);
        assert_eq!(version.revision, 2);
    }

    #[test]
    fn test_save_content_on_published_marks_modified() {
        let store = EntityVersionStore::in_memory();
        let entity = make_published_service(&store);
        let version = store
            .save_content(&entity.id, &fi(), "Passihakemus (uusi)".to_string(), 2, &editor())
            .unwrap();
        assert_eq!(version.status, PublishingStatus::Modified);
        assert_eq!(version.display_name, "Passihakemus (uusi)");
    }

    #[test]
    fn test_sibling_language_tokens_are_independent() {
        let store = EntityVersionStore::in_memory();
        let entity = make_service(&store);
        store
            .add_language_version(&entity.id, sv(), "Passansökan".to_string())
            .unwrap();
        // Both languages sit at revision 1; committing fi does not
        // invalidate the sv token.
        store
            .apply_transition(&entity.id, &fi(), PublishingAction::Publish, 1, &editor())
            .unwrap();
        let version = store
            .apply_transition(&entity.id, &sv(), PublishingAction::Publish, 1, &editor())
            .unwrap();
        assert_eq!(version.status, PublishingStatus::Published);
    }

    #[test]
    fn test_transition_log_records_actor_and_statuses() {
        let store = EntityVersionStore::in_memory();
        let entity = make_published_service(&store);
        let log = store.get_entity(&entity.id).unwrap().transitions;
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].from_status, PublishingStatus::Draft);
        assert_eq!(log[0].to_status, PublishingStatus::Published);
        assert_eq!(log[0].actor, editor());
    }

    // ── Review ───────────────────────────────────────────────────────

    #[test]
    fn test_record_review_stamps_reviewer() {
        let store = EntityVersionStore::in_memory();
        let entity = make_service(&store);
        let reviewer = ActorId::new("reviewer-9");
        let version = store
            .record_review(&entity.id, &fi(), &reviewer, 1)
            .unwrap();
        assert_eq!(version.reviewed_by, Some(reviewer));
        assert!(version.reviewed_at.is_some());
        assert_eq!(version.revision, 2);
        assert_eq!(version.status, PublishingStatus::Draft);
    }

    #[test]
    fn test_review_rejected_on_archived_version() {
        let store = EntityVersionStore::in_memory();
        let entity = make_service(&store);
        store
            .apply_transition(&entity.id, &fi(), PublishingAction::Archive, 1, &editor())
            .unwrap();
        let err = store
            .record_review(&entity.id, &fi(), &editor(), 2)
            .unwrap_err();
        assert!(matches!(err, StoreError::ReviewIneligible { .. }));
    }

    // ── Entity-level removal ─────────────────────────────────────────

    #[test]
    fn test_remove_entity_is_all_or_nothing() {
        let store = EntityVersionStore::in_memory();
        let entity = make_published_service(&store);
        // fi: Published → Modified (eligible), sv: Published (ineligible).
        store
            .save_content(&entity.id, &fi(), "Muokattu".to_string(), 2, &editor())
            .unwrap();
        store
            .add_language_version(&entity.id, sv(), "Passansökan".to_string())
            .unwrap();
        store
            .apply_transition(&entity.id, &sv(), PublishingAction::Publish, 1, &editor())
            .unwrap();

        let err = store.remove_entity(&entity.id, &editor()).unwrap_err();
        match err {
            StoreError::RemoveIneligible { language, status, .. } => {
                assert_eq!(language, sv());
                assert_eq!(status, PublishingStatus::Published);
            }
            other => panic!("expected RemoveIneligible, got: {other}"),
        }
        // Neither version changed.
        let after = store.get_entity(&entity.id).unwrap();
        assert!(!after.removed);
        assert_eq!(after.version(&fi()).unwrap().status, PublishingStatus::Modified);
        assert_eq!(after.version(&sv()).unwrap().status, PublishingStatus::Published);
    }

    #[test]
    fn test_remove_entity_removes_every_version() {
        let store = EntityVersionStore::in_memory();
        let entity = make_published_service(&store);
        store
            .save_content(&entity.id, &fi(), "Muokattu".to_string(), 2, &editor())
            .unwrap();
        store
            .add_language_version(&entity.id, sv(), "Passansökan".to_string())
            .unwrap();
        store
            .apply_transition(&entity.id, &sv(), PublishingAction::Archive, 1, &editor())
            .unwrap();

        let removed = store.remove_entity(&entity.id, &editor()).unwrap();
        assert!(removed.removed);
        for version in removed.language_versions.values() {
            assert_eq!(version.status, PublishingStatus::Removed);
        }
        // Terminal: nothing further is legal.
        let fi_rev = removed.version(&fi()).unwrap().revision;
        let err = store
            .apply_transition(&entity.id, &fi(), PublishingAction::Restore, fi_rev, &editor())
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidTransition(_)));
    }

    #[test]
    fn test_remove_removed_entity_fails() {
        let store = EntityVersionStore::in_memory();
        let entity = make_service(&store);
        store
            .apply_transition(&entity.id, &fi(), PublishingAction::Archive, 1, &editor())
            .unwrap();
        store.remove_entity(&entity.id, &editor()).unwrap();
        let err = store.remove_entity(&entity.id, &editor()).unwrap_err();
        assert!(matches!(err, StoreError::RemoveIneligible { .. }));
    }

    // ── Observers ────────────────────────────────────────────────────

    #[test]
    fn test_archive_notifies_observers() {
        let store = EntityVersionStore::in_memory();
        let observer = Arc::new(RecordingObserver::default());
        store.register_observer(observer.clone());
        let entity = make_service(&store);
        store
            .apply_transition(&entity.id, &fi(), PublishingAction::Archive, 1, &editor())
            .unwrap();
        assert_eq!(observer.notified.lock().as_slice(), &[entity.id]);
    }

    #[test]
    fn test_publish_does_not_notify_observers() {
        let store = EntityVersionStore::in_memory();
        let observer = Arc::new(RecordingObserver::default());
        store.register_observer(observer.clone());
        let entity = make_service(&store);
        store
            .apply_transition(&entity.id, &fi(), PublishingAction::Publish, 1, &editor())
            .unwrap();
        assert!(observer.notified.lock().is_empty());
    }

    #[test]
    fn test_remove_notifies_observers() {
        let store = EntityVersionStore::in_memory();
        let observer = Arc::new(RecordingObserver::default());
        store.register_observer(observer.clone());
        let entity = make_service(&store);
        store
            .apply_transition(&entity.id, &fi(), PublishingAction::Archive, 1, &editor())
            .unwrap();
        store.remove_entity(&entity.id, &editor()).unwrap();
        assert_eq!(observer.notified.lock().len(), 2);
    }

    // ── Liveness projection ──────────────────────────────────────────

    #[test]
    fn test_liveness_tracks_dead_versions() {
        let store = EntityVersionStore::in_memory();
        let entity = make_service(&store);
        assert!(store.has_live_version(&entity.id));
        store
            .apply_transition(&entity.id, &fi(), PublishingAction::Archive, 1, &editor())
            .unwrap();
        assert!(!store.has_live_version(&entity.id));
        assert!(!store.has_live_version(&EntityId::new()));
    }
}
