//! # Translation Order Coordinator
//!
//! Issues translation orders against the external vendor and funnels
//! the asynchronous completion back through the entity version store,
//! so translation-driven status changes pass the same choke point as
//! editor commands.
//!
//! ## Callback Semantics
//!
//! The vendor delivers at-least-once and out-of-order across orders.
//! The only ordering guarantee here is idempotence: a terminal order
//! swallows duplicate deliveries without re-applying transitions. A
//! target version that moved on while the vendor worked produces a
//! warning on the completed order, never an order failure.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use thiserror::Error;

use psc_core::{language_enabled, ActorId, EntityId, EntityType, LanguageCode, OrderId, Timestamp};
use psc_state::{PublishingAction, PublishingStatus};
use psc_store::{EntityVersionStore, StoreError};

use crate::order::{OrderStatus, TranslationOrder};
use crate::vendor::{VendorClient, VendorOutcome};

/// How long an outbound dispatch may take before the waiting stops.
/// The order itself is unaffected — only the local task gives up.
pub const DEFAULT_DISPATCH_TIMEOUT: Duration = Duration::from_secs(30);

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors raised by order operations.
#[derive(Error, Debug)]
pub enum OrderError {
    /// No order with this identifier exists.
    #[error("{0} not found")]
    NotFound(OrderId),

    /// An order must name at least one target language.
    #[error("translation order must name at least one target language")]
    NoTargetLanguages,

    /// The source language appeared among the targets.
    #[error("source language {0} cannot be a translation target")]
    SourceIsTarget(LanguageCode),

    /// A target language is not enabled for the entity type.
    #[error("language {language} is not enabled for {entity_type}")]
    LanguageNotEnabled {
        /// The entity type whose capability table rejected the language.
        entity_type: EntityType,
        /// The rejected target language.
        language: LanguageCode,
    },

    /// The source version is archived or removed.
    #[error("source version is {status} and cannot be translated")]
    SourceNotLive {
        /// The blocking status.
        status: PublishingStatus,
    },

    /// Orders without a subscriber contact have nowhere to report.
    #[error("subscriber contact must not be empty")]
    EmptyContact,

    /// The store rejected an operation during submission.
    #[error(transparent)]
    Store(#[from] StoreError),
}

// ─── Coordinator ─────────────────────────────────────────────────────

/// Coordinates translation orders between callers, the vendor, and the
/// entity version store.
pub struct TranslationOrderCoordinator<V: VendorClient + 'static> {
    orders: DashMap<OrderId, TranslationOrder>,
    store: Arc<EntityVersionStore>,
    vendor: Arc<V>,
    dispatch_timeout: Duration,
}

impl<V: VendorClient + 'static> TranslationOrderCoordinator<V> {
    /// Create a coordinator with the default dispatch timeout.
    pub fn new(store: Arc<EntityVersionStore>, vendor: Arc<V>) -> Self {
        Self {
            orders: DashMap::new(),
            store,
            vendor,
            dispatch_timeout: DEFAULT_DISPATCH_TIMEOUT,
        }
    }

    /// Override the dispatch timeout.
    pub fn with_dispatch_timeout(mut self, timeout: Duration) -> Self {
        self.dispatch_timeout = timeout;
        self
    }

    /// Create and dispatch a translation order.
    ///
    /// Validates the language set against the entity's capability table,
    /// creates missing target versions as `Draft` placeholders, persists
    /// the order as `Pending`, and hands it to the vendor on a separate
    /// task — the call returns as soon as the order is persisted.
    /// Dropping the caller does not retract an order the vendor already
    /// accepted; it only stops local waiting.
    ///
    /// Must be called within a tokio runtime.
    pub fn submit(
        &self,
        entity_id: EntityId,
        source_language: LanguageCode,
        target_languages: BTreeSet<LanguageCode>,
        subscriber_contact: String,
        requested_by: ActorId,
    ) -> Result<TranslationOrder, OrderError> {
        if subscriber_contact.trim().is_empty() {
            return Err(OrderError::EmptyContact);
        }
        if target_languages.is_empty() {
            return Err(OrderError::NoTargetLanguages);
        }
        if target_languages.contains(&source_language) {
            return Err(OrderError::SourceIsTarget(source_language));
        }

        let entity = self.store.get_entity(&entity_id)?;
        for language in &target_languages {
            if !language_enabled(entity.entity_type, language) {
                return Err(OrderError::LanguageNotEnabled {
                    entity_type: entity.entity_type,
                    language: language.clone(),
                });
            }
        }
        let source = self.store.get_version(&entity_id, &source_language)?;
        if !source.status.is_live() {
            return Err(OrderError::SourceNotLive {
                status: source.status,
            });
        }

        // Placeholder drafts for targets the entity does not carry yet,
        // so the callback path only ever applies transitions.
        for language in &target_languages {
            match self.store.add_language_version(
                &entity_id,
                language.clone(),
                source.display_name.clone(),
            ) {
                Ok(_) | Err(StoreError::VersionExists { .. }) => {}
                Err(err) => return Err(err.into()),
            }
        }

        let order = TranslationOrder {
            id: OrderId::new(),
            entity_id,
            source_language,
            target_languages,
            status: OrderStatus::Pending,
            subscriber_contact,
            requested_by,
            warnings: Vec::new(),
            created_at: Timestamp::now(),
            completed_at: None,
        };
        self.orders.insert(order.id, order.clone());
        self.spawn_dispatch(order.clone());
        Ok(order)
    }

    /// One order record.
    pub fn get_order(&self, order_id: &OrderId) -> Result<TranslationOrder, OrderError> {
        self.orders
            .get(order_id)
            .map(|entry| entry.value().clone())
            .ok_or(OrderError::NotFound(*order_id))
    }

    /// All order records.
    pub fn list_orders(&self) -> Vec<TranslationOrder> {
        self.orders
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// The inbound vendor callback. Idempotent: a terminal order returns
    /// unchanged no matter how often the vendor redelivers.
    ///
    /// On the first successful delivery every target language is
    /// published at its current revision; a rejected transition is
    /// recorded as a warning on the order, which still completes.
    pub fn vendor_callback(
        &self,
        order_id: &OrderId,
        outcome: VendorOutcome,
    ) -> Result<TranslationOrder, OrderError> {
        let mut entry = self
            .orders
            .get_mut(order_id)
            .ok_or(OrderError::NotFound(*order_id))?;
        if entry.status.is_terminal() {
            tracing::debug!(order_id = %entry.id, status = %entry.status, "duplicate vendor callback ignored");
            return Ok(entry.value().clone());
        }

        match outcome {
            VendorOutcome::Failure => {
                entry.status = OrderStatus::Failed;
                tracing::warn!(order_id = %entry.id, "vendor reported order failure");
            }
            VendorOutcome::Success => {
                let entity_id = entry.entity_id;
                let actor = entry.requested_by.clone();
                let targets: Vec<LanguageCode> = entry.target_languages.iter().cloned().collect();
                for language in targets {
                    let result = self
                        .store
                        .get_version(&entity_id, &language)
                        .and_then(|version| {
                            self.store.apply_transition(
                                &entity_id,
                                &language,
                                PublishingAction::Publish,
                                version.revision,
                                &actor,
                            )
                        });
                    if let Err(err) = result {
                        tracing::warn!(
                            order_id = %entry.id,
                            language = %language,
                            error = %err,
                            "translated version could not be published"
                        );
                        entry.warnings.push(format!("{language}: {err}"));
                    }
                }
                entry.status = OrderStatus::Completed;
            }
        }
        entry.completed_at = Some(Timestamp::now());
        Ok(entry.value().clone())
    }

    fn spawn_dispatch(&self, order: TranslationOrder) {
        let vendor = Arc::clone(&self.vendor);
        let timeout = self.dispatch_timeout;
        tokio::spawn(async move {
            match tokio::time::timeout(timeout, vendor.dispatch_order(&order)).await {
                Ok(Ok(())) => {
                    tracing::debug!(order_id = %order.id, "translation order dispatched");
                }
                Ok(Err(err)) => {
                    tracing::warn!(
                        order_id = %order.id,
                        error = %err,
                        "vendor dispatch failed, order stays pending"
                    );
                }
                Err(_) => {
                    tracing::warn!(
                        order_id = %order.id,
                        timeout_secs = timeout.as_secs(),
                        "vendor dispatch timed out, order stays pending"
                    );
                }
            }
        });
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
