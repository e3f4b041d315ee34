//! # Translation Orders
//!
//! A translation order asks the external vendor to produce additional
//! target-language versions of one entity. Orders are created `Pending`
//! and terminated exactly once by the vendor callback; after that they
//! are immutable.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use psc_core::{ActorId, EntityId, LanguageCode, OrderId, Timestamp};

/// The lifecycle status of a translation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Dispatched, awaiting the vendor callback.
    Pending,
    /// Vendor delivered; the order is done (terminal).
    Completed,
    /// Vendor reported failure (terminal).
    Failed,
}

impl OrderStatus {
    /// Whether this status is terminal (callback becomes a no-op).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

/// A translation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationOrder {
    /// Unique order identifier.
    pub id: OrderId,
    /// The entity being translated.
    pub entity_id: EntityId,
    /// The language translated from.
    pub source_language: LanguageCode,
    /// The languages translated into. Disjoint from the source.
    pub target_languages: BTreeSet<LanguageCode>,
    /// Current order status.
    pub status: OrderStatus,
    /// Contact notified by the vendor about order progress.
    pub subscriber_contact: String,
    /// Who requested the translation. Completion transitions are
    /// attributed to this actor.
    pub requested_by: ActorId,
    /// Per-target problems recorded at completion time. A warning does
    /// not fail the order.
    pub warnings: Vec<String>,
    /// When the order was created.
    pub created_at: Timestamp,
    /// When the order reached a terminal status.
    pub completed_at: Option<Timestamp>,
}
