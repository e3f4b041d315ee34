//! # Connection Consistency Engine
//!
//! Owns the connection registry and keeps it honest against the version
//! store: a connection is only created between endpoints that still have
//! a live language version, and when an entity loses its last live
//! version the engine re-checks every connection touching it.
//!
//! Re-validation runs synchronously inside the store call that removed
//! the version (the engine is registered as a [`TransitionObserver`]),
//! so no read can observe a connection silently referencing an entity
//! whose death went unprocessed.

use std::sync::Arc;

use chrono::NaiveDate;
use dashmap::DashMap;
use thiserror::Error;

use psc_core::{ActorId, ConnectionId, EntityId, Timestamp};
use psc_store::{TransitionObserver, VersionLiveness};

use crate::connection::{Connection, ConnectionType, OrganizationScope, ValidityWindow};
use crate::hours::{
    resolve_effective_hours, validate_overrides, DayHours, HoursError, OpeningHoursOverride,
};

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors raised by connection operations. No failure creates a partial
/// connection.
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// No connection with this identifier exists.
    #[error("{0} not found")]
    NotFound(ConnectionId),

    /// An endpoint has no live language version.
    #[error("entity {0} has no live language version")]
    EndpointIneligible(EntityId),

    /// Validity window with start after end.
    #[error("validity window starts {start} after it ends {end}")]
    InvalidValidityWindow {
        /// The start instant.
        start: Timestamp,
        /// The end instant.
        end: Timestamp,
    },

    /// Opening-hours override set failed validation.
    #[error(transparent)]
    Hours(#[from] HoursError),
}

// ─── Requests ────────────────────────────────────────────────────────

/// Everything needed to create a connection.
#[derive(Debug, Clone)]
pub struct CreateConnectionRequest {
    /// The service end.
    pub service_id: EntityId,
    /// The channel end.
    pub channel_id: EntityId,
    /// Breadth of the connection.
    pub connection_type: ConnectionType,
    /// Organization the connection applies to.
    pub organization_scope: OrganizationScope,
    /// Optional temporal bounds.
    pub validity: Option<ValidityWindow>,
    /// Initial opening-hours overrides.
    pub hours_overrides: Vec<OpeningHoursOverride>,
    /// Who is creating the connection.
    pub actor: ActorId,
}

// ─── Engine ──────────────────────────────────────────────────────────

/// Owns service↔channel connection records.
pub struct ConnectionConsistencyEngine {
    connections: DashMap<ConnectionId, Connection>,
    liveness: Arc<dyn VersionLiveness>,
}

impl ConnectionConsistencyEngine {
    /// Create an engine that checks endpoint liveness through `liveness`.
    pub fn new(liveness: Arc<dyn VersionLiveness>) -> Self {
        Self {
            connections: DashMap::new(),
            liveness,
        }
    }

    /// Create a connection after validating both endpoints and the
    /// attached schedule.
    pub fn create_connection(
        &self,
        request: CreateConnectionRequest,
    ) -> Result<Connection, ConnectionError> {
        if let Some(ValidityWindow {
            start: Some(start),
            end: Some(end),
        }) = request.validity
        {
            if start > end {
                return Err(ConnectionError::InvalidValidityWindow { start, end });
            }
        }
        validate_overrides(&request.hours_overrides)?;
        if !self.liveness.has_live_version(&request.service_id) {
            return Err(ConnectionError::EndpointIneligible(request.service_id));
        }
        if !self.liveness.has_live_version(&request.channel_id) {
            return Err(ConnectionError::EndpointIneligible(request.channel_id));
        }

        let connection = Connection {
            id: ConnectionId::new(),
            service_id: request.service_id,
            channel_id: request.channel_id,
            connection_type: request.connection_type,
            organization_scope: request.organization_scope,
            validity: request.validity,
            hours_overrides: request.hours_overrides,
            stale: false,
            stale_since: None,
            created_at: Timestamp::now(),
            created_by: request.actor,
        };
        self.connections.insert(connection.id, connection.clone());
        Ok(connection)
    }

    /// Replace the opening-hours overrides of a connection. The full
    /// replacement set is validated before anything changes.
    pub fn update_opening_hours(
        &self,
        connection_id: &ConnectionId,
        overrides: Vec<OpeningHoursOverride>,
    ) -> Result<Connection, ConnectionError> {
        validate_overrides(&overrides)?;
        let mut entry = self
            .connections
            .get_mut(connection_id)
            .ok_or(ConnectionError::NotFound(*connection_id))?;
        entry.hours_overrides = overrides;
        Ok(entry.value().clone())
    }

    /// Dissolve a connection (explicit user action).
    pub fn dissolve_connection(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Connection, ConnectionError> {
        self.connections
            .remove(connection_id)
            .map(|(_, connection)| connection)
            .ok_or(ConnectionError::NotFound(*connection_id))
    }

    /// One connection record.
    pub fn get_connection(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Connection, ConnectionError> {
        self.connections
            .get(connection_id)
            .map(|entry| entry.value().clone())
            .ok_or(ConnectionError::NotFound(*connection_id))
    }

    /// All connection records, stale ones included.
    pub fn list_connections(&self) -> Vec<Connection> {
        self.connections
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// All connections referencing `entity_id` on either end.
    pub fn connections_for(&self, entity_id: &EntityId) -> Vec<Connection> {
        self.connections
            .iter()
            .filter(|entry| entry.value().references(entity_id))
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Re-check every connection touching `entity_id`: those whose both
    /// endpoints are now dead are flagged stale. Returns how many were
    /// flagged. Flagged connections are kept, not deleted.
    pub fn revalidate(&self, entity_id: &EntityId) -> usize {
        let now = Timestamp::now();
        let mut flagged = 0;
        for mut entry in self.connections.iter_mut() {
            if entry.stale || !entry.references(entity_id) {
                continue;
            }
            let service_live = self.liveness.has_live_version(&entry.service_id);
            let channel_live = self.liveness.has_live_version(&entry.channel_id);
            if !service_live && !channel_live {
                entry.stale = true;
                entry.stale_since = Some(now);
                flagged += 1;
            }
        }
        flagged
    }

    /// The effective schedule of a connection on `date`.
    pub fn resolve_effective_hours(
        &self,
        connection_id: &ConnectionId,
        date: NaiveDate,
    ) -> Result<DayHours, ConnectionError> {
        let entry = self
            .connections
            .get(connection_id)
            .ok_or(ConnectionError::NotFound(*connection_id))?;
        Ok(resolve_effective_hours(&entry.hours_overrides, date))
    }
}

impl TransitionObserver for ConnectionConsistencyEngine {
    fn on_dead_version(&self, entity_id: &EntityId) {
        self.revalidate(entity_id);
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
