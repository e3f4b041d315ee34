//! # Connection Records
//!
//! A connection links one service to one channel, scoped to an
//! organization, optionally bounded in time, and carrying its own
//! opening-hours overrides. Connections are created and dissolved by
//! explicit user action only — nothing auto-creates them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use psc_core::{ActorId, ConnectionId, EntityId, Timestamp};

use crate::hours::OpeningHoursOverride;

// ─── Connection Type ─────────────────────────────────────────────────

/// How broadly a channel serves the connected service.
///
/// A closed enum: the retired `CommonFor` value from the legacy data
/// model has no variant and cannot re-enter the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnectionType {
    /// The channel serves the service for every organization.
    CommonForAll,
    /// The channel serves the service for the owning organization only.
    NotCommon,
}

impl std::fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::CommonForAll => "CommonForAll",
            Self::NotCommon => "NotCommon",
        };
        f.write_str(s)
    }
}

/// Failure to parse a connection type string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionTypeError {
    /// The legacy value, rejected by name so callers get a useful hint.
    #[error("connection type \"CommonFor\" was retired; use \"CommonForAll\" or \"NotCommon\"")]
    LegacyCommonFor,

    /// Anything else unknown.
    #[error("unknown connection type {0:?}")]
    Unknown(String),
}

impl std::str::FromStr for ConnectionType {
    type Err = ConnectionTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CommonForAll" => Ok(Self::CommonForAll),
            "NotCommon" => Ok(Self::NotCommon),
            "CommonFor" => Err(ConnectionTypeError::LegacyCommonFor),
            other => Err(ConnectionTypeError::Unknown(other.to_string())),
        }
    }
}

// ─── Organization Scope ──────────────────────────────────────────────

/// Which organization the connection applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrganizationScope {
    /// Any organization.
    Any,
    /// One specific organization.
    Organization(EntityId),
}

// ─── Validity Window ─────────────────────────────────────────────────

/// Optional temporal bounds on a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityWindow {
    /// When the connection takes effect. `None` = immediately.
    pub start: Option<Timestamp>,
    /// When it lapses. `None` = open-ended.
    pub end: Option<Timestamp>,
}

// ─── Connection ──────────────────────────────────────────────────────

/// A service↔channel connection record.
///
/// `stale` is a soft flag set when both endpoints lost their last live
/// language version. Stale connections stay in the registry so history
/// remains inspectable; they are never silently dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// Unique connection identifier.
    pub id: ConnectionId,
    /// The connected service.
    pub service_id: EntityId,
    /// The connected channel.
    pub channel_id: EntityId,
    /// Breadth of the connection.
    pub connection_type: ConnectionType,
    /// Organization the connection applies to.
    pub organization_scope: OrganizationScope,
    /// Optional temporal bounds.
    pub validity: Option<ValidityWindow>,
    /// Opening-hours overrides, validated as a set at write time.
    pub hours_overrides: Vec<OpeningHoursOverride>,
    /// Whether both endpoints are dead.
    pub stale: bool,
    /// When the connection went stale.
    pub stale_since: Option<Timestamp>,
    /// When the connection was created.
    pub created_at: Timestamp,
    /// Who created it.
    pub created_by: ActorId,
}

impl Connection {
    /// Whether the connection references `entity_id` on either end.
    pub fn references(&self, entity_id: &EntityId) -> bool {
        self.service_id == *entity_id || self.channel_id == *entity_id
    }
}
