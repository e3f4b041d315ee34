//! # psc-connections — Connection Consistency Engine
//!
//! Links services to channels and keeps those links consistent with the
//! publishing lifecycle of their endpoints:
//!
//! - **Connection records** ([`connection`]): the link itself, its type
//!   (with the retired `CommonFor` value unrepresentable), organization
//!   scope, and validity window.
//!
//! - **Opening hours** ([`hours`]): schedule overrides with the
//!   Exceptional > Special > Normal precedence and write-time rejection
//!   of same-kind overlaps.
//!
//! - **Engine** ([`engine`]): creation against live endpoints only,
//!   explicit dissolution, synchronous re-validation when an endpoint
//!   loses its last live version, and per-date schedule resolution.
//!
//! ## Crate Policy
//!
//! - The engine never mutates version records; it reads liveness through
//!   the store's read-only projection.
//! - Stale connections are flagged, never deleted — history stays
//!   inspectable.

pub mod connection;
pub mod engine;
pub mod hours;

pub use connection::{
    Connection, ConnectionType, ConnectionTypeError, OrganizationScope, ValidityWindow,
};
pub use engine::{ConnectionConsistencyEngine, ConnectionError, CreateConnectionRequest};
pub use hours::{
    resolve_effective_hours, validate_overrides, DateInterval, DayHours, DayOfWeekMask,
    HoursError, OpeningHoursOverride, OverrideKind, TimeSpan,
};
