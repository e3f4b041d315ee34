//! # Connection Workbench Routes
//!
//! REST endpoints for the service↔channel connection workbench:
//! creation against live endpoints, schedule override management,
//! per-date effective-hours resolution, and explicit dissolution.
//!
//! ## Endpoints
//!
//! - `POST   /v1/connections`                                — Create a connection
//! - `GET    /v1/connections`                                — List connections (stale included)
//! - `GET    /v1/connections/{connection_id}`                — Connection details
//! - `PUT    /v1/connections/{connection_id}/hours`          — Replace opening-hours overrides
//! - `GET    /v1/connections/{connection_id}/effective-hours` — Resolve schedule for a date
//! - `DELETE /v1/connections/{connection_id}`                — Dissolve

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use psc_connections::{
    Connection, ConnectionType, CreateConnectionRequest, DayHours, OpeningHoursOverride,
    OrganizationScope, ValidityWindow,
};
use psc_core::{ActorId, ConnectionId, EntityId, Timestamp};

use crate::error::AppError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request to create a connection.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateConnectionBody {
    /// The service end.
    pub service_id: Uuid,
    /// The channel end.
    pub channel_id: Uuid,
    /// Connection type. One of: "CommonForAll", "NotCommon". The retired
    /// "CommonFor" value is rejected by name.
    pub connection_type: String,
    /// Scope the connection to one organization. Absent = any.
    #[serde(default)]
    pub organization_id: Option<Uuid>,
    /// Validity start (ISO8601, UTC). Absent = immediately.
    #[serde(default)]
    pub valid_from: Option<String>,
    /// Validity end (ISO8601, UTC). Absent = open-ended.
    #[serde(default)]
    pub valid_until: Option<String>,
    /// Initial opening-hours overrides.
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub hours_overrides: Vec<OpeningHoursOverride>,
    /// The already-authorized actor creating the connection.
    pub actor: String,
}

/// Request to replace a connection's opening-hours overrides.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateHoursBody {
    /// The full replacement override set.
    #[schema(value_type = Vec<Object>)]
    pub overrides: Vec<OpeningHoursOverride>,
}

/// Query parameters for effective-hours resolution.
#[derive(Debug, Deserialize)]
pub struct EffectiveHoursQuery {
    /// The calendar date to resolve (e.g. `2024-12-24`).
    pub date: NaiveDate,
}

/// A connection record.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConnectionResponse {
    /// Connection identifier.
    pub id: Uuid,
    /// The service end.
    pub service_id: Uuid,
    /// The channel end.
    pub channel_id: Uuid,
    /// Connection type.
    pub connection_type: String,
    /// Organization scope. Absent = any.
    pub organization_id: Option<Uuid>,
    /// Validity start (ISO8601, UTC).
    pub valid_from: Option<String>,
    /// Validity end (ISO8601, UTC).
    pub valid_until: Option<String>,
    /// Opening-hours overrides.
    #[schema(value_type = Vec<Object>)]
    pub hours_overrides: Vec<OpeningHoursOverride>,
    /// Whether both endpoints are dead.
    pub stale: bool,
    /// When the connection went stale (ISO8601, UTC).
    pub stale_since: Option<String>,
    /// Creation instant (ISO8601, UTC).
    pub created_at: String,
    /// Who created the connection.
    pub created_by: String,
}

impl ConnectionResponse {
    fn from_connection(connection: &Connection) -> Self {
        let (valid_from, valid_until) = match &connection.validity {
            Some(window) => (
                window.start.map(|ts| ts.to_iso8601()),
                window.end.map(|ts| ts.to_iso8601()),
            ),
            None => (None, None),
        };
        let organization_id = match connection.organization_scope {
            OrganizationScope::Any => None,
            OrganizationScope::Organization(id) => Some(*id.as_uuid()),
        };
        Self {
            id: *connection.id.as_uuid(),
            service_id: *connection.service_id.as_uuid(),
            channel_id: *connection.channel_id.as_uuid(),
            connection_type: connection.connection_type.to_string(),
            organization_id,
            valid_from,
            valid_until,
            hours_overrides: connection.hours_overrides.clone(),
            stale: connection.stale,
            stale_since: connection.stale_since.map(|ts| ts.to_iso8601()),
            created_at: connection.created_at.to_iso8601(),
            created_by: connection.created_by.to_string(),
        }
    }
}

/// Connection list response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConnectionListResponse {
    /// All connection records, stale ones included.
    pub connections: Vec<ConnectionResponse>,
    /// Total number of connections.
    pub total: usize,
}

/// One open interval of an effective schedule.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OpenSpanBody {
    /// Opening time (HH:MM:SS).
    pub opens: String,
    /// Closing time (HH:MM:SS).
    pub closes: String,
}

/// The effective schedule of a connection on one date.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EffectiveHoursResponse {
    /// The resolved date.
    pub date: String,
    /// Whether the connection is closed for the whole day.
    pub closed: bool,
    /// Open intervals, empty when closed.
    pub open_spans: Vec<OpenSpanBody>,
}

impl EffectiveHoursResponse {
    fn from_hours(date: NaiveDate, hours: DayHours) -> Self {
        match hours {
            DayHours::Closed => Self {
                date: date.to_string(),
                closed: true,
                open_spans: Vec::new(),
            },
            DayHours::Open(spans) => Self {
                date: date.to_string(),
                closed: false,
                open_spans: spans
                    .iter()
                    .map(|span| OpenSpanBody {
                        opens: span.opens.to_string(),
                        closes: span.closes.to_string(),
                    })
                    .collect(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the connection workbench router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/connections", post(create_connection).get(list_connections))
        .route(
            "/v1/connections/{connection_id}",
            get(get_connection).delete(dissolve_connection),
        )
        .route("/v1/connections/{connection_id}/hours", put(update_hours))
        .route(
            "/v1/connections/{connection_id}/effective-hours",
            get(effective_hours),
        )
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/connections — Create a connection.
#[utoipa::path(
    post,
    path = "/v1/connections",
    request_body = CreateConnectionBody,
    responses(
        (status = 201, description = "Connection created", body = ConnectionResponse),
        (status = 409, description = "An endpoint has no live version", body = crate::error::ErrorBody),
        (status = 422, description = "Validation failure", body = crate::error::ErrorBody),
    ),
    tag = "connections"
)]
pub(crate) async fn create_connection(
    State(state): State<AppState>,
    Json(body): Json<CreateConnectionBody>,
) -> Result<(StatusCode, Json<ConnectionResponse>), AppError> {
    let connection_type: ConnectionType = body.connection_type.parse()?;
    let organization_scope = match body.organization_id {
        Some(id) => OrganizationScope::Organization(EntityId(id)),
        None => OrganizationScope::Any,
    };
    let validity = match (&body.valid_from, &body.valid_until) {
        (None, None) => None,
        (from, until) => Some(ValidityWindow {
            start: from.as_deref().map(Timestamp::parse).transpose()?,
            end: until.as_deref().map(Timestamp::parse).transpose()?,
        }),
    };
    let connection = state.connections.create_connection(CreateConnectionRequest {
        service_id: EntityId(body.service_id),
        channel_id: EntityId(body.channel_id),
        connection_type,
        organization_scope,
        validity,
        hours_overrides: body.hours_overrides,
        actor: ActorId::new(body.actor),
    })?;
    Ok((
        StatusCode::CREATED,
        Json(ConnectionResponse::from_connection(&connection)),
    ))
}

/// GET /v1/connections — List all connections.
#[utoipa::path(
    get,
    path = "/v1/connections",
    responses(
        (status = 200, description = "Connection list", body = ConnectionListResponse),
    ),
    tag = "connections"
)]
pub(crate) async fn list_connections(
    State(state): State<AppState>,
) -> Json<ConnectionListResponse> {
    let records = state.connections.list_connections();
    let total = records.len();
    let connections = records
        .iter()
        .map(ConnectionResponse::from_connection)
        .collect();
    Json(ConnectionListResponse { connections, total })
}

/// GET /v1/connections/{connection_id} — Connection details.
#[utoipa::path(
    get,
    path = "/v1/connections/{connection_id}",
    params(("connection_id" = Uuid, Path, description = "Connection UUID")),
    responses(
        (status = 200, description = "Connection details", body = ConnectionResponse),
        (status = 404, description = "Connection not found", body = crate::error::ErrorBody),
    ),
    tag = "connections"
)]
pub(crate) async fn get_connection(
    State(state): State<AppState>,
    Path(connection_id): Path<Uuid>,
) -> Result<Json<ConnectionResponse>, AppError> {
    let connection = state
        .connections
        .get_connection(&ConnectionId(connection_id))?;
    Ok(Json(ConnectionResponse::from_connection(&connection)))
}

/// PUT /v1/connections/{connection_id}/hours — Replace overrides.
#[utoipa::path(
    put,
    path = "/v1/connections/{connection_id}/hours",
    params(("connection_id" = Uuid, Path, description = "Connection UUID")),
    request_body = UpdateHoursBody,
    responses(
        (status = 200, description = "Overrides replaced", body = ConnectionResponse),
        (status = 404, description = "Connection not found", body = crate::error::ErrorBody),
        (status = 422, description = "Conflicting or malformed overrides", body = crate::error::ErrorBody),
    ),
    tag = "connections"
)]
pub(crate) async fn update_hours(
    State(state): State<AppState>,
    Path(connection_id): Path<Uuid>,
    Json(body): Json<UpdateHoursBody>,
) -> Result<Json<ConnectionResponse>, AppError> {
    let connection = state
        .connections
        .update_opening_hours(&ConnectionId(connection_id), body.overrides)?;
    Ok(Json(ConnectionResponse::from_connection(&connection)))
}

/// GET /v1/connections/{connection_id}/effective-hours — Resolve a date.
#[utoipa::path(
    get,
    path = "/v1/connections/{connection_id}/effective-hours",
    params(
        ("connection_id" = Uuid, Path, description = "Connection UUID"),
        ("date" = String, Query, description = "Calendar date, e.g. 2024-12-24"),
    ),
    responses(
        (status = 200, description = "Effective schedule", body = EffectiveHoursResponse),
        (status = 404, description = "Connection not found", body = crate::error::ErrorBody),
    ),
    tag = "connections"
)]
pub(crate) async fn effective_hours(
    State(state): State<AppState>,
    Path(connection_id): Path<Uuid>,
    Query(query): Query<EffectiveHoursQuery>,
) -> Result<Json<EffectiveHoursResponse>, AppError> {
    let hours = state
        .connections
        .resolve_effective_hours(&ConnectionId(connection_id), query.date)?;
    Ok(Json(EffectiveHoursResponse::from_hours(query.date, hours)))
}

/// DELETE /v1/connections/{connection_id} — Dissolve.
#[utoipa::path(
    delete,
    path = "/v1/connections/{connection_id}",
    params(("connection_id" = Uuid, Path, description = "Connection UUID")),
    responses(
        (status = 200, description = "Connection dissolved", body = ConnectionResponse),
        (status = 404, description = "Connection not found", body = crate::error::ErrorBody),
    ),
    tag = "connections"
)]
pub(crate) async fn dissolve_connection(
    State(state): State<AppState>,
    Path(connection_id): Path<Uuid>,
) -> Result<Json<ConnectionResponse>, AppError> {
    let connection = state
        .connections
        .dissolve_connection(&ConnectionId(connection_id))?;
    Ok(Json(ConnectionResponse::from_connection(&connection)))
}
