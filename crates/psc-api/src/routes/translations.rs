//! # Translation Order Routes
//!
//! REST endpoints for ordering translations and for the vendor's
//! completion callback. The callback endpoint is idempotent — the
//! vendor delivers at-least-once.
//!
//! ## Endpoints
//!
//! - `POST /v1/translation-orders`                 — Submit an order
//! - `GET  /v1/translation-orders`                 — List orders
//! - `GET  /v1/translation-orders/{order_id}`      — Order details
//! - `POST /v1/translation-orders/{order_id}/callback` — Vendor callback

use std::collections::BTreeSet;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use psc_core::{ActorId, EntityId, LanguageCode, OrderId};
use psc_translation::{TranslationOrder, VendorOutcome};

use crate::error::AppError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request to submit a translation order.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateOrderRequest {
    /// The entity to translate.
    pub entity_id: Uuid,
    /// The language translated from.
    pub source_language: String,
    /// The languages translated into.
    pub target_languages: Vec<String>,
    /// Contact the vendor reports progress to.
    pub subscriber_contact: String,
    /// The already-authorized actor ordering the translation.
    pub actor: String,
}

/// The vendor's callback payload.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct VendorCallbackRequest {
    /// The delivery outcome: "success" or "failure".
    #[schema(value_type = String)]
    pub result: VendorOutcome,
}

/// A translation order record.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    /// Order identifier.
    pub id: Uuid,
    /// The entity being translated.
    pub entity_id: Uuid,
    /// Source language.
    pub source_language: String,
    /// Target languages.
    pub target_languages: Vec<String>,
    /// Order status.
    pub status: String,
    /// Subscriber contact.
    pub subscriber_contact: String,
    /// Who requested the translation.
    pub requested_by: String,
    /// Per-target problems recorded at completion.
    pub warnings: Vec<String>,
    /// Creation instant (ISO8601, UTC).
    pub created_at: String,
    /// Terminal instant (ISO8601, UTC).
    pub completed_at: Option<String>,
}

impl OrderResponse {
    fn from_order(order: &TranslationOrder) -> Self {
        Self {
            id: *order.id.as_uuid(),
            entity_id: *order.entity_id.as_uuid(),
            source_language: order.source_language.to_string(),
            target_languages: order
                .target_languages
                .iter()
                .map(|lang| lang.to_string())
                .collect(),
            status: order.status.to_string(),
            subscriber_contact: order.subscriber_contact.clone(),
            requested_by: order.requested_by.to_string(),
            warnings: order.warnings.clone(),
            created_at: order.created_at.to_iso8601(),
            completed_at: order.completed_at.map(|ts| ts.to_iso8601()),
        }
    }
}

/// Order list response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderListResponse {
    /// All orders.
    pub orders: Vec<OrderResponse>,
    /// Total number of orders.
    pub total: usize,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the translation order router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/translation-orders",
            post(create_order).get(list_orders),
        )
        .route("/v1/translation-orders/{order_id}", get(get_order))
        .route(
            "/v1/translation-orders/{order_id}/callback",
            post(vendor_callback),
        )
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/translation-orders — Submit a translation order.
#[utoipa::path(
    post,
    path = "/v1/translation-orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order submitted", body = OrderResponse),
        (status = 404, description = "Entity or source version not found", body = crate::error::ErrorBody),
        (status = 409, description = "Source version not translatable", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid language set", body = crate::error::ErrorBody),
    ),
    tag = "translations"
)]
pub(crate) async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), AppError> {
    let source_language = LanguageCode::new(req.source_language)?;
    let mut target_languages = BTreeSet::new();
    for language in req.target_languages {
        target_languages.insert(LanguageCode::new(language)?);
    }
    let order = state.translations.submit(
        EntityId(req.entity_id),
        source_language,
        target_languages,
        req.subscriber_contact,
        ActorId::new(req.actor),
    )?;
    Ok((StatusCode::CREATED, Json(OrderResponse::from_order(&order))))
}

/// GET /v1/translation-orders — List all orders.
#[utoipa::path(
    get,
    path = "/v1/translation-orders",
    responses(
        (status = 200, description = "Order list", body = OrderListResponse),
    ),
    tag = "translations"
)]
pub(crate) async fn list_orders(State(state): State<AppState>) -> Json<OrderListResponse> {
    let records = state.translations.list_orders();
    let total = records.len();
    let orders = records.iter().map(OrderResponse::from_order).collect();
    Json(OrderListResponse { orders, total })
}

/// GET /v1/translation-orders/{order_id} — Order details.
#[utoipa::path(
    get,
    path = "/v1/translation-orders/{order_id}",
    params(("order_id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order details", body = OrderResponse),
        (status = 404, description = "Order not found", body = crate::error::ErrorBody),
    ),
    tag = "translations"
)]
pub(crate) async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = state.translations.get_order(&OrderId(order_id))?;
    Ok(Json(OrderResponse::from_order(&order)))
}

/// POST /v1/translation-orders/{order_id}/callback — Vendor callback.
///
/// Idempotent: redelivery against a terminal order returns the order
/// unchanged with 200.
#[utoipa::path(
    post,
    path = "/v1/translation-orders/{order_id}/callback",
    params(("order_id" = Uuid, Path, description = "Order UUID")),
    request_body = VendorCallbackRequest,
    responses(
        (status = 200, description = "Callback applied (or duplicate ignored)", body = OrderResponse),
        (status = 404, description = "Order not found", body = crate::error::ErrorBody),
    ),
    tag = "translations"
)]
pub(crate) async fn vendor_callback(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(req): Json<VendorCallbackRequest>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = state
        .translations
        .vendor_callback(&OrderId(order_id), req.result)?;
    Ok(Json(OrderResponse::from_order(&order)))
}
