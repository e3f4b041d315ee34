//! # OpenAPI Document
//!
//! Auto-generated OpenAPI spec from the handler annotations, served at
//! `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::routes;
use crate::state::AppState;

/// The API document.
#[derive(OpenApi)]
#[openapi(
    paths(
        routes::entities::create_entity,
        routes::entities::get_entity,
        routes::entities::add_language,
        routes::entities::get_version,
        routes::entities::archive_version,
        routes::entities::publish_version,
        routes::entities::restore_version,
        routes::entities::withdraw_version,
        routes::entities::edit_version,
        routes::entities::review_version,
        routes::entities::remove_entity,
        routes::connections::create_connection,
        routes::connections::list_connections,
        routes::connections::get_connection,
        routes::connections::update_hours,
        routes::connections::effective_hours,
        routes::connections::dissolve_connection,
        routes::translations::create_order,
        routes::translations::list_orders,
        routes::translations::get_order,
        routes::translations::vendor_callback,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        routes::entities::CreateEntityRequest,
        routes::entities::AddLanguageRequest,
        routes::entities::TransitionRequest,
        routes::entities::EditRequest,
        routes::entities::ReviewRequest,
        routes::entities::RemoveEntityRequest,
        routes::entities::VersionResponse,
        routes::entities::EntityResponse,
        routes::connections::CreateConnectionBody,
        routes::connections::UpdateHoursBody,
        routes::connections::ConnectionResponse,
        routes::connections::ConnectionListResponse,
        routes::connections::OpenSpanBody,
        routes::connections::EffectiveHoursResponse,
        routes::translations::CreateOrderRequest,
        routes::translations::VendorCallbackRequest,
        routes::translations::OrderResponse,
        routes::translations::OrderListResponse,
    )),
    tags(
        (name = "entities", description = "Multi-language publishing lifecycle"),
        (name = "connections", description = "Service↔channel connection workbench"),
        (name = "translations", description = "Translation vendor orders"),
    )
)]
pub struct ApiDoc;

/// Router serving the OpenAPI document.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(serve_openapi))
}

async fn serve_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
