//! # Integration Tests for psc-api
//!
//! Drives the assembled application through `tower::ServiceExt::oneshot`:
//! publishing lifecycle commands, the connection workbench (including
//! stale flagging and effective-hours resolution), translation order
//! callbacks, health probes, and the OpenAPI document.
//!
//! The vendor behind the configured URL does not exist; dispatch is
//! fire-and-forget, so orders stay `PENDING` until this test plays the
//! vendor through the callback endpoint.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use psc_api::{AppConfig, AppState};

/// Helper: build the test app.
fn test_app() -> axum::Router {
    let state = AppState::new(AppConfig::default()).expect("state should assemble");
    psc_api::app(state)
}

/// Helper: read a response body as JSON.
async fn body_json(response: axum::http::Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Helper: POST a JSON body.
async fn post_json(app: &axum::Router, uri: &str, body: Value) -> axum::http::Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Helper: PUT a JSON body.
async fn put_json(app: &axum::Router, uri: &str, body: Value) -> axum::http::Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Helper: GET a URI.
async fn get_uri(app: &axum::Router, uri: &str) -> axum::http::Response<Body> {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Helper: create an entity and return its id.
async fn create_entity(app: &axum::Router, entity_type: &str, name: &str) -> String {
    let response = post_json(
        app,
        "/v1/entities",
        json!({
            "entity_type": entity_type,
            "language": "fi",
            "display_name": name,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    body["id"].as_str().unwrap().to_string()
}

/// Helper: archive the fi version of an entity at the given revision.
async fn archive_fi(app: &axum::Router, entity_id: &str, revision: u64) {
    let response = post_json(
        app,
        &format!("/v1/entities/{entity_id}/versions/fi/archive"),
        json!({ "revision": revision, "actor": "editor-1" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_probe() {
    let app = test_app();
    let response = get_uri(&app, "/health/liveness").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_readiness_probe() {
    let app = test_app();
    let response = get_uri(&app, "/health/readiness").await;
    assert_eq!(response.status(), StatusCode::OK);
}

// -- Publishing Lifecycle -----------------------------------------------------

#[tokio::test]
async fn test_create_entity_starts_as_draft() {
    let app = test_app();
    let entity_id = create_entity(&app, "Service", "Passihakemus").await;
    let response = get_uri(&app, &format!("/v1/entities/{entity_id}/versions/fi")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "DRAFT");
    assert_eq!(body["revision"], 1);
}

#[tokio::test]
async fn test_publish_and_stale_revision_replay() {
    let app = test_app();
    let entity_id = create_entity(&app, "Service", "Passihakemus").await;

    let response = post_json(
        &app,
        &format!("/v1/entities/{entity_id}/versions/fi/publish"),
        json!({ "revision": 1, "actor": "editor-1" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "PUBLISHED");
    assert_eq!(body["revision"], 2);
    assert!(body["published_at"].is_string());

    // Replaying the consumed revision conflicts.
    let replay = post_json(
        &app,
        &format!("/v1/entities/{entity_id}/versions/fi/publish"),
        json!({ "revision": 1, "actor": "editor-1" }),
    )
    .await;
    assert_eq!(replay.status(), StatusCode::CONFLICT);
    let body = body_json(replay).await;
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_archived_published_version_cannot_be_restored() {
    let app = test_app();
    let entity_id = create_entity(&app, "Service", "Passihakemus").await;
    post_json(
        &app,
        &format!("/v1/entities/{entity_id}/versions/fi/publish"),
        json!({ "revision": 1, "actor": "editor-1" }),
    )
    .await;
    archive_fi(&app, &entity_id, 2).await;

    let response = post_json(
        &app,
        &format!("/v1/entities/{entity_id}/versions/fi/restore"),
        json!({ "revision": 3, "actor": "editor-1" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_edit_published_version_marks_modified() {
    let app = test_app();
    let entity_id = create_entity(&app, "Service", "Passihakemus").await;
    post_json(
        &app,
        &format!("/v1/entities/{entity_id}/versions/fi/publish"),
        json!({ "revision": 1, "actor": "editor-1" }),
    )
    .await;
    let response = post_json(
        &app,
        &format!("/v1/entities/{entity_id}/versions/fi/edit"),
        json!({ "revision": 2, "actor": "editor-1", "display_name": "Passihakemus (uusi)" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "MODIFIED");
    assert_eq!(body["display_name"], "Passihakemus (uusi)");
}

#[tokio::test]
async fn test_remove_entity_rejects_published_versions() {
    let app = test_app();
    let entity_id = create_entity(&app, "Service", "Passihakemus").await;
    post_json(
        &app,
        &format!("/v1/entities/{entity_id}/versions/fi/publish"),
        json!({ "revision": 1, "actor": "editor-1" }),
    )
    .await;
    let response = post_json(
        &app,
        &format!("/v1/entities/{entity_id}/remove"),
        json!({ "actor": "editor-1" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    // The version is untouched.
    let version = body_json(
        get_uri(&app, &format!("/v1/entities/{entity_id}/versions/fi")).await,
    )
    .await;
    assert_eq!(version["status"], "PUBLISHED");
}

#[tokio::test]
async fn test_remove_archived_entity() {
    let app = test_app();
    let entity_id = create_entity(&app, "Service", "Passihakemus").await;
    archive_fi(&app, &entity_id, 1).await;
    let response = post_json(
        &app,
        &format!("/v1/entities/{entity_id}/remove"),
        json!({ "actor": "editor-1" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["removed"], true);
    assert_eq!(body["versions"][0]["status"], "REMOVED");
}

#[tokio::test]
async fn test_language_outside_capability_table_rejected() {
    let app = test_app();
    let entity_id = create_entity(&app, "Organization", "Virasto").await;
    let response = post_json(
        &app,
        &format!("/v1/entities/{entity_id}/languages"),
        json!({ "language": "smn", "display_name": "Virgadat" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_unknown_entity_is_404() {
    let app = test_app();
    let response = get_uri(
        &app,
        "/v1/entities/00000000-0000-0000-0000-000000000000",
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// -- Connection Workbench -----------------------------------------------------

#[tokio::test]
async fn test_create_and_dissolve_connection() {
    let app = test_app();
    let service = create_entity(&app, "Service", "Passihakemus").await;
    let channel = create_entity(&app, "Channel", "Poliisiasema").await;

    let response = post_json(
        &app,
        "/v1/connections",
        json!({
            "service_id": service,
            "channel_id": channel,
            "connection_type": "NotCommon",
            "actor": "editor-1",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let connection_id = body["id"].as_str().unwrap().to_string();
    assert_eq!(body["stale"], false);

    let dissolve = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/v1/connections/{connection_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(dissolve.status(), StatusCode::OK);
    let gone = get_uri(&app, &format!("/v1/connections/{connection_id}")).await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_legacy_connection_type_rejected_by_name() {
    let app = test_app();
    let service = create_entity(&app, "Service", "Passihakemus").await;
    let channel = create_entity(&app, "Channel", "Poliisiasema").await;
    let response = post_json(
        &app,
        "/v1/connections",
        json!({
            "service_id": service,
            "channel_id": channel,
            "connection_type": "CommonFor",
            "actor": "editor-1",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("retired"));
}

#[tokio::test]
async fn test_connection_rejected_when_endpoint_removed() {
    let app = test_app();
    let service = create_entity(&app, "Service", "Passihakemus").await;
    let channel = create_entity(&app, "Channel", "Poliisiasema").await;
    archive_fi(&app, &service, 1).await;
    post_json(
        &app,
        &format!("/v1/entities/{service}/remove"),
        json!({ "actor": "editor-1" }),
    )
    .await;

    let response = post_json(
        &app,
        "/v1/connections",
        json!({
            "service_id": service,
            "channel_id": channel,
            "connection_type": "NotCommon",
            "actor": "editor-1",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_connection_goes_stale_when_both_endpoints_die() {
    let app = test_app();
    let service = create_entity(&app, "Service", "Passihakemus").await;
    let channel = create_entity(&app, "Channel", "Poliisiasema").await;
    let created = body_json(
        post_json(
            &app,
            "/v1/connections",
            json!({
                "service_id": service,
                "channel_id": channel,
                "connection_type": "CommonForAll",
                "actor": "editor-1",
            }),
        )
        .await,
    )
    .await;
    let connection_id = created["id"].as_str().unwrap().to_string();

    archive_fi(&app, &service, 1).await;
    // One dead endpoint is not enough.
    let body = body_json(get_uri(&app, &format!("/v1/connections/{connection_id}")).await).await;
    assert_eq!(body["stale"], false);

    archive_fi(&app, &channel, 1).await;
    let body = body_json(get_uri(&app, &format!("/v1/connections/{connection_id}")).await).await;
    assert_eq!(body["stale"], true);
    assert!(body["stale_since"].is_string());
}

#[tokio::test]
async fn test_effective_hours_exceptional_closure_wins() {
    let app = test_app();
    let service = create_entity(&app, "Service", "Passihakemus").await;
    let channel = create_entity(&app, "Channel", "Poliisiasema").await;
    let created = body_json(
        post_json(
            &app,
            "/v1/connections",
            json!({
                "service_id": service,
                "channel_id": channel,
                "connection_type": "NotCommon",
                "actor": "editor-1",
                "hours_overrides": [
                    {
                        "kind": "Normal",
                        "interval": null,
                        "days": 127,
                        "hours": { "Open": [ { "opens": "09:00:00", "closes": "17:00:00" } ] }
                    },
                    {
                        "kind": "Exceptional",
                        "interval": { "start": "2024-12-24", "end": "2024-12-24" },
                        "days": 127,
                        "hours": "Closed"
                    }
                ],
            }),
        )
        .await,
    )
    .await;
    let connection_id = created["id"].as_str().unwrap().to_string();

    let closed = body_json(
        get_uri(
            &app,
            &format!("/v1/connections/{connection_id}/effective-hours?date=2024-12-24"),
        )
        .await,
    )
    .await;
    assert_eq!(closed["closed"], true);

    let open = body_json(
        get_uri(
            &app,
            &format!("/v1/connections/{connection_id}/effective-hours?date=2024-12-23"),
        )
        .await,
    )
    .await;
    assert_eq!(open["closed"], false);
    assert_eq!(open["open_spans"][0]["opens"], "09:00:00");
    assert_eq!(open["open_spans"][0]["closes"], "17:00:00");
}

#[tokio::test]
async fn test_conflicting_overrides_rejected_at_update_time() {
    let app = test_app();
    let service = create_entity(&app, "Service", "Passihakemus").await;
    let channel = create_entity(&app, "Channel", "Poliisiasema").await;
    let created = body_json(
        post_json(
            &app,
            "/v1/connections",
            json!({
                "service_id": service,
                "channel_id": channel,
                "connection_type": "NotCommon",
                "actor": "editor-1",
            }),
        )
        .await,
    )
    .await;
    let connection_id = created["id"].as_str().unwrap().to_string();

    let overlapping = json!({
        "overrides": [
            {
                "kind": "Special",
                "interval": { "start": "2025-06-01", "end": "2025-08-31" },
                "days": 127,
                "hours": { "Open": [ { "opens": "10:00:00", "closes": "14:00:00" } ] }
            },
            {
                "kind": "Special",
                "interval": { "start": "2025-08-01", "end": "2025-09-30" },
                "days": 127,
                "hours": "Closed"
            }
        ]
    });
    let response = put_json(
        &app,
        &format!("/v1/connections/{connection_id}/hours"),
        overlapping,
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// -- Translation Orders -------------------------------------------------------

#[tokio::test]
async fn test_translation_order_lifecycle_with_duplicate_callback() {
    let app = test_app();
    let entity_id = create_entity(&app, "Service", "Passihakemus").await;

    let created = post_json(
        &app,
        "/v1/translation-orders",
        json!({
            "entity_id": entity_id,
            "source_language": "fi",
            "target_languages": ["sv"],
            "subscriber_contact": "kirjaamo@example.fi",
            "actor": "editor-1",
        }),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let order = body_json(created).await;
    assert_eq!(order["status"], "PENDING");
    let order_id = order["id"].as_str().unwrap().to_string();

    // The placeholder draft exists while the vendor works.
    let placeholder = body_json(
        get_uri(&app, &format!("/v1/entities/{entity_id}/versions/sv")).await,
    )
    .await;
    assert_eq!(placeholder["status"], "DRAFT");

    let completed = body_json(
        post_json(
            &app,
            &format!("/v1/translation-orders/{order_id}/callback"),
            json!({ "result": "success" }),
        )
        .await,
    )
    .await;
    assert_eq!(completed["status"], "COMPLETED");
    assert_eq!(completed["warnings"].as_array().unwrap().len(), 0);

    let published = body_json(
        get_uri(&app, &format!("/v1/entities/{entity_id}/versions/sv")).await,
    )
    .await;
    assert_eq!(published["status"], "PUBLISHED");
    let revision_after_first = published["revision"].as_u64().unwrap();

    // Redelivery is a no-op that still answers 200.
    let redelivered = post_json(
        &app,
        &format!("/v1/translation-orders/{order_id}/callback"),
        json!({ "result": "success" }),
    )
    .await;
    assert_eq!(redelivered.status(), StatusCode::OK);
    let body = body_json(redelivered).await;
    assert_eq!(body["status"], "COMPLETED");
    let after = body_json(
        get_uri(&app, &format!("/v1/entities/{entity_id}/versions/sv")).await,
    )
    .await;
    assert_eq!(after["revision"].as_u64().unwrap(), revision_after_first);
}

#[tokio::test]
async fn test_translation_order_failure_callback() {
    let app = test_app();
    let entity_id = create_entity(&app, "Service", "Passihakemus").await;
    let order = body_json(
        post_json(
            &app,
            "/v1/translation-orders",
            json!({
                "entity_id": entity_id,
                "source_language": "fi",
                "target_languages": ["sv"],
                "subscriber_contact": "kirjaamo@example.fi",
                "actor": "editor-1",
            }),
        )
        .await,
    )
    .await;
    let order_id = order["id"].as_str().unwrap().to_string();

    let failed = body_json(
        post_json(
            &app,
            &format!("/v1/translation-orders/{order_id}/callback"),
            json!({ "result": "failure" }),
        )
        .await,
    )
    .await;
    assert_eq!(failed["status"], "FAILED");

    // No entity mutation happened.
    let version = body_json(
        get_uri(&app, &format!("/v1/entities/{entity_id}/versions/sv")).await,
    )
    .await;
    assert_eq!(version["status"], "DRAFT");
}

#[tokio::test]
async fn test_translation_order_rejects_source_among_targets() {
    let app = test_app();
    let entity_id = create_entity(&app, "Service", "Passihakemus").await;
    let response = post_json(
        &app,
        "/v1/translation-orders",
        json!({
            "entity_id": entity_id,
            "source_language": "fi",
            "target_languages": ["fi", "sv"],
            "subscriber_contact": "kirjaamo@example.fi",
            "actor": "editor-1",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_callback_for_unknown_order_is_404() {
    let app = test_app();
    let response = post_json(
        &app,
        "/v1/translation-orders/00000000-0000-0000-0000-000000000000/callback",
        json!({ "result": "success" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// -- OpenAPI ------------------------------------------------------------------

#[tokio::test]
async fn test_openapi_document_served() {
    let app = test_app();
    let response = get_uri(&app, "/openapi.json").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["paths"]["/v1/entities"].is_object());
    assert!(body["paths"]["/v1/connections"].is_object());
    assert!(body["paths"]["/v1/translation-orders"].is_object());
}
