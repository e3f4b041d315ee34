//! # Entity Publishing Routes
//!
//! REST endpoints for the multi-language publishing lifecycle of catalog
//! entities. Handlers parse and delegate — the transition rules live in
//! the domain crates, not here.
//!
//! ## Endpoints
//!
//! - `POST   /v1/entities`                                        — First save (creates the entity)
//! - `GET    /v1/entities/{entity_id}`                            — Entity with all language versions
//! - `POST   /v1/entities/{entity_id}/languages`                  — Add a language version
//! - `GET    /v1/entities/{entity_id}/versions/{language}`        — One language version
//! - `POST   /v1/entities/{entity_id}/versions/{language}/archive`  — Archive
//! - `POST   /v1/entities/{entity_id}/versions/{language}/publish`  — Publish
//! - `POST   /v1/entities/{entity_id}/versions/{language}/restore`  — Restore
//! - `POST   /v1/entities/{entity_id}/versions/{language}/withdraw` — Withdraw from publication
//! - `POST   /v1/entities/{entity_id}/versions/{language}/edit`     — Save content
//! - `POST   /v1/entities/{entity_id}/versions/{language}/review`   — Record a review
//! - `POST   /v1/entities/{entity_id}/remove`                     — Remove the whole entity

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use psc_core::{ActorId, EntityId, EntityType, LanguageCode};
use psc_state::PublishingAction;
use psc_store::{ContentEntity, LanguageVersion};

use crate::error::AppError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request to create an entity with its first language version.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateEntityRequest {
    /// Entity type. One of: "Service", "Channel", "GeneralDescription",
    /// "Organization".
    #[schema(value_type = String)]
    pub entity_type: EntityType,
    /// Language of the first version.
    pub language: String,
    /// Display name of the first version.
    pub display_name: String,
}

/// Request to add a language version to an existing entity.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AddLanguageRequest {
    /// The new language.
    pub language: String,
    /// Display name of the new version.
    pub display_name: String,
}

/// Request to apply a lifecycle action to a language version.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct TransitionRequest {
    /// The revision the caller last read. A stale value is rejected.
    pub revision: u64,
    /// The already-authorized actor performing the action.
    pub actor: String,
}

/// Request to save content on a language version.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct EditRequest {
    /// The revision the caller last read.
    pub revision: u64,
    /// The already-authorized actor performing the edit.
    pub actor: String,
    /// The new display name.
    pub display_name: String,
}

/// Request to record a review on a language version.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ReviewRequest {
    /// The revision the caller last read.
    pub revision: u64,
    /// The reviewer identity.
    pub reviewer: String,
}

/// Request to remove a whole entity.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RemoveEntityRequest {
    /// The already-authorized actor performing the removal.
    pub actor: String,
}

/// One language version of an entity.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VersionResponse {
    /// Language code.
    pub language: String,
    /// Lifecycle status.
    pub status: String,
    /// Display name.
    pub display_name: String,
    /// Optimistic-concurrency revision.
    pub revision: u64,
    /// Last publication instant (ISO8601, UTC).
    pub published_at: Option<String>,
    /// Last archival instant (ISO8601, UTC).
    pub archived_at: Option<String>,
    /// Last review instant (ISO8601, UTC).
    pub reviewed_at: Option<String>,
    /// Who reviewed it.
    pub reviewed_by: Option<String>,
}

impl VersionResponse {
    fn from_version(version: &LanguageVersion) -> Self {
        Self {
            language: version.language.to_string(),
            status: version.status.to_string(),
            display_name: version.display_name.clone(),
            revision: version.revision,
            published_at: version.published_at.map(|ts| ts.to_iso8601()),
            archived_at: version.archived_at.map(|ts| ts.to_iso8601()),
            reviewed_at: version.reviewed_at.map(|ts| ts.to_iso8601()),
            reviewed_by: version.reviewed_by.as_ref().map(|a| a.to_string()),
        }
    }
}

/// An entity with all its language versions.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EntityResponse {
    /// Entity identifier.
    pub id: Uuid,
    /// Entity type.
    pub entity_type: String,
    /// Whether the entity has been removed.
    pub removed: bool,
    /// Creation instant (ISO8601, UTC).
    pub created_at: String,
    /// All language versions.
    pub versions: Vec<VersionResponse>,
}

impl EntityResponse {
    fn from_entity(entity: &ContentEntity) -> Self {
        Self {
            id: *entity.id.as_uuid(),
            entity_type: entity.entity_type.to_string(),
            removed: entity.removed,
            created_at: entity.created_at.to_iso8601(),
            versions: entity
                .language_versions
                .values()
                .map(VersionResponse::from_version)
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the entity publishing router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/entities", post(create_entity))
        .route("/v1/entities/{entity_id}", get(get_entity))
        .route("/v1/entities/{entity_id}/languages", post(add_language))
        .route(
            "/v1/entities/{entity_id}/versions/{language}",
            get(get_version),
        )
        .route(
            "/v1/entities/{entity_id}/versions/{language}/archive",
            post(archive_version),
        )
        .route(
            "/v1/entities/{entity_id}/versions/{language}/publish",
            post(publish_version),
        )
        .route(
            "/v1/entities/{entity_id}/versions/{language}/restore",
            post(restore_version),
        )
        .route(
            "/v1/entities/{entity_id}/versions/{language}/withdraw",
            post(withdraw_version),
        )
        .route(
            "/v1/entities/{entity_id}/versions/{language}/edit",
            post(edit_version),
        )
        .route(
            "/v1/entities/{entity_id}/versions/{language}/review",
            post(review_version),
        )
        .route("/v1/entities/{entity_id}/remove", post(remove_entity))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/entities — First save of a new entity.
#[utoipa::path(
    post,
    path = "/v1/entities",
    request_body = CreateEntityRequest,
    responses(
        (status = 201, description = "Entity created", body = EntityResponse),
        (status = 422, description = "Validation failure", body = crate::error::ErrorBody),
    ),
    tag = "entities"
)]
pub(crate) async fn create_entity(
    State(state): State<AppState>,
    Json(req): Json<CreateEntityRequest>,
) -> Result<(StatusCode, Json<EntityResponse>), AppError> {
    let language = LanguageCode::new(req.language)?;
    let entity = state
        .store
        .create_entity(req.entity_type, language, req.display_name)?;
    Ok((StatusCode::CREATED, Json(EntityResponse::from_entity(&entity))))
}

/// GET /v1/entities/{entity_id} — Entity with all language versions.
#[utoipa::path(
    get,
    path = "/v1/entities/{entity_id}",
    params(("entity_id" = Uuid, Path, description = "Entity UUID")),
    responses(
        (status = 200, description = "Entity details", body = EntityResponse),
        (status = 404, description = "Entity not found", body = crate::error::ErrorBody),
    ),
    tag = "entities"
)]
pub(crate) async fn get_entity(
    State(state): State<AppState>,
    Path(entity_id): Path<Uuid>,
) -> Result<Json<EntityResponse>, AppError> {
    let entity = state.store.get_entity(&EntityId(entity_id))?;
    Ok(Json(EntityResponse::from_entity(&entity)))
}

/// POST /v1/entities/{entity_id}/languages — Add a language version.
#[utoipa::path(
    post,
    path = "/v1/entities/{entity_id}/languages",
    params(("entity_id" = Uuid, Path, description = "Entity UUID")),
    request_body = AddLanguageRequest,
    responses(
        (status = 201, description = "Language version added", body = VersionResponse),
        (status = 409, description = "Version already exists", body = crate::error::ErrorBody),
        (status = 422, description = "Language not enabled", body = crate::error::ErrorBody),
    ),
    tag = "entities"
)]
pub(crate) async fn add_language(
    State(state): State<AppState>,
    Path(entity_id): Path<Uuid>,
    Json(req): Json<AddLanguageRequest>,
) -> Result<(StatusCode, Json<VersionResponse>), AppError> {
    let language = LanguageCode::new(req.language)?;
    let version = state
        .store
        .add_language_version(&EntityId(entity_id), language, req.display_name)?;
    Ok((
        StatusCode::CREATED,
        Json(VersionResponse::from_version(&version)),
    ))
}

/// GET /v1/entities/{entity_id}/versions/{language} — One language version.
#[utoipa::path(
    get,
    path = "/v1/entities/{entity_id}/versions/{language}",
    params(
        ("entity_id" = Uuid, Path, description = "Entity UUID"),
        ("language" = String, Path, description = "Language code"),
    ),
    responses(
        (status = 200, description = "Version details", body = VersionResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "entities"
)]
pub(crate) async fn get_version(
    State(state): State<AppState>,
    Path((entity_id, language)): Path<(Uuid, String)>,
) -> Result<Json<VersionResponse>, AppError> {
    let language = LanguageCode::new(language)?;
    let version = state.store.get_version(&EntityId(entity_id), &language)?;
    Ok(Json(VersionResponse::from_version(&version)))
}

fn apply(
    state: &AppState,
    entity_id: Uuid,
    language: String,
    action: PublishingAction,
    req: TransitionRequest,
) -> Result<Json<VersionResponse>, AppError> {
    let language = LanguageCode::new(language)?;
    let version = state.store.apply_transition(
        &EntityId(entity_id),
        &language,
        action,
        req.revision,
        &ActorId::new(req.actor),
    )?;
    Ok(Json(VersionResponse::from_version(&version)))
}

/// POST /v1/entities/{entity_id}/versions/{language}/archive — Archive.
#[utoipa::path(
    post,
    path = "/v1/entities/{entity_id}/versions/{language}/archive",
    params(
        ("entity_id" = Uuid, Path, description = "Entity UUID"),
        ("language" = String, Path, description = "Language code"),
    ),
    request_body = TransitionRequest,
    responses(
        (status = 200, description = "Version archived", body = VersionResponse),
        (status = 409, description = "Illegal transition or stale revision", body = crate::error::ErrorBody),
    ),
    tag = "entities"
)]
pub(crate) async fn archive_version(
    State(state): State<AppState>,
    Path((entity_id, language)): Path<(Uuid, String)>,
    Json(req): Json<TransitionRequest>,
) -> Result<Json<VersionResponse>, AppError> {
    apply(&state, entity_id, language, PublishingAction::Archive, req)
}

/// POST /v1/entities/{entity_id}/versions/{language}/publish — Publish.
#[utoipa::path(
    post,
    path = "/v1/entities/{entity_id}/versions/{language}/publish",
    params(
        ("entity_id" = Uuid, Path, description = "Entity UUID"),
        ("language" = String, Path, description = "Language code"),
    ),
    request_body = TransitionRequest,
    responses(
        (status = 200, description = "Version published", body = VersionResponse),
        (status = 409, description = "Illegal transition or stale revision", body = crate::error::ErrorBody),
    ),
    tag = "entities"
)]
pub(crate) async fn publish_version(
    State(state): State<AppState>,
    Path((entity_id, language)): Path<(Uuid, String)>,
    Json(req): Json<TransitionRequest>,
) -> Result<Json<VersionResponse>, AppError> {
    apply(&state, entity_id, language, PublishingAction::Publish, req)
}

/// POST /v1/entities/{entity_id}/versions/{language}/restore — Restore.
#[utoipa::path(
    post,
    path = "/v1/entities/{entity_id}/versions/{language}/restore",
    params(
        ("entity_id" = Uuid, Path, description = "Entity UUID"),
        ("language" = String, Path, description = "Language code"),
    ),
    request_body = TransitionRequest,
    responses(
        (status = 200, description = "Version restored", body = VersionResponse),
        (status = 409, description = "Illegal transition or stale revision", body = crate::error::ErrorBody),
    ),
    tag = "entities"
)]
pub(crate) async fn restore_version(
    State(state): State<AppState>,
    Path((entity_id, language)): Path<(Uuid, String)>,
    Json(req): Json<TransitionRequest>,
) -> Result<Json<VersionResponse>, AppError> {
    apply(&state, entity_id, language, PublishingAction::Restore, req)
}

/// POST /v1/entities/{entity_id}/versions/{language}/withdraw — Withdraw.
#[utoipa::path(
    post,
    path = "/v1/entities/{entity_id}/versions/{language}/withdraw",
    params(
        ("entity_id" = Uuid, Path, description = "Entity UUID"),
        ("language" = String, Path, description = "Language code"),
    ),
    request_body = TransitionRequest,
    responses(
        (status = 200, description = "Version withdrawn", body = VersionResponse),
        (status = 409, description = "Illegal transition or stale revision", body = crate::error::ErrorBody),
    ),
    tag = "entities"
)]
pub(crate) async fn withdraw_version(
    State(state): State<AppState>,
    Path((entity_id, language)): Path<(Uuid, String)>,
    Json(req): Json<TransitionRequest>,
) -> Result<Json<VersionResponse>, AppError> {
    apply(&state, entity_id, language, PublishingAction::Withdraw, req)
}

/// POST /v1/entities/{entity_id}/versions/{language}/edit — Save content.
#[utoipa::path(
    post,
    path = "/v1/entities/{entity_id}/versions/{language}/edit",
    params(
        ("entity_id" = Uuid, Path, description = "Entity UUID"),
        ("language" = String, Path, description = "Language code"),
    ),
    request_body = EditRequest,
    responses(
        (status = 200, description = "Content saved", body = VersionResponse),
        (status = 409, description = "Illegal transition or stale revision", body = crate::error::ErrorBody),
    ),
    tag = "entities"
)]
pub(crate) async fn edit_version(
    State(state): State<AppState>,
    Path((entity_id, language)): Path<(Uuid, String)>,
    Json(req): Json<EditRequest>,
) -> Result<Json<VersionResponse>, AppError> {
    let language = LanguageCode::new(language)?;
    let version = state.store.save_content(
        &EntityId(entity_id),
        &language,
        req.display_name,
        req.revision,
        &ActorId::new(req.actor),
    )?;
    Ok(Json(VersionResponse::from_version(&version)))
}

/// POST /v1/entities/{entity_id}/versions/{language}/review — Record a review.
#[utoipa::path(
    post,
    path = "/v1/entities/{entity_id}/versions/{language}/review",
    params(
        ("entity_id" = Uuid, Path, description = "Entity UUID"),
        ("language" = String, Path, description = "Language code"),
    ),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Review recorded", body = VersionResponse),
        (status = 409, description = "Version not reviewable or stale revision", body = crate::error::ErrorBody),
    ),
    tag = "entities"
)]
pub(crate) async fn review_version(
    State(state): State<AppState>,
    Path((entity_id, language)): Path<(Uuid, String)>,
    Json(req): Json<ReviewRequest>,
) -> Result<Json<VersionResponse>, AppError> {
    let language = LanguageCode::new(language)?;
    let version = state.store.record_review(
        &EntityId(entity_id),
        &language,
        &ActorId::new(req.reviewer),
        req.revision,
    )?;
    Ok(Json(VersionResponse::from_version(&version)))
}

/// POST /v1/entities/{entity_id}/remove — Remove the whole entity.
#[utoipa::path(
    post,
    path = "/v1/entities/{entity_id}/remove",
    params(("entity_id" = Uuid, Path, description = "Entity UUID")),
    request_body = RemoveEntityRequest,
    responses(
        (status = 200, description = "Entity removed", body = EntityResponse),
        (status = 409, description = "Some version is not removable", body = crate::error::ErrorBody),
    ),
    tag = "entities"
)]
pub(crate) async fn remove_entity(
    State(state): State<AppState>,
    Path(entity_id): Path<Uuid>,
    Json(req): Json<RemoveEntityRequest>,
) -> Result<Json<EntityResponse>, AppError> {
    let entity = state
        .store
        .remove_entity(&EntityId(entity_id), &ActorId::new(req.actor))?;
    Ok(Json(EntityResponse::from_entity(&entity)))
}
