use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::models::DraftModel;
use crate::response::ApiResponse;
use crate::services::draft::DraftService;
use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    Extension, Json,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SaveDraftRequest {
    /// Draft body (Markdown)
    #[validate(length(min = 1))]
    pub content: String,
    /// Solution being edited, absent while composing a new one
    pub solution_id: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListDraftsQuery {
    /// Solution being edited, absent selects drafts for new solutions
    pub solution_id: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DraftResponse {
    pub id: i32,
    pub solution_id: Option<i32>,
    pub content: String,
    pub last_saved_at: chrono::NaiveDateTime,
    pub created_at: chrono::NaiveDateTime,
}

impl From<DraftModel> for DraftResponse {
    fn from(draft: DraftModel) -> Self {
        Self {
            id: draft.id,
            solution_id: draft.solution_id,
            content: draft.content,
            last_saved_at: draft.last_saved_at,
            created_at: draft.created_at,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/drafts",
    security(("jwt_token" = [])),
    request_body = SaveDraftRequest,
    responses(
        (status = 200, description = "Draft saved", body = DraftResponse),
        (status = 400, description = "Validation error", body = AppError),
        (status = 404, description = "Referenced solution not found", body = AppError),
    ),
    tag = "drafts"
)]
pub async fn save_draft(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Json(payload): Json<SaveDraftRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(format!("Validation error: {e}")))?;

    let service = DraftService::new(db);
    let draft = service
        .save(auth_user.user_id, payload.solution_id, payload.content)
        .await?;

    Ok(ApiResponse::ok(DraftResponse::from(draft)))
}

#[utoipa::path(
    get,
    path = "/api/v1/drafts",
    security(("jwt_token" = [])),
    params(
        ("solution_id" = Option<i32>, Query, description = "Filter by solution; absent selects drafts for new solutions"),
    ),
    responses(
        (status = 200, description = "Caller's drafts, newest save first", body = [DraftResponse]),
    ),
    tag = "drafts"
)]
pub async fn list_drafts(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Query(query): Query<ListDraftsQuery>,
) -> AppResult<impl IntoResponse> {
    let service = DraftService::new(db);
    let drafts = service.list(auth_user.user_id, query.solution_id).await?;

    let drafts: Vec<DraftResponse> = drafts.into_iter().map(DraftResponse::from).collect();
    Ok(ApiResponse::ok(drafts))
}

#[utoipa::path(
    delete,
    path = "/api/v1/drafts/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Draft ID")),
    responses(
        (status = 200, description = "Draft discarded", body = String),
    ),
    tag = "drafts"
)]
pub async fn delete_draft(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    DraftService::new(db).delete(auth_user.user_id, id).await?;
    Ok(ApiResponse::ok("Draft discarded"))
}
