use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::response::ApiResponse;
use crate::services::reaction::{ReactionService, REACTION_KINDS};
use axum::{extract::Path, response::IntoResponse, Extension, Json};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ToggleReactionRequest {
    /// Reaction type: like, helpful or bookmark
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ToggleReactionResponse {
    /// "added" or "removed"
    pub action: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReactionEntry {
    pub id: i32,
    #[serde(rename = "type")]
    pub kind: String,
    pub user_id: i32,
    /// Missing when the account was since deleted
    pub username: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReactionListResponse {
    pub reactions: Vec<ReactionEntry>,
    /// Totals per reaction type
    pub counts: HashMap<String, u64>,
    /// Reaction types the caller has active on this solution
    pub my_reactions: Vec<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/solutions/{id}/reactions",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Solution ID")),
    request_body = ToggleReactionRequest,
    responses(
        (status = 200, description = "Reaction toggled", body = ToggleReactionResponse),
        (status = 400, description = "Unknown reaction type", body = AppError),
        (status = 404, description = "Solution not found", body = AppError),
    ),
    tag = "reactions"
)]
pub async fn toggle_reaction(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<ToggleReactionRequest>,
) -> AppResult<impl IntoResponse> {
    let service = ReactionService::new(db);
    let outcome = service
        .toggle(auth_user.user_id, id, &payload.kind)
        .await?;

    Ok(ApiResponse::ok(ToggleReactionResponse {
        action: outcome.as_str().to_string(),
        kind: payload.kind,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/solutions/{id}/reactions",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Solution ID")),
    responses(
        (status = 200, description = "Reactions on the solution", body = ReactionListResponse),
        (status = 404, description = "Solution not found", body = AppError),
    ),
    tag = "reactions"
)]
pub async fn list_reactions(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let service = ReactionService::new(db);
    let rows = service.list_for_solution(id).await?;

    let mut counts: HashMap<String, u64> =
        REACTION_KINDS.iter().map(|k| (k.to_string(), 0)).collect();
    let mut my_reactions = Vec::new();
    let mut reactions = Vec::with_capacity(rows.len());

    for row in rows {
        *counts.entry(row.reaction.kind.clone()).or_insert(0) += 1;
        if row.reaction.user_id == auth_user.user_id {
            my_reactions.push(row.reaction.kind.clone());
        }
        reactions.push(ReactionEntry {
            id: row.reaction.id,
            kind: row.reaction.kind,
            user_id: row.reaction.user_id,
            username: row.user.map(|u| u.username),
            created_at: row.reaction.created_at,
        });
    }

    Ok(ApiResponse::ok(ReactionListResponse {
        reactions,
        counts,
        my_reactions,
    }))
}
