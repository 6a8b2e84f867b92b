use crate::error::{AppError, AppResult};
use crate::middleware::{AuthUser, MaybeAuthUser};
use crate::models::{SolutionModel, UserModel};
use crate::response::{ApiResponse, Pagination};
use crate::services::reaction::ReactionService;
use crate::services::solution::{ListScope, SolutionFilter, SolutionInput, SolutionService};
use crate::utils::{render_markdown, sort_problem_codes};
use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    Extension, Json,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;
use validator::Validate;

const DEFAULT_PER_PAGE: u64 = 20;
const MAX_PER_PAGE: u64 = 100;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ListSolutionsQuery {
    /// Exact problem code to filter by
    pub problem: Option<String>,
    /// true = published only, false = the caller's own solutions
    pub public: Option<bool>,
    /// Case-insensitive substring search over code, title and content
    pub search: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SolutionRequest {
    /// Problem code, e.g. "CF-148A" or "ABC300-D"
    #[validate(length(min = 1, max = 64))]
    pub problem_code: String,
    /// Solution title
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Solution write-up (Markdown)
    #[validate(length(min = 1))]
    pub content: String,
    /// Link to the problem statement
    #[validate(url)]
    pub problem_link: Option<String>,
    /// Link to the accepted submission
    #[validate(url)]
    pub submission_link: Option<String>,
    /// Editorial notes (Markdown)
    pub editorial: Option<String>,
    /// Defaults to private
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub is_anonymous: bool,
    /// Hidden from listings while true; still reachable by id
    #[serde(default)]
    pub is_draft: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthorResponse {
    pub id: i32,
    pub username: String,
}

impl From<UserModel> for AuthorResponse {
    fn from(user: UserModel) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SolutionResponse {
    pub id: i32,
    pub problem_code: String,
    pub title: String,
    /// Raw Markdown source
    pub content: String,
    /// Sanitized HTML rendering of the content
    pub content_html: String,
    pub problem_link: Option<String>,
    pub submission_link: Option<String>,
    pub editorial: Option<String>,
    pub editorial_html: Option<String>,
    pub is_public: bool,
    pub is_anonymous: bool,
    pub is_draft: bool,
    /// Absent for anonymous or authorless solutions
    pub author: Option<AuthorResponse>,
    pub reaction_count: u64,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl SolutionResponse {
    fn build(
        solution: SolutionModel,
        author: Option<AuthorResponse>,
        reaction_count: u64,
    ) -> Self {
        // An anonymous solution keeps its author in the database but never
        // exposes them over the API.
        let author = if solution.is_anonymous { None } else { author };

        Self {
            id: solution.id,
            content_html: render_markdown(&solution.content),
            editorial_html: solution.editorial.as_deref().map(render_markdown),
            problem_code: solution.problem_code,
            title: solution.title,
            content: solution.content,
            problem_link: solution.problem_link,
            submission_link: solution.submission_link,
            editorial: solution.editorial,
            is_public: solution.is_public,
            is_anonymous: solution.is_anonymous,
            is_draft: solution.is_draft,
            author,
            reaction_count,
            created_at: solution.created_at,
            updated_at: solution.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SolutionListResponse {
    /// Solutions on this page grouped by problem code
    pub groups: HashMap<String, Vec<SolutionResponse>>,
    /// Problem codes of this page in display order (prefix, number, suffix)
    pub problem_codes: Vec<String>,
    pub pagination: Pagination,
}

#[utoipa::path(
    get,
    path = "/api/v1/solutions",
    params(
        ("problem" = Option<String>, Query, description = "Exact problem code filter"),
        ("public" = Option<bool>, Query, description = "true = published only, false = own solutions"),
        ("search" = Option<String>, Query, description = "Substring search"),
        ("page" = Option<u64>, Query, description = "Page number, 1-based"),
        ("per_page" = Option<u64>, Query, description = "Page size, max 100"),
    ),
    responses(
        (status = 200, description = "Solutions grouped by problem code", body = SolutionListResponse),
        (status = 401, description = "public=false requires authentication", body = AppError),
    ),
    tag = "solutions"
)]
pub async fn list_solutions(
    Extension(db): Extension<DatabaseConnection>,
    MaybeAuthUser(auth_user): MaybeAuthUser,
    Query(query): Query<ListSolutionsQuery>,
) -> AppResult<impl IntoResponse> {
    let scope = match query.public {
        None => ListScope::All,
        Some(true) => ListScope::PublicOnly,
        Some(false) => {
            let user = auth_user.as_ref().ok_or(AppError::Unauthorized)?;
            ListScope::OwnedBy(user.user_id)
        }
    };

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query
        .per_page
        .unwrap_or(DEFAULT_PER_PAGE)
        .clamp(1, MAX_PER_PAGE);

    let filter = SolutionFilter {
        scope,
        problem_code: query.problem,
        search: query.search,
        page,
        per_page,
    };

    let solution_service = SolutionService::new(db.clone());
    let (rows, total) = solution_service.list(&filter).await?;

    let ids: Vec<i32> = rows.iter().map(|(s, _)| s.id).collect();
    let counts = ReactionService::new(db).counts_for_solutions(&ids).await?;

    let mut groups: HashMap<String, Vec<SolutionResponse>> = HashMap::new();
    for (solution, author) in rows {
        let count = counts.get(&solution.id).copied().unwrap_or(0);
        groups
            .entry(solution.problem_code.clone())
            .or_default()
            .push(SolutionResponse::build(
                solution,
                author.map(AuthorResponse::from),
                count,
            ));
    }

    let problem_codes = sort_problem_codes(groups.keys().cloned().collect());

    let response = SolutionListResponse {
        groups,
        problem_codes,
        pagination: Pagination::new(total, page, per_page),
    };

    Ok(ApiResponse::ok(response))
}

#[utoipa::path(
    post,
    path = "/api/v1/solutions",
    request_body = SolutionRequest,
    responses(
        (status = 200, description = "Solution created", body = SolutionResponse),
        (status = 400, description = "Validation error", body = AppError),
        (status = 401, description = "Public submission without authentication", body = AppError),
    ),
    tag = "solutions"
)]
pub async fn create_solution(
    Extension(db): Extension<DatabaseConnection>,
    MaybeAuthUser(auth_user): MaybeAuthUser,
    Json(payload): Json<SolutionRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(format!("Validation error: {e}")))?;

    // Publishing publicly requires an account.
    if payload.is_public && auth_user.is_none() {
        return Err(AppError::Unauthorized);
    }

    let service = SolutionService::new(db);
    let solution = service
        .create(auth_user.as_ref(), solution_input(payload))
        .await?;

    let author = auth_user.map(|u| AuthorResponse {
        id: u.user_id,
        username: u.username,
    });
    Ok(ApiResponse::ok(SolutionResponse::build(
        solution, author, 0,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/solutions/{id}",
    params(("id" = i32, Path, description = "Solution ID")),
    responses(
        (status = 200, description = "Solution detail", body = SolutionResponse),
        (status = 404, description = "Solution not found", body = AppError),
    ),
    tag = "solutions"
)]
pub async fn get_solution(
    Extension(db): Extension<DatabaseConnection>,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    let (solution, author) = SolutionService::new(db.clone())
        .get_with_author(id)
        .await?;

    let counts = ReactionService::new(db)
        .counts_for_solutions(&[solution.id])
        .await?;
    let count = counts.get(&solution.id).copied().unwrap_or(0);

    Ok(ApiResponse::ok(SolutionResponse::build(
        solution,
        author.map(AuthorResponse::from),
        count,
    )))
}

#[utoipa::path(
    put,
    path = "/api/v1/solutions/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Solution ID")),
    request_body = SolutionRequest,
    responses(
        (status = 200, description = "Solution updated", body = SolutionResponse),
        (status = 403, description = "Not the author or an admin", body = AppError),
        (status = 404, description = "Solution not found", body = AppError),
    ),
    tag = "solutions"
)]
pub async fn update_solution(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<SolutionRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(format!("Validation error: {e}")))?;

    let service = SolutionService::new(db.clone());
    let updated = service.update(&auth_user, id, solution_input(payload)).await?;

    let (solution, author) = service.get_with_author(updated.id).await?;
    let counts = ReactionService::new(db)
        .counts_for_solutions(&[solution.id])
        .await?;
    let count = counts.get(&solution.id).copied().unwrap_or(0);

    Ok(ApiResponse::ok(SolutionResponse::build(
        solution,
        author.map(AuthorResponse::from),
        count,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/v1/solutions/{id}",
    security(("jwt_token" = [])),
    params(("id" = i32, Path, description = "Solution ID")),
    responses(
        (status = 200, description = "Solution deleted", body = String),
        (status = 403, description = "Not the author or an admin", body = AppError),
        (status = 404, description = "Solution not found", body = AppError),
    ),
    tag = "solutions"
)]
pub async fn delete_solution(
    Extension(db): Extension<DatabaseConnection>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> AppResult<impl IntoResponse> {
    SolutionService::new(db).delete(&auth_user, id).await?;
    Ok(ApiResponse::ok("Solution deleted"))
}

fn solution_input(payload: SolutionRequest) -> SolutionInput {
    SolutionInput {
        problem_code: payload.problem_code.trim().to_string(),
        title: payload.title.trim().to_string(),
        content: payload.content,
        problem_link: payload.problem_link,
        submission_link: payload.submission_link,
        editorial: payload.editorial,
        is_public: payload.is_public,
        is_anonymous: payload.is_anonymous,
        is_draft: payload.is_draft,
    }
}

