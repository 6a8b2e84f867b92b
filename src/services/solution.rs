use crate::{
    error::{AppError, AppResult},
    middleware::auth::{can_edit_solution, AuthUser},
    models::{solution, Solution, SolutionModel, User, UserModel},
};
use sea_orm::{
    sea_query::{extension::postgres::PgExpr, Expr},
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

/// Visibility scope for the solution listing.
///
/// `All` keeps the listing unfiltered (drafts are always excluded), `PublicOnly`
/// restricts it to published solutions, and `OwnedBy` narrows it to a single
/// author, used for the "my solutions" view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    All,
    PublicOnly,
    OwnedBy(i32),
}

#[derive(Debug, Clone)]
pub struct SolutionFilter {
    pub scope: ListScope,
    pub problem_code: Option<String>,
    pub search: Option<String>,
    pub page: u64,
    pub per_page: u64,
}

/// Editable fields of a solution. Used for both create and full-replace
/// update, mirroring the submission form.
#[derive(Debug, Clone)]
pub struct SolutionInput {
    pub problem_code: String,
    pub title: String,
    pub content: String,
    pub problem_link: Option<String>,
    pub submission_link: Option<String>,
    pub editorial: Option<String>,
    pub is_public: bool,
    pub is_anonymous: bool,
    pub is_draft: bool,
}

pub struct SolutionService {
    db: DatabaseConnection,
}

impl SolutionService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// List solutions matching the filter, newest first, each with its
    /// author when one exists. Returns the page plus the total match count.
    pub async fn list(
        &self,
        filter: &SolutionFilter,
    ) -> AppResult<(Vec<(SolutionModel, Option<UserModel>)>, u64)> {
        let mut condition = Condition::all().add(solution::Column::IsDraft.eq(false));

        match filter.scope {
            ListScope::All => {}
            ListScope::PublicOnly => {
                condition = condition.add(solution::Column::IsPublic.eq(true));
            }
            ListScope::OwnedBy(user_id) => {
                condition = condition.add(solution::Column::AuthorId.eq(user_id));
            }
        }

        if let Some(code) = filter
            .problem_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
        {
            condition = condition.add(solution::Column::ProblemCode.eq(code));
        }

        if let Some(search) = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            let pattern = format!("%{}%", escape_like(search));
            condition = condition.add(
                Condition::any()
                    .add(Expr::col(solution::Column::ProblemCode).ilike(pattern.clone()))
                    .add(Expr::col(solution::Column::Title).ilike(pattern.clone()))
                    .add(Expr::col(solution::Column::Content).ilike(pattern)),
            );
        }

        let query = Solution::find().filter(condition);
        let total = query.clone().count(&self.db).await?;

        let solutions = query
            .order_by_desc(solution::Column::CreatedAt)
            .offset((filter.page.saturating_sub(1)) * filter.per_page)
            .limit(filter.per_page)
            .find_also_related(User)
            .all(&self.db)
            .await?;

        Ok((solutions, total))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<SolutionModel> {
        let solution = Solution::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;
        Ok(solution)
    }

    pub async fn get_with_author(
        &self,
        id: i32,
    ) -> AppResult<(SolutionModel, Option<UserModel>)> {
        let row = Solution::find_by_id(id)
            .find_also_related(User)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;
        Ok(row)
    }

    /// Create a solution. A missing author means the submission came from a
    /// visitor; those are stored anonymous regardless of the requested flag,
    /// and anonymous solutions are always private.
    pub async fn create(
        &self,
        author: Option<&AuthUser>,
        new: SolutionInput,
    ) -> AppResult<SolutionModel> {
        let now = chrono::Utc::now().naive_utc();
        let is_anonymous = new.is_anonymous || author.is_none();
        let is_public = new.is_public && !is_anonymous;

        let model = solution::ActiveModel {
            author_id: sea_orm::ActiveValue::Set(author.map(|u| u.user_id)),
            problem_code: sea_orm::ActiveValue::Set(new.problem_code),
            title: sea_orm::ActiveValue::Set(new.title),
            content: sea_orm::ActiveValue::Set(new.content),
            problem_link: sea_orm::ActiveValue::Set(new.problem_link),
            submission_link: sea_orm::ActiveValue::Set(new.submission_link),
            editorial: sea_orm::ActiveValue::Set(new.editorial),
            is_public: sea_orm::ActiveValue::Set(is_public),
            is_anonymous: sea_orm::ActiveValue::Set(is_anonymous),
            is_draft: sea_orm::ActiveValue::Set(new.is_draft),
            created_at: sea_orm::ActiveValue::Set(now),
            updated_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        };

        let solution = model.insert(&self.db).await?;
        Ok(solution)
    }

    /// Replace the editable fields of a solution. Only the author or an
    /// admin may edit; authorship itself never changes.
    pub async fn update(
        &self,
        user: &AuthUser,
        id: i32,
        input: SolutionInput,
    ) -> AppResult<SolutionModel> {
        let existing = self.get_by_id(id).await?;
        if !can_edit_solution(user, existing.author_id) {
            return Err(AppError::Forbidden);
        }

        let mut model: solution::ActiveModel = existing.into();
        model.problem_code = sea_orm::ActiveValue::Set(input.problem_code);
        model.title = sea_orm::ActiveValue::Set(input.title);
        model.content = sea_orm::ActiveValue::Set(input.content);
        model.problem_link = sea_orm::ActiveValue::Set(input.problem_link);
        model.submission_link = sea_orm::ActiveValue::Set(input.submission_link);
        model.editorial = sea_orm::ActiveValue::Set(input.editorial);
        model.is_public = sea_orm::ActiveValue::Set(input.is_public);
        model.is_anonymous = sea_orm::ActiveValue::Set(input.is_anonymous);
        model.is_draft = sea_orm::ActiveValue::Set(input.is_draft);
        model.updated_at = sea_orm::ActiveValue::Set(chrono::Utc::now().naive_utc());

        let updated = model.update(&self.db).await?;
        Ok(updated)
    }

    /// Delete a solution. Only the author or an admin may delete.
    /// Reactions and attached drafts go with it via FK cascade.
    pub async fn delete(&self, user: &AuthUser, id: i32) -> AppResult<()> {
        let existing = self.get_by_id(id).await?;
        if !can_edit_solution(user, existing.author_id) {
            return Err(AppError::Forbidden);
        }

        Solution::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }
}

/// Escape LIKE metacharacters so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
