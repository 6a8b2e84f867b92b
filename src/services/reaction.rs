use crate::{
    error::{AppError, AppResult},
    models::{reaction, Reaction, ReactionModel, Solution, User, UserModel},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder,
};
use std::collections::HashMap;

/// Reaction kinds a solution accepts. Anything else is rejected up front so
/// the unique index never sees garbage.
pub const REACTION_KINDS: [&str; 3] = ["like", "helpful", "bookmark"];

/// Outcome of a toggle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
}

impl ToggleOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToggleOutcome::Added => "added",
            ToggleOutcome::Removed => "removed",
        }
    }
}

/// A reaction joined with the reacting user's public identity.
#[derive(Debug, Clone)]
pub struct ReactionWithUser {
    pub reaction: ReactionModel,
    pub user: Option<UserModel>,
}

pub struct ReactionService {
    db: DatabaseConnection,
}

impl ReactionService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Toggle a reaction of the given kind: add it if absent, remove it if
    /// present. The (solution, user, kind) triple is unique.
    pub async fn toggle(
        &self,
        user_id: i32,
        solution_id: i32,
        kind: &str,
    ) -> AppResult<ToggleOutcome> {
        if !REACTION_KINDS.contains(&kind) {
            return Err(AppError::Validation(format!(
                "Invalid reaction type: {kind}"
            )));
        }

        Solution::find_by_id(solution_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let existing = Reaction::find()
            .filter(reaction::Column::SolutionId.eq(solution_id))
            .filter(reaction::Column::UserId.eq(user_id))
            .filter(reaction::Column::Kind.eq(kind))
            .one(&self.db)
            .await?;

        match existing {
            Some(model) => {
                model.delete(&self.db).await?;
                Ok(ToggleOutcome::Removed)
            }
            None => {
                let model = reaction::ActiveModel {
                    solution_id: sea_orm::ActiveValue::Set(solution_id),
                    user_id: sea_orm::ActiveValue::Set(user_id),
                    kind: sea_orm::ActiveValue::Set(kind.to_string()),
                    created_at: sea_orm::ActiveValue::Set(chrono::Utc::now().naive_utc()),
                    ..Default::default()
                };
                model.insert(&self.db).await?;
                Ok(ToggleOutcome::Added)
            }
        }
    }

    /// All reactions on a solution, oldest first, with who made them.
    pub async fn list_for_solution(&self, solution_id: i32) -> AppResult<Vec<ReactionWithUser>> {
        Solution::find_by_id(solution_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let rows = Reaction::find()
            .filter(reaction::Column::SolutionId.eq(solution_id))
            .order_by_asc(reaction::Column::CreatedAt)
            .find_also_related(User)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(reaction, user)| ReactionWithUser { reaction, user })
            .collect())
    }

    /// Reaction totals per solution for a listing page. One query, counted
    /// in memory; pages are small.
    pub async fn counts_for_solutions(
        &self,
        solution_ids: &[i32],
    ) -> AppResult<HashMap<i32, u64>> {
        if solution_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let reactions = Reaction::find()
            .filter(reaction::Column::SolutionId.is_in(solution_ids.to_vec()))
            .all(&self.db)
            .await?;

        let mut counts: HashMap<i32, u64> = HashMap::new();
        for reaction in reactions {
            *counts.entry(reaction.solution_id).or_insert(0) += 1;
        }
        Ok(counts)
    }
}
