use crate::{
    error::{AppError, AppResult},
    models::{draft, Draft, DraftModel, Solution},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};

pub struct DraftService {
    db: DatabaseConnection,
}

impl DraftService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Autosave a draft. One draft per (user, solution) slot, where the slot
    /// for brand-new solutions is the NULL solution id. Last write wins.
    pub async fn save(
        &self,
        user_id: i32,
        solution_id: Option<i32>,
        content: String,
    ) -> AppResult<DraftModel> {
        if let Some(id) = solution_id {
            Solution::find_by_id(id)
                .one(&self.db)
                .await?
                .ok_or(AppError::NotFound)?;
        }

        let now = chrono::Utc::now().naive_utc();
        let existing = Draft::find()
            .filter(self.slot_condition(user_id, solution_id))
            .one(&self.db)
            .await?;

        let draft = match existing {
            Some(model) => {
                let mut active: draft::ActiveModel = model.into();
                active.content = sea_orm::ActiveValue::Set(content);
                active.last_saved_at = sea_orm::ActiveValue::Set(now);
                active.update(&self.db).await?
            }
            None => {
                let active = draft::ActiveModel {
                    user_id: sea_orm::ActiveValue::Set(user_id),
                    solution_id: sea_orm::ActiveValue::Set(solution_id),
                    content: sea_orm::ActiveValue::Set(content),
                    last_saved_at: sea_orm::ActiveValue::Set(now),
                    created_at: sea_orm::ActiveValue::Set(now),
                    ..Default::default()
                };
                active.insert(&self.db).await?
            }
        };

        Ok(draft)
    }

    /// Drafts in the caller's slot, newest save first. A missing solution id
    /// selects drafts for not-yet-created solutions.
    pub async fn list(
        &self,
        user_id: i32,
        solution_id: Option<i32>,
    ) -> AppResult<Vec<DraftModel>> {
        let drafts = Draft::find()
            .filter(self.slot_condition(user_id, solution_id))
            .order_by_desc(draft::Column::LastSavedAt)
            .all(&self.db)
            .await?;
        Ok(drafts)
    }

    /// Discard a draft. Scoped to the owner; deleting a draft that is already
    /// gone is not an error.
    pub async fn delete(&self, user_id: i32, draft_id: i32) -> AppResult<()> {
        Draft::delete_many()
            .filter(draft::Column::Id.eq(draft_id))
            .filter(draft::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    fn slot_condition(&self, user_id: i32, solution_id: Option<i32>) -> Condition {
        let condition = Condition::all().add(draft::Column::UserId.eq(user_id));
        match solution_id {
            Some(id) => condition.add(draft::Column::SolutionId.eq(id)),
            None => condition.add(draft::Column::SolutionId.is_null()),
        }
    }
}
