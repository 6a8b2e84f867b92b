use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "solutions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// NULL for solutions posted without an account.
    pub author_id: Option<i32>,
    pub problem_code: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub problem_link: Option<String>,
    pub submission_link: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub editorial: Option<String>,
    pub is_public: bool,
    pub is_anonymous: bool,
    pub is_draft: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id"
    )]
    Author,
    #[sea_orm(has_many = "super::reaction::Entity")]
    Reaction,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::reaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
