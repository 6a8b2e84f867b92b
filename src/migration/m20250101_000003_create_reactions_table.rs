use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Reactions {
    Table,
    Id,
    SolutionId,
    UserId,
    Kind,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Solutions {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reactions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reactions::SolutionId).integer().not_null())
                    .col(ColumnDef::new(Reactions::UserId).integer().not_null())
                    .col(ColumnDef::new(Reactions::Kind).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Reactions::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reactions_solution_id")
                            .from(Reactions::Table, Reactions::SolutionId)
                            .to(Solutions::Table, Solutions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reactions_user_id")
                            .from(Reactions::Table, Reactions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One reaction of each kind per user per solution.
        manager
            .create_index(
                Index::create()
                    .name("idx_reactions_unique")
                    .table(Reactions::Table)
                    .col(Reactions::SolutionId)
                    .col(Reactions::UserId)
                    .col(Reactions::Kind)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reactions_solution_id")
                    .table(Reactions::Table)
                    .col(Reactions::SolutionId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reactions::Table).to_owned())
            .await
    }
}
