use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Solutions {
    Table,
    Id,
    AuthorId,
    ProblemCode,
    Title,
    Content,
    ProblemLink,
    SubmissionLink,
    Editorial,
    IsPublic,
    IsAnonymous,
    IsDraft,
    CreatedAt,
    UpdatedAt,
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
                    .table(Solutions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Solutions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    // Nullable: anonymous submissions have no account, and
                    // deleting an account keeps its solutions.
                    .col(ColumnDef::new(Solutions::AuthorId).integer())
                    .col(
                        ColumnDef::new(Solutions::ProblemCode)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Solutions::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Solutions::Content).text().not_null())
                    .col(ColumnDef::new(Solutions::ProblemLink).string_len(2048))
                    .col(ColumnDef::new(Solutions::SubmissionLink).string_len(2048))
                    .col(ColumnDef::new(Solutions::Editorial).text())
                    .col(
                        ColumnDef::new(Solutions::IsPublic)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Solutions::IsAnonymous)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Solutions::IsDraft)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Solutions::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Solutions::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_solutions_author_id")
                            .from(Solutions::Table, Solutions::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_solutions_problem_code")
                    .table(Solutions::Table)
                    .col(Solutions::ProblemCode)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_solutions_author_id")
                    .table(Solutions::Table)
                    .col(Solutions::AuthorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_solutions_created_at")
                    .table(Solutions::Table)
                    .col(Solutions::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Solutions::Table).to_owned())
            .await
    }
}
