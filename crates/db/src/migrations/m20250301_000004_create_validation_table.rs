//! Create validation table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Validation::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Validation::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Validation::ReportId).string_len(32).not_null())
                    .col(ColumnDef::new(Validation::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Validation::IsValid).boolean().not_null())
                    .col(
                        ColumnDef::new(Validation::PointsAdjustment)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Validation::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_validation_report")
                            .from(Validation::Table, Validation::ReportId)
                            .to(Report::Table, Report::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_validation_user")
                            .from(Validation::Table, Validation::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique: one vote per user per report, enforced by the database
        manager
            .create_index(
                Index::create()
                    .name("idx_validation_report_user")
                    .table(Validation::Table)
                    .col(Validation::ReportId)
                    .col(Validation::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Validation::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Validation {
    Table,
    Id,
    ReportId,
    UserId,
    IsValid,
    PointsAdjustment,
    CreatedAt,
}

#[derive(Iden)]
enum Report {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
