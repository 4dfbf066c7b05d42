//! Create registration approval table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RegistrationApproval::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RegistrationApproval::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RegistrationApproval::UserId)
                            .string_len(32)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(RegistrationApproval::RequestedRole)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(RegistrationApproval::Reason).text())
                    .col(
                        ColumnDef::new(RegistrationApproval::Status)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(RegistrationApproval::ReviewedBy).string_len(32))
                    .col(ColumnDef::new(RegistrationApproval::ReviewNote).text())
                    .col(
                        ColumnDef::new(RegistrationApproval::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(RegistrationApproval::ReviewedAt)
                            .timestamp_with_time_zone(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_registration_approval_user")
                            .from(RegistrationApproval::Table, RegistrationApproval::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: status (pending-requests listing)
        manager
            .create_index(
                Index::create()
                    .name("idx_registration_approval_status")
                    .table(RegistrationApproval::Table)
                    .col(RegistrationApproval::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(RegistrationApproval::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum RegistrationApproval {
    Table,
    Id,
    UserId,
    RequestedRole,
    Reason,
    Status,
    ReviewedBy,
    ReviewNote,
    CreatedAt,
    ReviewedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
