//! Create user profile table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserProfile::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserProfile::UserId)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserProfile::Password).string_len(256))
                    .col(
                        ColumnDef::new(UserProfile::Email)
                            .string_len(256)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(UserProfile::EmailVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(UserProfile::VerificationToken).string_len(64))
                    .col(
                        ColumnDef::new(UserProfile::VerificationExpiresAt)
                            .timestamp_with_time_zone(),
                    )
                    .col(ColumnDef::new(UserProfile::Phone).string_len(32))
                    .col(ColumnDef::new(UserProfile::Address).string_len(256))
                    .col(ColumnDef::new(UserProfile::District).string_len(128))
                    .col(ColumnDef::new(UserProfile::Thana).string_len(128))
                    .col(ColumnDef::new(UserProfile::Station).string_len(256))
                    .col(ColumnDef::new(UserProfile::BadgeNumber).string_len(64))
                    .col(
                        ColumnDef::new(UserProfile::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(UserProfile::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_profile_user")
                            .from(UserProfile::Table, UserProfile::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: verification_token (for email verification lookup)
        manager
            .create_index(
                Index::create()
                    .name("idx_user_profile_verification_token")
                    .table(UserProfile::Table)
                    .col(UserProfile::VerificationToken)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserProfile::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UserProfile {
    Table,
    UserId,
    Password,
    Email,
    EmailVerified,
    VerificationToken,
    VerificationExpiresAt,
    Phone,
    Address,
    District,
    Thana,
    Station,
    BadgeNumber,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
