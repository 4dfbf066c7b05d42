//! Create police station table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PoliceStation::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PoliceStation::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PoliceStation::Name).string_len(256).not_null())
                    .col(
                        ColumnDef::new(PoliceStation::District)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(ColumnDef::new(PoliceStation::Thana).string_len(128).not_null())
                    .col(ColumnDef::new(PoliceStation::Address).string_len(512))
                    .col(ColumnDef::new(PoliceStation::Phone).string_len(32))
                    .col(
                        ColumnDef::new(PoliceStation::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: district (thana lookup per district)
        manager
            .create_index(
                Index::create()
                    .name("idx_police_station_district")
                    .table(PoliceStation::Table)
                    .col(PoliceStation::District)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PoliceStation::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PoliceStation {
    Table,
    Id,
    Name,
    District,
    Thana,
    Address,
    Phone,
    CreatedAt,
}
