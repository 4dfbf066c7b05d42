//! Crime report entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Report lifecycle status.
///
/// No transition graph is enforced; any authorized actor may set any value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum ReportStatus {
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "investigating")]
    Investigating,
    #[sea_orm(string_value = "resolved")]
    Resolved,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "report")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The citizen who filed the report
    pub reporter_id: String,

    /// Crime category (theft, assault, robbery, ...)
    pub crime_type: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    /// Incident location, free text, "District-Thana" by convention
    pub location: String,

    /// Reporter's address at submission time, used for scope matching
    pub reporter_address: String,

    pub status: ReportStatus,

    /// Claim marker; set when an officer takes the case
    #[sea_orm(nullable)]
    pub police_id: Option<String>,

    /// Confirmed-vote tally (denormalized from the validation table)
    #[sea_orm(default_value = 0)]
    pub valid_count: i32,

    /// Disputed-vote tally (denormalized from the validation table)
    #[sea_orm(default_value = 0)]
    pub invalid_count: i32,

    /// Free-form nested details (peopleInvolved, weapons, dangerLevel, ...)
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub details: Option<Json>,

    /// URLs of stored photo/video attachments
    #[sea_orm(column_type = "JsonBinary")]
    pub attachments: Json,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ReporterId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Reporter,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::PoliceId",
        to = "super::user::Column::Id"
    )]
    Officer,

    #[sea_orm(has_many = "super::validation::Entity")]
    Validations,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reporter.def()
    }
}

impl Related<super::validation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Validations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
