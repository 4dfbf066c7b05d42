//! User profile entity (credentials and contact details).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_profile")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,

    /// Argon2 password hash
    #[sea_orm(nullable)]
    pub password: Option<String>,

    #[sea_orm(unique)]
    pub email: String,

    #[sea_orm(default_value = false)]
    pub email_verified: bool,

    /// Pending email verification token
    #[sea_orm(nullable)]
    pub verification_token: Option<String>,

    #[sea_orm(nullable)]
    pub verification_expires_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(nullable)]
    pub phone: Option<String>,

    /// Free-text address, "District-Thana" by convention
    #[sea_orm(nullable)]
    pub address: Option<String>,

    #[sea_orm(nullable)]
    pub district: Option<String>,

    #[sea_orm(nullable)]
    pub thana: Option<String>,

    /// Assigned station (police accounts only)
    #[sea_orm(nullable)]
    pub station: Option<String>,

    /// Badge number (police accounts only)
    #[sea_orm(nullable)]
    pub badge_number: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
