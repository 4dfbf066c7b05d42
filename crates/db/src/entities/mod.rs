//! Database entities.

pub mod notification;
pub mod police_station;
pub mod registration_approval;
pub mod report;
pub mod user;
pub mod user_profile;
pub mod validation;

pub use notification::Entity as Notification;
pub use police_station::Entity as PoliceStation;
pub use registration_approval::Entity as RegistrationApproval;
pub use report::Entity as Report;
pub use user::Entity as User;
pub use user_profile::Entity as UserProfile;
pub use validation::Entity as Validation;
