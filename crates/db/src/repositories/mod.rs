//! Database repositories.

mod notification;
mod police_station;
mod registration_approval;
mod report;
mod user;
mod user_profile;
mod validation;

pub use notification::NotificationRepository;
pub use police_station::PoliceStationRepository;
pub use registration_approval::RegistrationApprovalRepository;
pub use report::ReportRepository;
pub use user::UserRepository;
pub use user_profile::UserProfileRepository;
pub use validation::ValidationRepository;
