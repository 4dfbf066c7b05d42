//! Business logic services.

pub mod alert;
pub mod email;
pub mod notification;
pub mod registration_approval;
pub mod report;
pub mod station;
pub mod user;
pub mod validation;

pub use alert::{ActiveAlert, AlertService};
pub use email::EmailService;
pub use notification::NotificationService;
pub use registration_approval::RegistrationApprovalService;
pub use report::{CreateReportInput, ReportService};
pub use station::{DistrictStations, StationService};
pub use user::{CreateUserInput, LoginInput, UpdateProfileInput, UserService};
pub use validation::{POLICE_POINTS_ADJUSTMENT, ValidationService, VoteSummary};
