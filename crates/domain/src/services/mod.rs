pub mod contact_service;
pub mod dashboard_service;
pub mod profile_service;
pub mod user_service;

pub use contact_service::EmergencyContactService;
pub use dashboard_service::{DashboardService, UserProfile};
pub use profile_service::{DonorProfileRequest, ProfileService, ReceiverProfileRequest};
pub use user_service::{LoginOutcome, Registration, UserService};
