pub mod emergency_contact_repository;
pub mod profile_repository;
pub mod user_repository;

pub use emergency_contact_repository::EmergencyContactRepository;
pub use profile_repository::ProfileRepository;
pub use user_repository::UserRepository;
