pub mod sqlite_emergency_contact_repository;
pub mod sqlite_profile_repository;
pub mod sqlite_user_repository;

pub use sqlite_emergency_contact_repository::SqliteEmergencyContactRepository;
pub use sqlite_profile_repository::SqliteProfileRepository;
pub use sqlite_user_repository::SqliteUserRepository;
