use diesel::result::{DatabaseErrorKind, Error as DieselError};
use domain::DomainError;

/// Error type for closures run inside a diesel transaction: either a business
/// rule rejected the write or the database failed.
#[derive(Debug)]
pub enum StoreError {
    Domain(DomainError),
    Diesel(DieselError),
}

impl StoreError {
    /// Replaces a unique-constraint violation with `domain`, keeping other errors.
    pub fn unique_violation_as(err: DieselError, domain: DomainError) -> Self {
        match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => Self::Domain(domain),
            other => Self::Diesel(other),
        }
    }
}

impl From<DieselError> for StoreError {
    fn from(err: DieselError) -> Self {
        Self::Diesel(err)
    }
}

impl From<DomainError> for StoreError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Domain(err) => err,
            StoreError::Diesel(err) => DomainError::repository(err),
        }
    }
}
