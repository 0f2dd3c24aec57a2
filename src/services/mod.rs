use pushkind_common::repository::errors::RepositoryError;
use thiserror::Error;

use crate::domain::order::{InvalidTransition, ItemStatus};

pub mod brands;
pub mod categories;
pub mod coupons;
pub mod customers;
pub mod offers;
pub mod orders;
pub mod products;
pub mod reports;

/// Result type returned by every service function.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failures surfaced by the service layer to the route handlers.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,
    /// Submitted data failed validation.
    #[error("{0}")]
    Form(String),
    #[error("not found")]
    NotFound,
    /// A record with the same name or code already exists.
    #[error("duplicate")]
    Duplicate,
    #[error("invalid status change from {from} to {to}")]
    InvalidTransition { from: ItemStatus, to: ItemStatus },
    #[error("invalid date filter: {0}")]
    InvalidFilter(String),
    #[error("invalid export format `{0}`")]
    InvalidFormat(String),
    #[error("store failure: {0}")]
    StoreFailure(RepositoryError),
    /// Rendering or writing an artifact failed.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::StoreFailure(other),
        }
    }
}

impl From<InvalidTransition> for ServiceError {
    fn from(value: InvalidTransition) -> Self {
        ServiceError::InvalidTransition {
            from: value.from,
            to: value.to,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{NaiveDate, NaiveDateTime};
    use pushkind_common::domain::auth::AuthenticatedUser;

    use crate::SERVICE_ACCESS_ROLE;

    pub fn fixed_datetime() -> NaiveDateTime {
        match NaiveDate::from_ymd_opt(2024, 1, 1) {
            Some(date) => date.and_hms_opt(0, 0, 0).unwrap_or_default(),
            None => NaiveDateTime::default(),
        }
    }

    pub fn user_with_roles(roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "1".to_string(),
            email: "admin@example.com".to_string(),
            hub_id: 1,
            name: "Admin".to_string(),
            roles: roles.iter().map(|role| role.to_string()).collect(),
            exp: 0,
        }
    }

    pub fn admin() -> AuthenticatedUser {
        user_with_roles(&[SERVICE_ACCESS_ROLE])
    }
}
