//! Domain error model.

use thiserror::Error;

/// Result type used across the domain and use-case layers.
pub type DomainResult<T> = Result<T, DomainError>;

/// Coarse classification of a [`DomainError`].
///
/// Transport adapters only need to tell access failures apart from everything
/// else; the remaining kinds exist so logs and tests can reason about failures
/// without matching on every variant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Authentication or role check failed.
    AccessDenied,
    /// A referenced entity does not exist.
    NotFound,
    /// Malformed or missing input.
    InvalidArgument,
    /// The operation would violate a lifecycle invariant.
    ConflictingState,
    /// Storage or credential-service failure.
    Infrastructure,
}

/// Domain-level error.
///
/// Entity methods return the most specific variant; use cases propagate these
/// verbatim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("user has insufficient privileges")]
    InsufficientPrivileges,

    #[error("bad user credentials")]
    BadUserCredential,

    #[error("pvz was not found")]
    PvzDoesNotExist,

    #[error("user does not exists")]
    UserDoesNotExist,

    #[error("reception does not exists")]
    ReceptionDoesNotExist,

    #[error("id is required")]
    IdIsRequired,

    #[error("registration time is required for creation")]
    RegistrationTimeIsRequired,

    #[error("unknown city")]
    UnknownCity,

    #[error("unknown product category")]
    UnknownProductCategory,

    #[error("unknown user role")]
    UnknownRoleName,

    #[error("email is invalid")]
    InvalidEmail,

    #[error("password is required")]
    PasswordIsRequired,

    #[error("email is already registered")]
    EmailAlreadyRegistered,

    #[error("pvz with this id already exists")]
    PvzAlreadyExists,

    #[error("pvz has another receptions opened")]
    AnotherOpenedReception,

    #[error("all receptions are closed at this pvz")]
    AllReceptionsAreClosed,

    #[error("reception is already closed")]
    ReceptionAlreadyClosed,

    #[error("no products in reception")]
    ReceptionIsEmpty,

    /// Underlying storage or credential-service failure.
    #[error("infrastructure failure: {0}")]
    Infrastructure(String),
}

impl DomainError {
    pub fn infrastructure(msg: impl Into<String>) -> Self {
        Self::Infrastructure(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InsufficientPrivileges | Self::BadUserCredential => ErrorKind::AccessDenied,

            Self::PvzDoesNotExist | Self::UserDoesNotExist | Self::ReceptionDoesNotExist => {
                ErrorKind::NotFound
            }

            Self::IdIsRequired
            | Self::RegistrationTimeIsRequired
            | Self::UnknownCity
            | Self::UnknownProductCategory
            | Self::UnknownRoleName
            | Self::InvalidEmail
            | Self::PasswordIsRequired
            | Self::EmailAlreadyRegistered => ErrorKind::InvalidArgument,

            Self::PvzAlreadyExists
            | Self::AnotherOpenedReception
            | Self::AllReceptionsAreClosed
            | Self::ReceptionAlreadyClosed
            | Self::ReceptionIsEmpty => ErrorKind::ConflictingState,

            Self::Infrastructure(_) => ErrorKind::Infrastructure,
        }
    }

    /// The one classification transport adapters rely on.
    pub fn is_access_error(&self) -> bool {
        self.kind() == ErrorKind::AccessDenied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_errors_are_classified_as_access_denied() {
        assert!(DomainError::InsufficientPrivileges.is_access_error());
        assert!(DomainError::BadUserCredential.is_access_error());
        assert!(!DomainError::PvzDoesNotExist.is_access_error());
        assert!(!DomainError::infrastructure("db down").is_access_error());
    }

    #[test]
    fn lifecycle_errors_are_conflicting_state() {
        for err in [
            DomainError::AnotherOpenedReception,
            DomainError::AllReceptionsAreClosed,
            DomainError::ReceptionAlreadyClosed,
            DomainError::ReceptionIsEmpty,
        ] {
            assert_eq!(err.kind(), ErrorKind::ConflictingState, "{err}");
        }
    }

    #[test]
    fn messages_are_stable() {
        assert_eq!(
            DomainError::AnotherOpenedReception.to_string(),
            "pvz has another receptions opened"
        );
        assert_eq!(DomainError::IdIsRequired.to_string(), "id is required");
    }
}
