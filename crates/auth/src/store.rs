use async_trait::async_trait;

use pvz_core::{DomainResult, UserId};

use crate::{Email, User};

/// User persistence port.
///
/// Lookups fail with [`DomainError::UserDoesNotExist`](pvz_core::DomainError)
/// when nothing matches; any other error is an infrastructure failure.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> DomainResult<User>;

    async fn find_by_email(&self, email: &Email) -> DomainResult<User>;

    /// Fails with `EmailAlreadyRegistered` if the email is taken.
    async fn add(&self, user: &User) -> DomainResult<()>;
}
