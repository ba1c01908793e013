//! The privilege gate every use case passes through first.

use tracing::warn;

use pvz_auth::{AccessToken, IdentityService, Role, User, authorize};
use pvz_core::DomainResult;

#[derive(Clone)]
pub struct Authenticator {
    identity: IdentityService,
}

impl Authenticator {
    pub fn new(identity: IdentityService) -> Self {
        Self { identity }
    }

    /// Resolve `token` to a user and check the user's role against `allowed`.
    ///
    /// An empty `allowed` only requires authentication.
    pub async fn validate_privileges(&self, token: &AccessToken, allowed: &[Role]) -> DomainResult<User> {
        let user = self.identity.user_from_token(token).await?;

        if let Err(e) = authorize(user.role, allowed) {
            warn!(user_id = %user.id, role = %user.role, ?allowed, "role not permitted");
            return Err(e);
        }

        Ok(user)
    }
}
