//! Registration, password login and dummy login.

use tracing::{info, instrument};

use pvz_auth::{AccessToken, Email, IdentityService, Role, User, dummy_user};
use pvz_core::{DomainError, DomainResult};

#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Clone)]
pub struct RegisterUser {
    identity: IdentityService,
}

impl RegisterUser {
    pub fn new(identity: IdentityService) -> Self {
        Self { identity }
    }

    /// Unrecognized role names register a client.
    #[instrument(skip_all, fields(role = %request.role))]
    pub async fn execute(&self, request: RegisterRequest) -> DomainResult<User> {
        let email = Email::parse(&request.email)?;
        if request.password.is_empty() {
            return Err(DomainError::PasswordIsRequired);
        }
        let role = Role::from_name(&request.role).unwrap_or(Role::Client);

        let user = self.identity.sign_up(email, &request.password, role).await?;
        info!(user_id = %user.id, role = %user.role, "user registered");
        Ok(user)
    }
}

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone)]
pub struct LoginUser {
    identity: IdentityService,
}

impl LoginUser {
    pub fn new(identity: IdentityService) -> Self {
        Self { identity }
    }

    #[instrument(skip_all)]
    pub async fn execute(&self, request: LoginRequest) -> DomainResult<AccessToken> {
        let email = Email::parse(&request.email)?;
        if request.password.is_empty() {
            return Err(DomainError::PasswordIsRequired);
        }

        self.identity.sign_in(&email, &request.password).await
    }
}

/// Token for one of the pre-provisioned accounts, no password needed.
#[derive(Clone)]
pub struct DummyLogin {
    identity: IdentityService,
}

impl DummyLogin {
    pub fn new(identity: IdentityService) -> Self {
        Self { identity }
    }

    #[instrument(skip(self))]
    pub fn execute(&self, role: &str) -> DomainResult<AccessToken> {
        let role = Role::from_name(role)?;
        self.identity.issue_token(dummy_user(role).id)
    }
}
