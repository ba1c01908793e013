//! Sign-up, sign-in and token-to-user resolution.

use std::sync::Arc;

use tracing::{error, warn};

use pvz_core::{DomainError, DomainResult, UserId};

use crate::{AccessToken, Email, PasswordService, Role, TokenService, User, UserStore};

/// Identity service composed from a user store, a token service and a
/// password service.
#[derive(Clone)]
pub struct IdentityService {
    users: Arc<dyn UserStore>,
    tokens: Arc<dyn TokenService>,
    passwords: Arc<dyn PasswordService>,
}

impl IdentityService {
    pub fn new(
        users: Arc<dyn UserStore>,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        Self { users, tokens, passwords }
    }

    /// Register a user with a hashed credential.
    pub async fn sign_up(&self, email: Email, password: &str, role: Role) -> DomainResult<User> {
        match self.users.find_by_email(&email).await {
            Ok(_) => return Err(DomainError::EmailAlreadyRegistered),
            Err(DomainError::UserDoesNotExist) => {}
            Err(e) => return Err(e),
        }

        let hash = self.passwords.hash(password).map_err(|e| {
            error!(error = %e, "password hashing failed");
            DomainError::infrastructure("could not register user")
        })?;

        let mut user = User::new(email, hash);
        if role == Role::Moderator {
            user.grant_moderator();
        }

        self.users.add(&user).await?;
        Ok(user)
    }

    /// Check a credential and issue a token.
    ///
    /// Unknown emails and wrong passwords are indistinguishable to the caller.
    pub async fn sign_in(&self, email: &Email, password: &str) -> DomainResult<AccessToken> {
        let user = match self.users.find_by_email(email).await {
            Ok(user) => user,
            Err(DomainError::UserDoesNotExist) => return Err(DomainError::BadUserCredential),
            Err(e) => return Err(e),
        };

        match self.passwords.verify(password, &user.password_hash) {
            Ok(true) => {}
            Ok(false) => return Err(DomainError::BadUserCredential),
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "stored credential could not be checked");
                return Err(DomainError::BadUserCredential);
            }
        }

        self.issue_token(user.id)
    }

    pub fn issue_token(&self, user_id: UserId) -> DomainResult<AccessToken> {
        self.tokens.issue(user_id).map_err(|e| {
            error!(%user_id, error = %e, "token issuance failed");
            DomainError::infrastructure("could not authorize user")
        })
    }

    /// Resolve a presented token to the user it was issued for.
    ///
    /// Empty, malformed, expired and unresolvable tokens, and tokens naming a
    /// user that no longer exists, all fail with `InsufficientPrivileges`.
    pub async fn user_from_token(&self, token: &AccessToken) -> DomainResult<User> {
        if token.is_empty() {
            return Err(DomainError::InsufficientPrivileges);
        }

        let user_id = self.tokens.resolve(token).map_err(|e| {
            warn!(error = %e, "rejected access token");
            DomainError::InsufficientPrivileges
        })?;

        match self.users.find_by_id(user_id).await {
            Ok(user) => Ok(user),
            Err(DomainError::UserDoesNotExist) => {
                warn!(%user_id, "token names unknown user");
                Err(DomainError::InsufficientPrivileges)
            }
            Err(e) => {
                error!(%user_id, error = %e, "user lookup failed");
                Err(e)
            }
        }
    }
}
