//! User entity and its email value object.

use serde::{Deserialize, Serialize};

use pvz_core::{DomainError, DomainResult, Entity, UserId, ValueObject};

use crate::Role;

/// A syntactically valid email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub const MAX_LENGTH: usize = 254;

    /// Validate and wrap an email address.
    ///
    /// Requires exactly one `@` with a non-empty local part and a domain, and no
    /// whitespace.
    pub fn parse(s: &str) -> DomainResult<Self> {
        if s.is_empty() || s.len() > Self::MAX_LENGTH || s.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidEmail);
        }

        let (local, domain) = s.split_once('@').ok_or(DomainError::InvalidEmail)?;
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(DomainError::InvalidEmail);
        }

        Ok(Self(s.to_owned()))
    }

    /// Wrap a literal known to be valid.
    pub(crate) fn trusted(s: &'static str) -> Self {
        Self(s.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for Email {}

impl core::fmt::Display for Email {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registered user.
///
/// The password is an opaque hash produced by a
/// [`PasswordService`](crate::PasswordService); this type never sees plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub password_hash: String,
    pub role: Role,
}

impl User {
    /// A freshly registered user is always a client.
    pub fn new(email: Email, password_hash: String) -> Self {
        Self {
            id: UserId::new(),
            email,
            password_hash,
            role: Role::Client,
        }
    }

    pub fn grant_moderator(&mut self) {
        self.role = Role::Moderator;
    }

    pub fn is_moderator(&self) -> bool {
        self.role == Role::Moderator
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
