//! Opaque access tokens and the service that issues and resolves them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use pvz_core::UserId;

/// Credential presented by a caller.
///
/// The domain never looks inside: the format belongs to whichever
/// [`TokenService`] issued it.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The token a caller presents when they present nothing.
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Bad signature, bad encoding, wrong issuer or invalid claims.
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token has expired")]
    Expired,

    /// The token verified but does not name a resolvable user id.
    #[error("token subject cannot be resolved")]
    Unresolvable,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Issues tokens for user ids and resolves them back.
pub trait TokenService: Send + Sync {
    fn issue(&self, user_id: UserId) -> Result<AccessToken, TokenError>;

    fn resolve(&self, token: &AccessToken) -> Result<UserId, TokenError>;
}
