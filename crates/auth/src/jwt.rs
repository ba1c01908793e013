//! HS256 JWT implementation of [`TokenService`].

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use pvz_core::UserId;

use crate::claims::{JwtClaims, TokenValidationError, validate_claims};
use crate::token::{AccessToken, TokenError, TokenService};

pub struct JwtManager {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    ttl: Duration,
}

impl JwtManager {
    pub fn new(secret: &[u8], issuer: impl Into<String>, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            issuer: issuer.into(),
            ttl,
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation
    }

    fn decode(&self, token: &AccessToken) -> Result<JwtClaims, TokenError> {
        let data = jsonwebtoken::decode::<JwtClaims>(token.as_str(), &self.decoding, &self.validation())
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed(e.to_string()),
            })?;

        validate_claims(&data.claims, Utc::now()).map_err(|e| match e {
            TokenValidationError::Expired => TokenError::Expired,
            other => TokenError::Malformed(other.to_string()),
        })?;

        Ok(data.claims)
    }
}

impl core::fmt::Debug for JwtManager {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("JwtManager")
            .field("issuer", &self.issuer)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService for JwtManager {
    fn issue(&self, user_id: UserId) -> Result<AccessToken, TokenError> {
        let claims = JwtClaims::new(user_id.to_string(), self.issuer.clone(), Utc::now(), self.ttl);

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map(AccessToken::new)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    fn resolve(&self, token: &AccessToken) -> Result<UserId, TokenError> {
        let claims = self.decode(token)?;
        let uuid = Uuid::parse_str(&claims.user_id).map_err(|_| TokenError::Unresolvable)?;
        Ok(UserId::from_uuid(uuid))
    }
}
