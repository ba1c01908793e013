//! `pvz-auth`: identity, credentials and the role policy.
//!
//! This crate is decoupled from HTTP and storage: stores and token formats are
//! reached through the traits defined here.

pub mod authorize;
pub mod claims;
pub mod dummy;
pub mod identity;
pub mod jwt;
pub mod password;
pub mod roles;
pub mod store;
pub mod token;
pub mod user;

pub use authorize::authorize;
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use dummy::{DUMMY_EMPLOYEE_ID, DUMMY_MODERATOR_ID, dummy_user, dummy_users};
pub use identity::IdentityService;
pub use jwt::JwtManager;
pub use password::{Argon2PasswordService, PasswordError, PasswordService};
pub use roles::Role;
pub use store::UserStore;
pub use token::{AccessToken, TokenError, TokenService};
pub use user::{Email, User};
