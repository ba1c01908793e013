//! Pre-provisioned users backing password-less dummy login.
//!
//! Every store seeds these two accounts so that tokens issued for them resolve.

use uuid::Uuid;

use pvz_core::UserId;

use crate::{Email, Role, User};

pub const DUMMY_MODERATOR_ID: UserId =
    UserId::from_uuid(Uuid::from_u128(0x0196521c_b2a9_7a04_88be_16ec981d104b));
pub const DUMMY_EMPLOYEE_ID: UserId =
    UserId::from_uuid(Uuid::from_u128(0x0196521c_873e_77fd_b244_bdd0c13c72ab));

/// The fixed account for `role`.
///
/// The password hash is empty, so password login never succeeds for it.
pub fn dummy_user(role: Role) -> User {
    let (id, email) = match role {
        Role::Moderator => (DUMMY_MODERATOR_ID, "moderator@dummy.pvz"),
        Role::Client => (DUMMY_EMPLOYEE_ID, "employee@dummy.pvz"),
    };
    User {
        id,
        email: Email::trusted(email),
        password_hash: String::new(),
        role,
    }
}

pub fn dummy_users() -> [User; 2] {
    [dummy_user(Role::Moderator), dummy_user(Role::Client)]
}
