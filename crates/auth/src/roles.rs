use serde::{Deserialize, Serialize};

use pvz_core::{DomainError, DomainResult, ValueObject};

/// Fixed user role used for access control.
///
/// Roles are not persisted as entities; the numeric id is what stores keep.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Client,
    Moderator,
}

impl Role {
    pub const CLIENT_ID: i16 = 1;
    pub const MODERATOR_ID: i16 = 2;

    pub fn id(self) -> i16 {
        match self {
            Role::Client => Self::CLIENT_ID,
            Role::Moderator => Self::MODERATOR_ID,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Moderator => "moderator",
        }
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            Self::CLIENT_ID => Some(Role::Client),
            Self::MODERATOR_ID => Some(Role::Moderator),
            _ => None,
        }
    }

    /// Parse a role name as supplied by callers of the public API.
    ///
    /// Pickup-point staff are called "employee" externally; that name and the
    /// internal "client" both resolve to [`Role::Client`].
    pub fn from_name(name: &str) -> DomainResult<Self> {
        match name {
            "moderator" => Ok(Role::Moderator),
            "employee" | "client" => Ok(Role::Client),
            _ => Err(DomainError::UnknownRoleName),
        }
    }
}

impl ValueObject for Role {}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for role in [Role::Client, Role::Moderator] {
            assert_eq!(Role::from_id(role.id()), Some(role));
        }
        assert_eq!(Role::from_id(7), None);
    }

    #[test]
    fn employee_is_a_client() {
        assert_eq!(Role::from_name("employee"), Ok(Role::Client));
        assert_eq!(Role::from_name("moderator"), Ok(Role::Moderator));
        assert_eq!(Role::from_name("admin"), Err(DomainError::UnknownRoleName));
    }
}
