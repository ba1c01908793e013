use pvz_core::{DomainError, DomainResult};

use crate::Role;

/// Check a resolved role against the roles an operation accepts.
///
/// An empty `allowed` set means any authenticated user passes.
///
/// - No IO
/// - No panics
pub fn authorize(role: Role, allowed: &[Role]) -> DomainResult<()> {
    if allowed.is_empty() || allowed.contains(&role) {
        Ok(())
    } else {
        Err(DomainError::InsufficientPrivileges)
    }
}
