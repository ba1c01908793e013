//! `sqlx::Error` to `DomainError` mapping.
//!
//! | SQLx error | Code / constraint | DomainError |
//! |------------|-------------------|-------------|
//! | unique violation | `23505` `receptions_one_open_per_pvz` | `AnotherOpenedReception` |
//! | unique violation | `23505` `users_email_key` | `EmailAlreadyRegistered` |
//! | unique violation | `23505` `pvzs_pkey` | `PvzAlreadyExists` |
//! | foreign key violation | `23503` `receptions_pvz_id_fkey` | `PvzDoesNotExist` |
//! | foreign key violation | `23503` `products_reception_id_fkey` | `ReceptionDoesNotExist` |
//! | anything else | | `Infrastructure` |

use tracing::error;

use pvz_core::DomainError;

pub(crate) const UNIQUE_VIOLATION: &str = "23505";
pub(crate) const FOREIGN_KEY_VIOLATION: &str = "23503";

pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        let code = db_err.code();
        let mapped = match (code.as_deref(), db_err.constraint()) {
            (Some(UNIQUE_VIOLATION), Some("receptions_one_open_per_pvz")) => {
                Some(DomainError::AnotherOpenedReception)
            }
            (Some(UNIQUE_VIOLATION), Some("users_email_key")) => Some(DomainError::EmailAlreadyRegistered),
            (Some(UNIQUE_VIOLATION), Some("pvzs_pkey")) => Some(DomainError::PvzAlreadyExists),
            (Some(FOREIGN_KEY_VIOLATION), Some("receptions_pvz_id_fkey")) => Some(DomainError::PvzDoesNotExist),
            (Some(FOREIGN_KEY_VIOLATION), Some("products_reception_id_fkey")) => {
                Some(DomainError::ReceptionDoesNotExist)
            }
            _ => None,
        };
        if let Some(mapped) = mapped {
            return mapped;
        }
    }

    error!(operation, error = %err, "database operation failed");
    DomainError::infrastructure(format!("database error in {operation}"))
}

/// Row decoding failure: a column is missing or holds an unknown code.
pub(crate) fn corrupt_row(operation: &str, detail: impl core::fmt::Display) -> DomainError {
    error!(operation, %detail, "unexpected row shape");
    DomainError::infrastructure(format!("unexpected row in {operation}"))
}
