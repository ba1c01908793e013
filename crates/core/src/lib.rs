//! `pvz-core`: shared domain building blocks.
//!
//! Identifiers, the entity/value-object markers and the error taxonomy used by
//! every other crate. No infrastructure concerns live here.

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult, ErrorKind};
pub use id::{ProductId, PvzId, ReceptionId, UserId};
pub use value_object::ValueObject;
