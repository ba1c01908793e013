use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pvz_core::{DomainError, DomainResult, Entity, ProductId, ReceptionId, ValueObject};

/// Category a product is registered under.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductCategory {
    Electronics,
    Clothes,
    Shoes,
}

impl ProductCategory {
    pub const ALL: [ProductCategory; 3] = [
        ProductCategory::Electronics,
        ProductCategory::Clothes,
        ProductCategory::Shoes,
    ];

    pub fn code(self) -> i16 {
        match self {
            ProductCategory::Electronics => 1,
            ProductCategory::Clothes => 2,
            ProductCategory::Shoes => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ProductCategory::Electronics => "электроника",
            ProductCategory::Clothes => "одежда",
            ProductCategory::Shoes => "обувь",
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    /// Exact (case-sensitive) lookup by name.
    pub fn from_name(name: &str) -> DomainResult<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == name)
            .ok_or(DomainError::UnknownProductCategory)
    }
}

impl ValueObject for ProductCategory {}

/// A product registered within a reception.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub reception_id: ReceptionId,
    pub created_at: DateTime<Utc>,
    pub category: ProductCategory,
}

impl Product {
    pub(crate) fn new(reception_id: ReceptionId, category: ProductCategory, now: DateTime<Utc>) -> Self {
        Self {
            id: ProductId::new(),
            reception_id,
            created_at: now,
            category,
        }
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
