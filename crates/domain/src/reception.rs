use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pvz_core::{DomainError, DomainResult, Entity, PvzId, ReceptionId};

use crate::{Product, ProductCategory, ProductStore};

/// Reception lifecycle: `InProgress -> Closed`. Closed is terminal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReceptionStatus {
    InProgress,
    Closed,
}

impl ReceptionStatus {
    pub fn code(self) -> i16 {
        match self {
            ReceptionStatus::InProgress => 1,
            ReceptionStatus::Closed => 2,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            1 => Some(ReceptionStatus::InProgress),
            2 => Some(ReceptionStatus::Closed),
            _ => None,
        }
    }
}

/// A product-intake session at one pickup point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reception {
    pub id: ReceptionId,
    pub pvz_id: PvzId,
    pub created_at: DateTime<Utc>,
    pub status: ReceptionStatus,
}

impl Reception {
    pub(crate) fn open(pvz_id: PvzId, now: DateTime<Utc>) -> DomainResult<Self> {
        if pvz_id.is_nil() {
            return Err(DomainError::IdIsRequired);
        }
        Ok(Self {
            id: ReceptionId::new(),
            pvz_id,
            created_at: now,
            status: ReceptionStatus::InProgress,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.status == ReceptionStatus::Closed
    }

    fn ensure_open(&self) -> DomainResult<()> {
        if self.is_closed() {
            return Err(DomainError::ReceptionAlreadyClosed);
        }
        Ok(())
    }

    /// Only the status changes; id and creation time are kept.
    pub fn close(&mut self) -> DomainResult<()> {
        self.ensure_open()?;
        self.status = ReceptionStatus::Closed;
        Ok(())
    }

    pub async fn add_product(
        &self,
        category: ProductCategory,
        products: &dyn ProductStore,
        now: DateTime<Utc>,
    ) -> DomainResult<Product> {
        self.ensure_open()?;

        let product = Product::new(self.id, category, now);
        products.add(&product).await?;
        Ok(product)
    }

    /// Remove the most recently added product.
    pub async fn remove_last_product(&self, products: &dyn ProductStore) -> DomainResult<Product> {
        self.ensure_open()?;

        let all = products.find_all_by_reception(self.id).await?;
        let last = last_product(&all).cloned().ok_or(DomainError::ReceptionIsEmpty)?;

        products.remove(&last).await?;
        Ok(last)
    }
}

impl Entity for Reception {
    type Id = ReceptionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Latest product by creation time. Equal timestamps fall back to the id,
/// which is time-ordered, so the pick is deterministic.
pub fn last_product(products: &[Product]) -> Option<&Product> {
    products.iter().max_by_key(|p| (p.created_at, p.id))
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use proptest::prelude::*;

    use super::*;
    use crate::fakes::FakeProducts;

    fn open_reception() -> Reception {
        Reception::open(PvzId::new(), Utc::now()).unwrap()
    }

    #[test]
    fn close_is_terminal_and_keeps_identity() {
        let mut reception = open_reception();
        let (id, created_at) = (reception.id, reception.created_at);

        reception.close().unwrap();
        assert!(reception.is_closed());

        assert_eq!(reception.close(), Err(DomainError::ReceptionAlreadyClosed));
        assert_eq!(reception.id, id);
        assert_eq!(reception.created_at, created_at);
        assert_eq!(reception.status, ReceptionStatus::Closed);
    }

    #[tokio::test]
    async fn added_product_is_retrievable() {
        let reception = open_reception();
        let products = FakeProducts::default();

        let product = reception
            .add_product(ProductCategory::Electronics, &products, Utc::now())
            .await
            .unwrap();

        assert_eq!(product.reception_id, reception.id);
        let stored = products.find_all_by_reception(reception.id).await.unwrap();
        assert_eq!(stored, vec![product]);
    }

    #[tokio::test]
    async fn closed_reception_refuses_product_changes() {
        let mut reception = open_reception();
        let products = FakeProducts::default();
        reception
            .add_product(ProductCategory::Shoes, &products, Utc::now())
            .await
            .unwrap();
        reception.close().unwrap();

        assert_eq!(
            reception.add_product(ProductCategory::Clothes, &products, Utc::now()).await,
            Err(DomainError::ReceptionAlreadyClosed)
        );
        assert_eq!(
            reception.remove_last_product(&products).await,
            Err(DomainError::ReceptionAlreadyClosed)
        );
        assert_eq!(products.len(), 1);
    }

    #[tokio::test]
    async fn remove_last_product_is_lifo() {
        let reception = open_reception();
        let products = FakeProducts::default();
        let t1 = Utc::now();
        let first = reception
            .add_product(ProductCategory::Electronics, &products, t1)
            .await
            .unwrap();
        let second = reception
            .add_product(ProductCategory::Clothes, &products, t1 + Duration::seconds(1))
            .await
            .unwrap();

        let removed = reception.remove_last_product(&products).await.unwrap();
        assert_eq!(removed, second);

        let left = products.find_all_by_reception(reception.id).await.unwrap();
        assert_eq!(left, vec![first]);
    }

    #[tokio::test]
    async fn remove_from_empty_reception_fails() {
        let reception = open_reception();
        let products = FakeProducts::default();
        assert_eq!(
            reception.remove_last_product(&products).await,
            Err(DomainError::ReceptionIsEmpty)
        );
    }

    #[test]
    fn equal_timestamps_break_ties_by_id() {
        let reception = open_reception();
        let at = Utc::now();
        let a = Product::new(reception.id, ProductCategory::Shoes, at);
        let b = Product::new(reception.id, ProductCategory::Shoes, at);
        let expected = if a.id > b.id { a.id } else { b.id };

        assert_eq!(last_product(&[a.clone(), b.clone()]).map(|p| p.id), Some(expected));
        assert_eq!(last_product(&[b, a]).map(|p| p.id), Some(expected));
    }

    proptest! {
        #[test]
        fn last_product_has_latest_timestamp(offsets in proptest::collection::vec(0i64..10_000, 1..32)) {
            let reception = open_reception();
            let base = Utc::now();
            let products: Vec<Product> = offsets
                .iter()
                .map(|s| Product::new(reception.id, ProductCategory::Electronics, base + Duration::milliseconds(*s)))
                .collect();

            let last = last_product(&products).unwrap();
            prop_assert!(products.iter().all(|p| p.created_at <= last.created_at));
        }
    }
}
