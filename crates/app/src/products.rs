use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};

use pvz_auth::{AccessToken, Role};
use pvz_core::{DomainError, DomainResult, PvzId};
use pvz_domain::{PickupPointStore, Product, ProductCategory, ProductStore, ReceptionStore};

use crate::{Authenticator, PickupPointLocks};

#[derive(Debug, Clone)]
pub struct AddProductRequest {
    pub pvz_id: PvzId,
    pub category: String,
}

/// Register a product in the reception in progress. Clients only.
#[derive(Clone)]
pub struct AddProduct {
    auth: Authenticator,
    pickup_points: Arc<dyn PickupPointStore>,
    receptions: Arc<dyn ReceptionStore>,
    products: Arc<dyn ProductStore>,
    locks: PickupPointLocks,
}

impl AddProduct {
    pub fn new(
        auth: Authenticator,
        pickup_points: Arc<dyn PickupPointStore>,
        receptions: Arc<dyn ReceptionStore>,
        products: Arc<dyn ProductStore>,
        locks: PickupPointLocks,
    ) -> Self {
        Self { auth, pickup_points, receptions, products, locks }
    }

    #[instrument(skip_all, fields(pvz_id = %request.pvz_id, category = %request.category))]
    pub async fn execute(&self, token: &AccessToken, request: AddProductRequest) -> DomainResult<Product> {
        self.auth.validate_privileges(token, &[Role::Client]).await?;

        let category = ProductCategory::from_name(&request.category)?;
        if request.pvz_id.is_nil() {
            return Err(DomainError::IdIsRequired);
        }

        // Unknown ids fail here and never reach the lock map.
        let pickup_point = self.pickup_points.find_by_id(request.pvz_id).await?;
        let _guard = self.locks.lock(request.pvz_id).await;
        let reception = pickup_point.current_reception(&*self.receptions).await?;
        let product = reception.add_product(category, &*self.products, Utc::now()).await?;

        info!(product_id = %product.id, reception_id = %reception.id, "product added");
        Ok(product)
    }
}

/// Remove the most recently added product of the reception in progress.
/// Clients only.
#[derive(Clone)]
pub struct RemoveLastProduct {
    auth: Authenticator,
    pickup_points: Arc<dyn PickupPointStore>,
    receptions: Arc<dyn ReceptionStore>,
    products: Arc<dyn ProductStore>,
    locks: PickupPointLocks,
}

impl RemoveLastProduct {
    pub fn new(
        auth: Authenticator,
        pickup_points: Arc<dyn PickupPointStore>,
        receptions: Arc<dyn ReceptionStore>,
        products: Arc<dyn ProductStore>,
        locks: PickupPointLocks,
    ) -> Self {
        Self { auth, pickup_points, receptions, products, locks }
    }

    #[instrument(skip_all, fields(%pvz_id))]
    pub async fn execute(&self, token: &AccessToken, pvz_id: PvzId) -> DomainResult<()> {
        self.auth.validate_privileges(token, &[Role::Client]).await?;
        if pvz_id.is_nil() {
            return Err(DomainError::IdIsRequired);
        }

        let pickup_point = self.pickup_points.find_by_id(pvz_id).await?;
        let _guard = self.locks.lock(pvz_id).await;
        let reception = pickup_point.current_reception(&*self.receptions).await?;
        let removed = reception.remove_last_product(&*self.products).await?;

        info!(product_id = %removed.id, reception_id = %reception.id, "product removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use pvz_auth::{DUMMY_EMPLOYEE_ID, JwtManager, TokenService};
    use pvz_domain::ProductStore;

    use super::*;
    use crate::testing::Harness;

    fn add(pvz_id: PvzId, category: &str) -> AddProductRequest {
        AddProductRequest { pvz_id, category: category.to_string() }
    }

    #[tokio::test]
    async fn product_lands_in_open_reception() {
        let h = Harness::new();
        let pvz = h.pickup_point().await;
        let client = h.client_token();
        let reception = h.use_cases.create_reception.execute(&client, pvz.id).await.unwrap();

        let product = h
            .use_cases
            .add_product
            .execute(&client, add(pvz.id, "электроника"))
            .await
            .unwrap();

        assert_eq!(product.category, ProductCategory::Electronics);
        assert_eq!(product.reception_id, reception.id);
        let stored = ProductStore::find_all_by_reception(&*h.store, reception.id).await.unwrap();
        assert_eq!(stored, vec![product]);
    }

    #[tokio::test]
    async fn closed_reception_takes_no_more_products() {
        let h = Harness::new();
        let pvz = h.pickup_point().await;
        let client = h.client_token();
        h.use_cases.create_reception.execute(&client, pvz.id).await.unwrap();
        h.use_cases.add_product.execute(&client, add(pvz.id, "электроника")).await.unwrap();
        h.use_cases.close_last_reception.execute(&client, pvz.id).await.unwrap();

        assert_eq!(
            h.use_cases.add_product.execute(&client, add(pvz.id, "одежда")).await,
            Err(DomainError::AllReceptionsAreClosed)
        );
        assert_eq!(
            h.use_cases.remove_last_product.execute(&client, pvz.id).await,
            Err(DomainError::AllReceptionsAreClosed)
        );
    }

    #[tokio::test]
    async fn unknown_category_is_rejected() {
        let h = Harness::new();
        let pvz = h.pickup_point().await;
        let client = h.client_token();
        h.use_cases.create_reception.execute(&client, pvz.id).await.unwrap();

        for category in ["Электроника", "books", ""] {
            assert_eq!(
                h.use_cases.add_product.execute(&client, add(pvz.id, category)).await,
                Err(DomainError::UnknownProductCategory),
                "{category:?}"
            );
        }
    }

    #[tokio::test]
    async fn moderator_cannot_touch_products() {
        let h = Harness::new();
        let pvz = h.pickup_point().await;
        let moderator = h.moderator_token();

        let err = h.use_cases.add_product.execute(&moderator, add(pvz.id, "обувь")).await.unwrap_err();
        assert!(err.is_access_error());
        let err = h.use_cases.remove_last_product.execute(&moderator, pvz.id).await.unwrap_err();
        assert!(err.is_access_error());
        let err = h
            .use_cases
            .remove_last_product
            .execute(&AccessToken::empty(), pvz.id)
            .await
            .unwrap_err();
        assert!(err.is_access_error());
    }

    #[tokio::test]
    async fn unauthenticated_caller_cannot_add_products() {
        let h = Harness::new();
        let pvz = h.pickup_point().await;
        let reception = h.use_cases.create_reception.execute(&h.client_token(), pvz.id).await.unwrap();
        let foreign = JwtManager::new(b"another-secret", "pvz-test", Duration::minutes(5))
            .issue(DUMMY_EMPLOYEE_ID)
            .unwrap();

        for token in [AccessToken::empty(), AccessToken::new("not-a-jwt"), foreign] {
            let err = h.use_cases.add_product.execute(&token, add(pvz.id, "обувь")).await.unwrap_err();
            assert!(err.is_access_error(), "{err:?}");
        }
        let stored = ProductStore::find_all_by_reception(&*h.store, reception.id).await.unwrap();
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn unknown_pickup_points_leave_no_lock_entries() {
        let h = Harness::new();
        let client = h.client_token();

        for _ in 0..1000 {
            assert_eq!(
                h.use_cases.add_product.execute(&client, add(PvzId::new(), "обувь")).await,
                Err(DomainError::PvzDoesNotExist)
            );
            assert_eq!(
                h.use_cases.remove_last_product.execute(&client, PvzId::new()).await,
                Err(DomainError::PvzDoesNotExist)
            );
        }
        assert_eq!(h.use_cases.add_product.locks.len(), 0);
    }

    #[tokio::test]
    async fn remove_takes_latest_product_first() {
        let h = Harness::new();
        let pvz = h.pickup_point().await;
        let client = h.client_token();
        let reception = h.use_cases.create_reception.execute(&client, pvz.id).await.unwrap();
        let first = h.use_cases.add_product.execute(&client, add(pvz.id, "электроника")).await.unwrap();
        h.use_cases.add_product.execute(&client, add(pvz.id, "одежда")).await.unwrap();

        h.use_cases.remove_last_product.execute(&client, pvz.id).await.unwrap();

        let left = ProductStore::find_all_by_reception(&*h.store, reception.id).await.unwrap();
        assert_eq!(left, vec![first]);
    }

    #[tokio::test]
    async fn remove_from_empty_reception_fails() {
        let h = Harness::new();
        let pvz = h.pickup_point().await;
        let client = h.client_token();
        h.use_cases.create_reception.execute(&client, pvz.id).await.unwrap();

        assert_eq!(
            h.use_cases.remove_last_product.execute(&client, pvz.id).await,
            Err(DomainError::ReceptionIsEmpty)
        );
    }
}
