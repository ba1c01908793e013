//! In-memory implementation of every store port, for tests and local runs.
//!
//! Mirrors the constraints the Postgres schema enforces: unique emails, unique
//! pickup-point ids, at most one reception in progress per pickup point, and
//! references between pickup points, receptions and products.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use pvz_auth::{Email, User, UserStore, dummy_users};
use pvz_core::{DomainError, DomainResult, PvzId, ReceptionId, UserId};
use pvz_domain::{
    PickupPoint, PickupPointReport, PickupPointStore, Product, ProductStore, Reception, ReceptionFilter,
    ReceptionReport, ReceptionStatus, ReceptionStore, ReportFilter, ReportStore, SortOrder,
};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    /// Kept in insertion order; the position plus one is the record number.
    pickup_points: Vec<PickupPoint>,
    receptions: HashMap<ReceptionId, Reception>,
    products: Vec<Product>,
}

#[derive(Debug)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    /// An empty store holding only the dummy-login accounts.
    pub fn new() -> Self {
        let users = dummy_users().into_iter().map(|u| (u.id, u)).collect();
        Self {
            tables: RwLock::new(Tables { users, ..Tables::default() }),
        }
    }

    fn read(&self) -> DomainResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| DomainError::infrastructure("in-memory store lock poisoned"))
    }

    fn write(&self) -> DomainResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| DomainError::infrastructure("in-memory store lock poisoned"))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_by_id(&self, id: UserId) -> DomainResult<User> {
        self.read()?.users.get(&id).cloned().ok_or(DomainError::UserDoesNotExist)
    }

    async fn find_by_email(&self, email: &Email) -> DomainResult<User> {
        self.read()?
            .users
            .values()
            .find(|u| &u.email == email)
            .cloned()
            .ok_or(DomainError::UserDoesNotExist)
    }

    async fn add(&self, user: &User) -> DomainResult<()> {
        let mut tables = self.write()?;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(DomainError::EmailAlreadyRegistered);
        }
        tables.users.insert(user.id, user.clone());
        Ok(())
    }
}

#[async_trait]
impl PickupPointStore for InMemoryStore {
    async fn add(&self, pickup_point: &PickupPoint) -> DomainResult<()> {
        let mut tables = self.write()?;
        if tables.pickup_points.iter().any(|p| p.id == pickup_point.id) {
            return Err(DomainError::PvzAlreadyExists);
        }
        tables.pickup_points.push(pickup_point.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: PvzId) -> DomainResult<PickupPoint> {
        self.read()?
            .pickup_points
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(DomainError::PvzDoesNotExist)
    }
}

#[async_trait]
impl ReceptionStore for InMemoryStore {
    async fn add(&self, reception: &Reception) -> DomainResult<()> {
        let mut tables = self.write()?;
        if !tables.pickup_points.iter().any(|p| p.id == reception.pvz_id) {
            return Err(DomainError::PvzDoesNotExist);
        }
        let another_open = reception.status == ReceptionStatus::InProgress
            && tables
                .receptions
                .values()
                .any(|r| r.pvz_id == reception.pvz_id && r.status == ReceptionStatus::InProgress);
        if another_open {
            return Err(DomainError::AnotherOpenedReception);
        }
        tables.receptions.insert(reception.id, reception.clone());
        Ok(())
    }

    async fn update(&self, reception: &Reception) -> DomainResult<()> {
        let mut tables = self.write()?;
        let slot = tables
            .receptions
            .get_mut(&reception.id)
            .ok_or(DomainError::ReceptionDoesNotExist)?;
        *slot = reception.clone();
        Ok(())
    }

    async fn find_all(&self, filter: &ReceptionFilter) -> DomainResult<Vec<Reception>> {
        let mut found: Vec<Reception> = self
            .read()?
            .receptions
            .values()
            .filter(|r| r.pvz_id == filter.pvz_id && r.status == filter.status)
            .cloned()
            .collect();

        found.sort_by_key(|r| (r.created_at, r.id));
        if filter.order == SortOrder::Descending {
            found.reverse();
        }
        found.truncate(filter.limit);
        Ok(found)
    }
}

#[async_trait]
impl ProductStore for InMemoryStore {
    async fn add(&self, product: &Product) -> DomainResult<()> {
        let mut tables = self.write()?;
        if !tables.receptions.contains_key(&product.reception_id) {
            return Err(DomainError::ReceptionDoesNotExist);
        }
        tables.products.push(product.clone());
        Ok(())
    }

    async fn remove(&self, product: &Product) -> DomainResult<()> {
        self.write()?.products.retain(|p| p.id != product.id);
        Ok(())
    }

    async fn find_all_by_reception(&self, reception_id: ReceptionId) -> DomainResult<Vec<Product>> {
        Ok(self
            .read()?
            .products
            .iter()
            .filter(|p| p.reception_id == reception_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ReportStore for InMemoryStore {
    async fn find_all(&self, filter: &ReportFilter) -> DomainResult<Vec<PickupPointReport>> {
        let tables = self.read()?;
        let skip = usize::try_from(filter.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(filter.limit).unwrap_or(usize::MAX);

        let reports = tables
            .pickup_points
            .iter()
            .skip(skip)
            .take(take)
            .map(|pickup_point| {
                let mut receptions: Vec<&Reception> = tables
                    .receptions
                    .values()
                    .filter(|r| r.pvz_id == pickup_point.id && filter.window.contains(r.created_at))
                    .collect();
                receptions.sort_by_key(|r| (r.created_at, r.id));

                let receptions = receptions
                    .into_iter()
                    .map(|reception| {
                        let mut products: Vec<Product> = tables
                            .products
                            .iter()
                            .filter(|p| p.reception_id == reception.id)
                            .cloned()
                            .collect();
                        products.sort_by_key(|p| (p.created_at, p.id));
                        ReceptionReport { reception: reception.clone(), products }
                    })
                    .collect();

                PickupPointReport { pickup_point: pickup_point.clone(), receptions }
            })
            .collect();

        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use proptest::prelude::*;

    use pvz_auth::{DUMMY_EMPLOYEE_ID, DUMMY_MODERATOR_ID, Role};
    use pvz_domain::{City, ProductCategory};

    use super::*;

    fn pickup_point(store: &InMemoryStore) -> PickupPoint {
        let pvz = PickupPoint::new(PvzId::new(), City::Kazan, Utc::now()).unwrap();
        block_on(PickupPointStore::add(store, &pvz)).unwrap();
        pvz
    }

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
    }

    fn reception(pvz_id: PvzId, status: ReceptionStatus, created_at: chrono::DateTime<Utc>) -> Reception {
        Reception { id: ReceptionId::new(), pvz_id, created_at, status }
    }

    #[tokio::test]
    async fn dummy_users_are_seeded() {
        let store = InMemoryStore::new();
        assert_eq!(UserStore::find_by_id(&store, DUMMY_MODERATOR_ID).await.unwrap().role, Role::Moderator);
        assert_eq!(UserStore::find_by_id(&store, DUMMY_EMPLOYEE_ID).await.unwrap().role, Role::Client);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = InMemoryStore::new();
        let user = User::new(Email::parse("a@b.c").unwrap(), "h".to_string());
        UserStore::add(&store, &user).await.unwrap();

        let again = User::new(Email::parse("a@b.c").unwrap(), "h".to_string());
        assert_eq!(UserStore::add(&store, &again).await, Err(DomainError::EmailAlreadyRegistered));
        assert_eq!(
            UserStore::find_by_email(&store, &Email::parse("x@b.c").unwrap()).await,
            Err(DomainError::UserDoesNotExist)
        );
    }

    #[test]
    fn second_open_reception_is_rejected() {
        let store = InMemoryStore::new();
        let pvz = pickup_point(&store);
        let now = Utc::now();

        block_on(async {
            ReceptionStore::add(&store, &reception(pvz.id, ReceptionStatus::InProgress, now)).await.unwrap();
            assert_eq!(
                ReceptionStore::add(&store, &reception(pvz.id, ReceptionStatus::InProgress, now)).await,
                Err(DomainError::AnotherOpenedReception)
            );
            ReceptionStore::add(&store, &reception(pvz.id, ReceptionStatus::Closed, now)).await.unwrap();
        });
    }

    #[tokio::test]
    async fn references_are_checked() {
        let store = InMemoryStore::new();
        let orphan = reception(PvzId::new(), ReceptionStatus::InProgress, Utc::now());
        assert_eq!(ReceptionStore::add(&store, &orphan).await, Err(DomainError::PvzDoesNotExist));
        assert_eq!(ReceptionStore::update(&store, &orphan).await, Err(DomainError::ReceptionDoesNotExist));

        let product = Product {
            id: pvz_core::ProductId::new(),
            reception_id: orphan.id,
            created_at: Utc::now(),
            category: ProductCategory::Shoes,
        };
        assert_eq!(ProductStore::add(&store, &product).await, Err(DomainError::ReceptionDoesNotExist));
    }

    #[test]
    fn find_all_orders_and_limits() {
        let store = InMemoryStore::new();
        let pvz = pickup_point(&store);
        let base = Utc::now();

        let closed: Vec<Reception> = (0..3)
            .map(|i| reception(pvz.id, ReceptionStatus::Closed, base + Duration::seconds(i)))
            .collect();

        block_on(async {
            for r in &closed {
                ReceptionStore::add(&store, r).await.unwrap();
            }

            let filter = |order, limit| ReceptionFilter { pvz_id: pvz.id, status: ReceptionStatus::Closed, order, limit };
            let desc = ReceptionStore::find_all(&store, &filter(SortOrder::Descending, 2)).await.unwrap();
            assert_eq!(desc, vec![closed[2].clone(), closed[1].clone()]);

            let asc = ReceptionStore::find_all(&store, &filter(SortOrder::Ascending, 10)).await.unwrap();
            assert_eq!(asc, closed);
        });
    }

    #[tokio::test]
    async fn report_window_is_half_open() {
        let store = InMemoryStore::new();
        let pvz = PickupPoint::new(PvzId::new(), City::Moscow, Utc::now()).unwrap();
        PickupPointStore::add(&store, &pvz).await.unwrap();

        let start = Utc::now();
        let end = start + Duration::minutes(10);
        let at_start = reception(pvz.id, ReceptionStatus::Closed, start);
        let at_end = reception(pvz.id, ReceptionStatus::Closed, end);
        ReceptionStore::add(&store, &at_start).await.unwrap();
        ReceptionStore::add(&store, &at_end).await.unwrap();

        let filter = ReportFilter::normalize(Some(start), Some(end), 1, 10);
        let reports = ReportStore::find_all(&store, &filter).await.unwrap();

        assert_eq!(reports.len(), 1);
        let ids: Vec<ReceptionId> = reports[0].receptions.iter().map(|r| r.reception.id).collect();
        assert_eq!(ids, vec![at_start.id]);
    }

    proptest! {
        /// Walking every page yields each pickup point exactly once, in creation order.
        #[test]
        fn pages_partition_pickup_points(count in 0usize..25, limit in 1i64..8) {
            let store = InMemoryStore::new();
            let created: Vec<PvzId> = (0..count).map(|_| pickup_point(&store).id).collect();

            let mut seen = Vec::new();
            let mut page = 1;
            loop {
                let filter = ReportFilter::normalize(None, None, page, limit);
                let reports = block_on(ReportStore::find_all(&store, &filter)).unwrap();
                if reports.is_empty() {
                    break;
                }
                prop_assert!(reports.len() as i64 <= limit);
                seen.extend(reports.into_iter().map(|r| r.pickup_point.id));
                page += 1;
            }

            prop_assert_eq!(seen, created);
        }
    }
}
