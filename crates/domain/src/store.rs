//! Persistence ports consumed by the domain and use-case layers.
//!
//! Each port is one narrow capability; use cases depend on exactly the ports
//! they need. Referential integrity is the implementation's job.

use async_trait::async_trait;

use pvz_core::{DomainResult, PvzId, ReceptionId};

use crate::{PickupPoint, PickupPointReport, Product, Reception, ReceptionStatus, ReportFilter};

#[async_trait]
pub trait PickupPointStore: Send + Sync {
    async fn add(&self, pickup_point: &PickupPoint) -> DomainResult<()>;

    /// Fails with `PvzDoesNotExist` when nothing matches.
    async fn find_by_id(&self, id: PvzId) -> DomainResult<PickupPoint>;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Reception lookup criteria, ordered by creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceptionFilter {
    pub pvz_id: PvzId,
    pub status: ReceptionStatus,
    pub order: SortOrder,
    pub limit: usize,
}

#[async_trait]
pub trait ReceptionStore: Send + Sync {
    /// Fails with `AnotherOpenedReception` if the store itself enforces the
    /// single-open-reception rule and it would be broken.
    async fn add(&self, reception: &Reception) -> DomainResult<()>;

    /// Full replace by id. Fails with `ReceptionDoesNotExist` if unknown.
    async fn update(&self, reception: &Reception) -> DomainResult<()>;

    async fn find_all(&self, filter: &ReceptionFilter) -> DomainResult<Vec<Reception>>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn add(&self, product: &Product) -> DomainResult<()>;

    async fn remove(&self, product: &Product) -> DomainResult<()>;

    async fn find_all_by_reception(&self, reception_id: ReceptionId) -> DomainResult<Vec<Product>>;
}

#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Returns an empty vector, not an error, when nothing matches.
    async fn find_all(&self, filter: &ReportFilter) -> DomainResult<Vec<PickupPointReport>>;
}
