//! Pickup-point registration, lookup and reports.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use pvz_auth::{AccessToken, Role};
use pvz_core::{DomainError, DomainResult, PvzId};
use pvz_domain::{City, PickupPoint, PickupPointReport, PickupPointStore, ReportFilter, ReportStore};

use crate::Authenticator;

#[derive(Debug, Clone)]
pub struct CreatePickupPointRequest {
    pub id: Option<PvzId>,
    pub city: String,
    pub registered_at: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct CreatePickupPoint {
    auth: Authenticator,
    pickup_points: Arc<dyn PickupPointStore>,
}

impl CreatePickupPoint {
    pub fn new(auth: Authenticator, pickup_points: Arc<dyn PickupPointStore>) -> Self {
        Self { auth, pickup_points }
    }

    /// Moderators only. The caller supplies both id and registration time.
    #[instrument(skip_all, fields(pvz_id = ?request.id, city = %request.city))]
    pub async fn execute(
        &self,
        token: &AccessToken,
        request: CreatePickupPointRequest,
    ) -> DomainResult<PickupPoint> {
        self.auth.validate_privileges(token, &[Role::Moderator]).await?;

        let city = City::from_name(&request.city)?;
        let registered_at = request.registered_at.ok_or(DomainError::RegistrationTimeIsRequired)?;
        let id = request.id.ok_or(DomainError::IdIsRequired)?;

        let pickup_point = PickupPoint::new(id, city, registered_at)?;
        self.pickup_points.add(&pickup_point).await?;

        info!(pvz_id = %pickup_point.id, "pickup point registered");
        Ok(pickup_point)
    }
}

#[derive(Clone)]
pub struct FindPickupPoint {
    pickup_points: Arc<dyn PickupPointStore>,
}

impl FindPickupPoint {
    pub fn new(pickup_points: Arc<dyn PickupPointStore>) -> Self {
        Self { pickup_points }
    }

    pub async fn execute(&self, id: PvzId) -> DomainResult<PickupPoint> {
        self.pickup_points.find_by_id(id).await
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListReportsRequest {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub page: i64,
    pub limit: i64,
}

#[derive(Clone)]
pub struct ListReports {
    auth: Authenticator,
    reports: Arc<dyn ReportStore>,
}

impl ListReports {
    pub fn new(auth: Authenticator, reports: Arc<dyn ReportStore>) -> Self {
        Self { auth, reports }
    }

    /// Any authenticated user may list reports.
    #[instrument(skip_all, fields(page = request.page, limit = request.limit))]
    pub async fn execute(
        &self,
        token: &AccessToken,
        request: ListReportsRequest,
    ) -> DomainResult<Vec<PickupPointReport>> {
        self.auth.validate_privileges(token, &[]).await?;

        let filter = ReportFilter::normalize(request.start, request.end, request.page, request.limit);
        self.reports.find_all(&filter).await
    }
}
