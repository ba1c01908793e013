use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};

use pvz_auth::{AccessToken, Role};
use pvz_core::{DomainError, DomainResult, PvzId};
use pvz_domain::{PickupPointStore, Reception, ReceptionStore};

use crate::{Authenticator, PickupPointLocks};

/// Open a reception at a pickup point. Clients only.
#[derive(Clone)]
pub struct CreateReception {
    auth: Authenticator,
    pickup_points: Arc<dyn PickupPointStore>,
    receptions: Arc<dyn ReceptionStore>,
    locks: PickupPointLocks,
}

impl CreateReception {
    pub fn new(
        auth: Authenticator,
        pickup_points: Arc<dyn PickupPointStore>,
        receptions: Arc<dyn ReceptionStore>,
        locks: PickupPointLocks,
    ) -> Self {
        Self { auth, pickup_points, receptions, locks }
    }

    #[instrument(skip_all, fields(%pvz_id))]
    pub async fn execute(&self, token: &AccessToken, pvz_id: PvzId) -> DomainResult<Reception> {
        self.auth.validate_privileges(token, &[Role::Client]).await?;
        if pvz_id.is_nil() {
            return Err(DomainError::IdIsRequired);
        }

        // Unknown ids fail here and never reach the lock map.
        let pickup_point = self.pickup_points.find_by_id(pvz_id).await?;
        let _guard = self.locks.lock(pvz_id).await;
        let reception = pickup_point.open_reception(&*self.receptions, Utc::now()).await?;

        info!(reception_id = %reception.id, "reception opened");
        Ok(reception)
    }
}

/// Close the reception in progress at a pickup point. Any authenticated user.
#[derive(Clone)]
pub struct CloseLastReception {
    auth: Authenticator,
    pickup_points: Arc<dyn PickupPointStore>,
    receptions: Arc<dyn ReceptionStore>,
    locks: PickupPointLocks,
}

impl CloseLastReception {
    pub fn new(
        auth: Authenticator,
        pickup_points: Arc<dyn PickupPointStore>,
        receptions: Arc<dyn ReceptionStore>,
        locks: PickupPointLocks,
    ) -> Self {
        Self { auth, pickup_points, receptions, locks }
    }

    #[instrument(skip_all, fields(%pvz_id))]
    pub async fn execute(&self, token: &AccessToken, pvz_id: PvzId) -> DomainResult<Reception> {
        self.auth.validate_privileges(token, &[]).await?;
        if pvz_id.is_nil() {
            return Err(DomainError::IdIsRequired);
        }

        let pickup_point = self.pickup_points.find_by_id(pvz_id).await?;
        let _guard = self.locks.lock(pvz_id).await;
        let mut reception = pickup_point.current_reception(&*self.receptions).await?;

        reception.close()?;
        self.receptions.update(&reception).await?;

        info!(reception_id = %reception.id, "reception closed");
        Ok(reception)
    }
}
