use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pvz_core::{DomainError, DomainResult, Entity, PvzId};

use crate::{City, Reception, ReceptionFilter, ReceptionStatus, ReceptionStore, SortOrder};

/// A pickup point (PVZ). Immutable once registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupPoint {
    pub id: PvzId,
    pub registered_at: DateTime<Utc>,
    pub city: City,
}

impl PickupPoint {
    /// Both the id and the registration time are supplied by the caller.
    pub fn new(id: PvzId, city: City, registered_at: DateTime<Utc>) -> DomainResult<Self> {
        if id.is_nil() {
            return Err(DomainError::IdIsRequired);
        }
        Ok(Self { id, registered_at, city })
    }

    fn open_reception_filter(&self) -> ReceptionFilter {
        ReceptionFilter {
            pvz_id: self.id,
            status: ReceptionStatus::InProgress,
            order: SortOrder::Descending,
            limit: 1,
        }
    }

    /// The reception currently in progress at this point.
    pub async fn current_reception(&self, receptions: &dyn ReceptionStore) -> DomainResult<Reception> {
        receptions
            .find_all(&self.open_reception_filter())
            .await?
            .into_iter()
            .next()
            .ok_or(DomainError::AllReceptionsAreClosed)
    }

    /// Open a new reception, refusing while another one is still in progress.
    pub async fn open_reception(
        &self,
        receptions: &dyn ReceptionStore,
        now: DateTime<Utc>,
    ) -> DomainResult<Reception> {
        let reception = Reception::open(self.id, now)?;

        let open = receptions.find_all(&self.open_reception_filter()).await?;
        if !open.is_empty() {
            return Err(DomainError::AnotherOpenedReception);
        }

        receptions.add(&reception).await?;
        Ok(reception)
    }
}

impl Entity for PickupPoint {
    type Id = PvzId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
