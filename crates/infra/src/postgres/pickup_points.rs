use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use tracing::instrument;

use pvz_core::{DomainError, DomainResult, PvzId};
use pvz_domain::{City, PickupPoint, PickupPointStore};

use super::PostgresStore;
use super::error::{corrupt_row, map_sqlx_error};

pub(super) fn pickup_point_from_row(row: &PgRow) -> Result<PickupPoint, sqlx::Error> {
    let city_id: i16 = row.try_get("city_id")?;
    Ok(PickupPoint {
        id: PvzId::from_uuid(row.try_get("id")?),
        registered_at: row.try_get("creation_time_utc")?,
        city: City::from_id(city_id)
            .ok_or_else(|| sqlx::Error::Decode(format!("unknown city id {city_id}").into()))?,
    })
}

#[async_trait]
impl PickupPointStore for PostgresStore {
    #[instrument(skip(self, pickup_point), fields(pvz_id = %pickup_point.id), err)]
    async fn add(&self, pickup_point: &PickupPoint) -> DomainResult<()> {
        sqlx::query(
            r#"
            INSERT INTO pvzs (id, creation_time_utc, city_id)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(pickup_point.id.as_uuid())
        .bind(pickup_point.registered_at)
        .bind(pickup_point.city.id())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("add_pickup_point", e))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: PvzId) -> DomainResult<PickupPoint> {
        let row = sqlx::query(
            r#"
            SELECT id, creation_time_utc, city_id
            FROM pvzs
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_pickup_point", e))?
        .ok_or(DomainError::PvzDoesNotExist)?;

        pickup_point_from_row(&row).map_err(|e| corrupt_row("find_pickup_point", e))
    }
}
