use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use tracing::instrument;

use pvz_core::{DomainError, DomainResult, PvzId, ReceptionId};
use pvz_domain::{Reception, ReceptionFilter, ReceptionStatus, ReceptionStore, SortOrder};

use super::PostgresStore;
use super::error::{corrupt_row, map_sqlx_error};

pub(super) fn reception_from_row(row: &PgRow) -> Result<Reception, sqlx::Error> {
    let status: i16 = row.try_get("status")?;
    Ok(Reception {
        id: ReceptionId::from_uuid(row.try_get("id")?),
        pvz_id: PvzId::from_uuid(row.try_get("pvz_id")?),
        created_at: row.try_get("creation_time_utc")?,
        status: ReceptionStatus::from_code(status)
            .ok_or_else(|| sqlx::Error::Decode(format!("unknown reception status {status}").into()))?,
    })
}

#[async_trait]
impl ReceptionStore for PostgresStore {
    #[instrument(skip(self, reception), fields(reception_id = %reception.id, pvz_id = %reception.pvz_id))]
    async fn add(&self, reception: &Reception) -> DomainResult<()> {
        sqlx::query(
            r#"
            INSERT INTO receptions (id, pvz_id, creation_time_utc, status)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(reception.id.as_uuid())
        .bind(reception.pvz_id.as_uuid())
        .bind(reception.created_at)
        .bind(reception.status.code())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("add_reception", e))?;

        Ok(())
    }

    #[instrument(skip(self, reception), fields(reception_id = %reception.id), err)]
    async fn update(&self, reception: &Reception) -> DomainResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE receptions
            SET pvz_id = $2, creation_time_utc = $3, status = $4
            WHERE id = $1
            "#,
        )
        .bind(reception.id.as_uuid())
        .bind(reception.pvz_id.as_uuid())
        .bind(reception.created_at)
        .bind(reception.status.code())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_reception", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ReceptionDoesNotExist);
        }
        Ok(())
    }

    #[instrument(skip(self), fields(pvz_id = %filter.pvz_id))]
    async fn find_all(&self, filter: &ReceptionFilter) -> DomainResult<Vec<Reception>> {
        let direction = match filter.order {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        };
        let sql = format!(
            r#"
            SELECT id, pvz_id, creation_time_utc, status
            FROM receptions
            WHERE status = $1 AND pvz_id = $2
            ORDER BY creation_time_utc {direction}, id {direction}
            LIMIT $3
            "#
        );

        let rows = sqlx::query(&sql)
            .bind(filter.status.code())
            .bind(filter.pvz_id.as_uuid())
            .bind(i64::try_from(filter.limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_receptions", e))?;

        rows.iter()
            .map(reception_from_row)
            .collect::<Result<_, _>>()
            .map_err(|e| corrupt_row("find_receptions", e))
    }
}
