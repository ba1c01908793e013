use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::Row;
use tracing::instrument;
use uuid::Uuid;

use pvz_core::{DomainResult, ReceptionId};
use pvz_domain::{PickupPointReport, Product, ReceptionReport, ReportFilter, ReportStore};

use super::PostgresStore;
use super::error::{corrupt_row, map_sqlx_error};
use super::pickup_points::pickup_point_from_row;
use super::products::product_from_row;
use super::receptions::reception_from_row;

#[async_trait]
impl ReportStore for PostgresStore {
    /// Three round trips: the page of pickup points keyed by record number,
    /// their receptions inside the window, then the products of those
    /// receptions. Nesting happens here rather than in SQL.
    #[instrument(skip(self), fields(page = filter.page, limit = filter.limit))]
    async fn find_all(&self, filter: &ReportFilter) -> DomainResult<Vec<PickupPointReport>> {
        let rows = sqlx::query(
            r#"
            SELECT id, creation_time_utc, city_id
            FROM pvzs
            WHERE pvz_record_number > $1
            ORDER BY pvz_record_number
            LIMIT $2
            "#,
        )
        .bind(filter.offset())
        .bind(filter.limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("report_pickup_points", e))?;

        let pickup_points = rows
            .iter()
            .map(pickup_point_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| corrupt_row("report_pickup_points", e))?;
        if pickup_points.is_empty() {
            return Ok(Vec::new());
        }

        let pvz_ids: Vec<Uuid> = pickup_points.iter().map(|p| *p.id.as_uuid()).collect();
        let rows = sqlx::query(
            r#"
            SELECT id, pvz_id, creation_time_utc, status
            FROM receptions
            WHERE pvz_id = ANY($1)
              AND ($2::timestamptz IS NULL OR creation_time_utc >= $2)
              AND ($3::timestamptz IS NULL OR creation_time_utc < $3)
            ORDER BY creation_time_utc, id
            "#,
        )
        .bind(&pvz_ids)
        .bind(filter.window.start)
        .bind(filter.window.end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("report_receptions", e))?;

        let receptions = rows
            .iter()
            .map(reception_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| corrupt_row("report_receptions", e))?;

        let mut products: HashMap<ReceptionId, Vec<Product>> = HashMap::new();
        if !receptions.is_empty() {
            let reception_ids: Vec<Uuid> = receptions.iter().map(|r| *r.id.as_uuid()).collect();
            let rows = sqlx::query(
                r#"
                SELECT id, reception_id, creation_time_utc, category
                FROM products
                WHERE reception_id = ANY($1)
                ORDER BY creation_time_utc, id
                "#,
            )
            .bind(&reception_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("report_products", e))?;

            for row in &rows {
                let product = product_from_row(row).map_err(|e| corrupt_row("report_products", e))?;
                products.entry(product.reception_id).or_default().push(product);
            }
        }

        let mut by_pvz: HashMap<_, Vec<ReceptionReport>> = HashMap::new();
        for reception in receptions {
            let products = products.remove(&reception.id).unwrap_or_default();
            by_pvz
                .entry(reception.pvz_id)
                .or_default()
                .push(ReceptionReport { reception, products });
        }

        Ok(pickup_points
            .into_iter()
            .map(|pickup_point| PickupPointReport {
                receptions: by_pvz.remove(&pickup_point.id).unwrap_or_default(),
                pickup_point,
            })
            .collect())
    }
}
