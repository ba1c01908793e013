use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use tracing::instrument;

use pvz_core::{DomainResult, ProductId, ReceptionId};
use pvz_domain::{Product, ProductCategory, ProductStore};

use super::PostgresStore;
use super::error::{corrupt_row, map_sqlx_error};

pub(super) fn product_from_row(row: &PgRow) -> Result<Product, sqlx::Error> {
    let category: i16 = row.try_get("category")?;
    Ok(Product {
        id: ProductId::from_uuid(row.try_get("id")?),
        reception_id: ReceptionId::from_uuid(row.try_get("reception_id")?),
        created_at: row.try_get("creation_time_utc")?,
        category: ProductCategory::from_code(category)
            .ok_or_else(|| sqlx::Error::Decode(format!("unknown product category {category}").into()))?,
    })
}

#[async_trait]
impl ProductStore for PostgresStore {
    #[instrument(skip(self, product), fields(product_id = %product.id, reception_id = %product.reception_id), err)]
    async fn add(&self, product: &Product) -> DomainResult<()> {
        sqlx::query(
            r#"
            INSERT INTO products (id, reception_id, creation_time_utc, category)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(product.reception_id.as_uuid())
        .bind(product.created_at)
        .bind(product.category.code())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("add_product", e))?;

        Ok(())
    }

    #[instrument(skip(self, product), fields(product_id = %product.id), err)]
    async fn remove(&self, product: &Product) -> DomainResult<()> {
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(product.id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("remove_product", e))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_all_by_reception(&self, reception_id: ReceptionId) -> DomainResult<Vec<Product>> {
        let rows = sqlx::query(
            r#"
            SELECT id, reception_id, creation_time_utc, category
            FROM products
            WHERE reception_id = $1
            ORDER BY creation_time_utc ASC, id ASC
            "#,
        )
        .bind(reception_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_products", e))?;

        rows.iter()
            .map(product_from_row)
            .collect::<Result<_, _>>()
            .map_err(|e| corrupt_row("find_products", e))
    }
}
