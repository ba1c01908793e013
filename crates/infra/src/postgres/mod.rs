//! Postgres-backed stores.
//!
//! One `PostgresStore` implements every store port over a shared pool. The
//! schema lives in `migrations/` and is applied by [`PostgresStore::migrate`].
//! Invariants that span requests (single open reception, unique email, unique
//! pickup-point id, references) are enforced by constraints and surfaced as
//! domain errors through [`error::map_sqlx_error`].

mod error;
mod pickup_points;
mod products;
mod receptions;
mod reports;
mod users;

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, instrument, warn};

use pvz_auth::dummy_users;
use pvz_core::DomainResult;

use crate::config::PostgresConfig;
use error::map_sqlx_error;

/// Delay before the second connection attempt; grows linearly after that.
const RETRY_DELAY_STEP: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect, retrying `connect_attempts` times with a linearly growing delay.
    #[instrument(skip(config), fields(host = %config.host, db = %config.db))]
    pub async fn connect(config: &PostgresConfig) -> Result<Self, sqlx::Error> {
        let attempts = config.connect_attempts.max(1);
        let mut attempt = 1;

        loop {
            let result = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .acquire_timeout(config.connect_timeout())
                .connect_with(config.connect_options())
                .await;

            match result {
                Ok(pool) => {
                    info!(attempt, "connected to postgres");
                    return Ok(Self::new(pool));
                }
                Err(e) if attempt < attempts => {
                    let delay = retry_delay(attempt);
                    warn!(attempt, attempts, error = %e, ?delay, "postgres connection failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }

    /// Insert the dummy-login accounts if they are missing.
    pub async fn seed_dummy_users(&self) -> DomainResult<()> {
        for user in dummy_users() {
            sqlx::query(
                r#"
                INSERT INTO users (id, email, password, user_role_id)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(user.id.as_uuid())
            .bind(user.email.as_str())
            .bind(&user.password_hash)
            .bind(user.role.id())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("seed_dummy_users", e))?;
        }
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn retry_delay(attempt: u32) -> Duration {
    RETRY_DELAY_STEP * attempt
}
