use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{Postgres, Row};
use tracing::instrument;

use pvz_auth::{Email, Role, User, UserStore};
use pvz_core::{DomainError, DomainResult, UserId};

use super::PostgresStore;
use super::error::{corrupt_row, map_sqlx_error};

const SELECT_USER: &str = r#"
    SELECT id, email, password, user_role_id
    FROM users
"#;

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    let role_id: i16 = row.try_get("user_role_id")?;
    let email: String = row.try_get("email")?;

    Ok(User {
        id: UserId::from_uuid(row.try_get("id")?),
        email: Email::parse(&email).map_err(|e| sqlx::Error::Decode(e.into()))?,
        password_hash: row.try_get("password")?,
        role: Role::from_id(role_id)
            .ok_or_else(|| sqlx::Error::Decode(format!("unknown role id {role_id}").into()))?,
    })
}

impl PostgresStore {
    async fn fetch_user(
        &self,
        operation: &str,
        query: Query<'_, Postgres, PgArguments>,
    ) -> DomainResult<User> {
        let row = query
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(operation, e))?
            .ok_or(DomainError::UserDoesNotExist)?;

        user_from_row(&row).map_err(|e| corrupt_row(operation, e))
    }
}

#[async_trait]
impl UserStore for PostgresStore {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: UserId) -> DomainResult<User> {
        let sql = format!("{SELECT_USER} WHERE id = $1");
        self.fetch_user("find_user_by_id", sqlx::query(&sql).bind(id.as_uuid())).await
    }

    #[instrument(skip_all)]
    async fn find_by_email(&self, email: &Email) -> DomainResult<User> {
        let sql = format!("{SELECT_USER} WHERE email = $1");
        self.fetch_user("find_user_by_email", sqlx::query(&sql).bind(email.as_str())).await
    }

    #[instrument(skip(self, user), fields(user_id = %user.id), err)]
    async fn add(&self, user: &User) -> DomainResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password, user_role_id)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.role.id())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("add_user", e))?;

        Ok(())
    }
}
