use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Account, NewAccount};

/// Persistence seam for accounts.
///
/// Implementations must refuse a second account for an email that is
/// already stored, reporting it as `DatabaseError::DuplicateEmail`, even
/// when two inserts race.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DatabaseError>;

    async fn insert(&self, account: NewAccount) -> Result<Account, DatabaseError>;

    /// Cheap liveness probe used by `/health`.
    async fn ping(&self) -> Result<(), DatabaseError>;
}

pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DatabaseError> {
        let account = sqlx::query_as::<_, Account>(
            "SELECT id, name, email, avatar, password_hash, created_at FROM accounts WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, DatabaseError> {
        let id = Uuid::new_v4();

        sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (id, name, email, avatar, password_hash, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, name, email, avatar, password_hash, created_at",
        )
        .bind(id)
        .bind(&account.name)
        .bind(&account.email)
        .bind(&account.avatar)
        .bind(&account.password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_insert)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
