//! User repository implementation

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use crate::database::repositories::UserDirectory;
use crate::models::user::User;
use crate::utils::errors::{ChatCartError, Result};

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user with a zero balance
    pub async fn create(&self, phone: &str, name: Option<String>) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (phone, name, balance, created_at, updated_at)
            VALUES ($1, $2, 0, $3, $4)
            RETURNING id, phone, name, balance, created_at, updated_at
            "#,
        )
        .bind(phone)
        .bind(name)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Count total users
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn get_or_create(&self, phone: &str) -> Result<User> {
        if let Some(user) = self.find(phone).await? {
            return Ok(user);
        }

        self.create(phone, None).await
    }

    async fn find(&self, phone: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, phone, name, balance, created_at, updated_at FROM users WHERE phone = $1",
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn credit_balance(&self, phone: &str, amount: f64) -> Result<f64> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET balance = balance + $2, updated_at = $3
            WHERE phone = $1
            RETURNING id, phone, name, balance, created_at, updated_at
            "#,
        )
        .bind(phone)
        .bind(amount)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ChatCartError::UserNotFound {
            phone: phone.to_string(),
        })?;

        Ok(user.balance)
    }

    async fn debit_if_sufficient(&self, phone: &str, amount: f64) -> Result<bool> {
        // Condition and write in one statement; no row means the balance
        // did not cover the amount.
        let updated = sqlx::query(
            r#"
            UPDATE users
            SET balance = balance - $2, updated_at = $3
            WHERE phone = $1 AND balance >= $2
            "#,
        )
        .bind(phone)
        .bind(amount)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(updated.rows_affected() > 0)
    }

    async fn list_phones(&self) -> Result<Vec<String>> {
        let phones: Vec<(String,)> = sqlx::query_as("SELECT phone FROM users ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;

        Ok(phones.into_iter().map(|(p,)| p).collect())
    }
}
