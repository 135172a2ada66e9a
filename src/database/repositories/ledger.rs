//! Order and transaction ledger repository implementation

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::repositories::OrderLedger;
use crate::models::order::{NewOrder, Order, ORDER_STATUS_PENDING};
use crate::models::transaction::{NewTransaction, Transaction};
use crate::utils::errors::Result;

#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: PgPool,
}

impl LedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderLedger for LedgerRepository {
    async fn create_order(&self, order: NewOrder) -> Result<Order> {
        let created = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (id, user_phone, service_id, service_name, price, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_phone, service_id, service_name, price, status, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&order.user_phone)
        .bind(&order.service_id)
        .bind(&order.service_name)
        .bind(order.price)
        .bind(ORDER_STATUS_PENDING)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list_orders_for(&self, phone: &str, limit: i64) -> Result<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, user_phone, service_id, service_name, price, status, created_at
            FROM orders WHERE user_phone = $1
            ORDER BY created_at DESC LIMIT $2
            "#,
        )
        .bind(phone)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    async fn record_transaction(&self, tx: NewTransaction) -> Result<Transaction> {
        let created = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (id, user_phone, amount, kind, reference, note, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_phone, amount, kind, reference, note, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&tx.user_phone)
        .bind(tx.amount)
        .bind(tx.kind.as_str())
        .bind(&tx.reference)
        .bind(&tx.note)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_transaction_by_reference(&self, reference: &str) -> Result<Option<Transaction>> {
        let tx = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, user_phone, amount, kind, reference, note, created_at
            FROM transactions WHERE reference = $1
            "#,
        )
        .bind(reference)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tx)
    }

    async fn list_transactions_for(&self, phone: &str, limit: i64) -> Result<Vec<Transaction>> {
        let txs = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, user_phone, amount, kind, reference, note, created_at
            FROM transactions WHERE user_phone = $1
            ORDER BY created_at DESC LIMIT $2
            "#,
        )
        .bind(phone)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(txs)
    }
}
