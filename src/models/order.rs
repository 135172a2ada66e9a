//! Order model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub user_phone: String,
    pub service_id: String,
    /// Service name captured at order time, survives catalog edits
    pub service_name: String,
    pub price: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub user_phone: String,
    pub service_id: String,
    pub service_name: String,
    pub price: f64,
}

/// Status a new order is created with
pub const ORDER_STATUS_PENDING: &str = "pending";
