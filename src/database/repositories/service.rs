//! Service catalog repository implementation

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::database::repositories::ServiceCatalog;
use crate::models::service::{NewService, Service, ServiceEdit};
use crate::utils::errors::{ChatCartError, Result};

const SERVICE_COLUMNS: &str =
    "id, name, description, price, instructions, active, fields, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct ServiceRepository {
    pool: PgPool,
}

impl ServiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceCatalog for ServiceRepository {
    async fn list_active(&self) -> Result<Vec<Service>> {
        let services = sqlx::query_as::<_, Service>(&format!(
            "SELECT {SERVICE_COLUMNS} FROM services WHERE active = true ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(services)
    }

    async fn list_all(&self) -> Result<Vec<Service>> {
        let services = sqlx::query_as::<_, Service>(&format!(
            "SELECT {SERVICE_COLUMNS} FROM services ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(services)
    }

    async fn find(&self, id: &str) -> Result<Option<Service>> {
        let service = sqlx::query_as::<_, Service>(&format!(
            "SELECT {SERVICE_COLUMNS} FROM services WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(service)
    }

    async fn create(&self, service: NewService) -> Result<Service> {
        let created = sqlx::query_as::<_, Service>(&format!(
            r#"
            INSERT INTO services (id, name, description, price, instructions, active, fields, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, '[]'::jsonb, $7, $8)
            RETURNING {SERVICE_COLUMNS}
            "#
        ))
        .bind(&service.id)
        .bind(&service.name)
        .bind(&service.description)
        .bind(service.price)
        .bind(&service.instructions)
        .bind(service.active)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn apply_edit(&self, id: &str, edit: ServiceEdit) -> Result<Service> {
        let now = Utc::now();

        let updated = match edit {
            ServiceEdit::Name(name) => {
                sqlx::query_as::<_, Service>(&format!(
                    "UPDATE services SET name = $2, updated_at = $3 WHERE id = $1 RETURNING {SERVICE_COLUMNS}"
                ))
                .bind(id)
                .bind(name)
                .bind(now)
                .fetch_optional(&self.pool)
                .await?
            }
            ServiceEdit::Description(description) => {
                sqlx::query_as::<_, Service>(&format!(
                    "UPDATE services SET description = $2, updated_at = $3 WHERE id = $1 RETURNING {SERVICE_COLUMNS}"
                ))
                .bind(id)
                .bind(description)
                .bind(now)
                .fetch_optional(&self.pool)
                .await?
            }
            ServiceEdit::Price(price) => {
                sqlx::query_as::<_, Service>(&format!(
                    "UPDATE services SET price = $2, updated_at = $3 WHERE id = $1 RETURNING {SERVICE_COLUMNS}"
                ))
                .bind(id)
                .bind(price)
                .bind(now)
                .fetch_optional(&self.pool)
                .await?
            }
            ServiceEdit::Instructions(instructions) => {
                sqlx::query_as::<_, Service>(&format!(
                    "UPDATE services SET instructions = $2, updated_at = $3 WHERE id = $1 RETURNING {SERVICE_COLUMNS}"
                ))
                .bind(id)
                .bind(instructions)
                .bind(now)
                .fetch_optional(&self.pool)
                .await?
            }
            ServiceEdit::Active(active) => {
                sqlx::query_as::<_, Service>(&format!(
                    "UPDATE services SET active = $2, updated_at = $3 WHERE id = $1 RETURNING {SERVICE_COLUMNS}"
                ))
                .bind(id)
                .bind(active)
                .bind(now)
                .fetch_optional(&self.pool)
                .await?
            }
            ServiceEdit::Fields(fields) => {
                sqlx::query_as::<_, Service>(&format!(
                    "UPDATE services SET fields = $2, updated_at = $3 WHERE id = $1 RETURNING {SERVICE_COLUMNS}"
                ))
                .bind(id)
                .bind(Json(fields))
                .bind(now)
                .fetch_optional(&self.pool)
                .await?
            }
        };

        updated.ok_or_else(|| ChatCartError::ServiceNotFound { id: id.to_string() })
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let deleted = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(ChatCartError::ServiceNotFound { id: id.to_string() });
        }

        Ok(())
    }
}
