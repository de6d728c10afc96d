// src/db/proveedor_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::proveedores::{CreateProveedorPayload, Proveedor, UpdateProveedorPayload},
};

#[derive(Clone)]
pub struct ProveedorRepository {
    pool: PgPool,
}

impl ProveedorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: &CreateProveedorPayload) -> Result<Proveedor, AppError> {
        let proveedor = sqlx::query_as::<_, Proveedor>(
            r#"
            INSERT INTO proveedores (name, company, email, phone, direccion, tipo, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.company)
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(&payload.direccion)
        .bind(&payload.tipo)
        .bind(&payload.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(proveedor)
    }

    pub async fn list_all(&self) -> Result<Vec<Proveedor>, AppError> {
        let proveedores =
            sqlx::query_as::<_, Proveedor>("SELECT * FROM proveedores ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(proveedores)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Proveedor>, AppError> {
        let proveedor = sqlx::query_as::<_, Proveedor>("SELECT * FROM proveedores WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(proveedor)
    }

    pub async fn update(
        &self,
        id: Uuid,
        payload: &UpdateProveedorPayload,
    ) -> Result<Proveedor, AppError> {
        let proveedor = sqlx::query_as::<_, Proveedor>(
            r#"
            UPDATE proveedores
            SET name       = COALESCE($2, name),
                company    = COALESCE($3, company),
                email      = COALESCE($4, email),
                phone      = COALESCE($5, phone),
                direccion  = COALESCE($6, direccion),
                tipo       = COALESCE($7, tipo),
                active     = COALESCE($8, active),
                notes      = COALESCE($9, notes),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.name)
        .bind(&payload.company)
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(&payload.direccion)
        .bind(&payload.tipo)
        .bind(payload.active)
        .bind(&payload.notes)
        .fetch_optional(&self.pool)
        .await?;

        proveedor.ok_or(AppError::NotFound("Proveedor"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM proveedores WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Proveedor"));
        }
        Ok(())
    }
}
