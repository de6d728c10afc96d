// src/db/servicio_repo.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::servicios::Servicio};

#[derive(Clone)]
pub struct ServicioRepository {
    pool: PgPool,
}

impl ServicioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        nombre: &str,
        precio: Decimal,
        duracion_min: i32,
    ) -> Result<Servicio, AppError> {
        let servicio = sqlx::query_as::<_, Servicio>(
            r#"
            INSERT INTO servicios (nombre, precio, duracion_min)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(nombre)
        .bind(precio)
        .bind(duracion_min)
        .fetch_one(&self.pool)
        .await?;
        Ok(servicio)
    }

    pub async fn list_all(&self) -> Result<Vec<Servicio>, AppError> {
        let servicios =
            sqlx::query_as::<_, Servicio>("SELECT * FROM servicios ORDER BY nombre ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(servicios)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Servicio>, AppError> {
        let servicio = sqlx::query_as::<_, Servicio>("SELECT * FROM servicios WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(servicio)
    }

    pub async fn update(
        &self,
        id: Uuid,
        nombre: Option<&str>,
        precio: Option<Decimal>,
        duracion_min: Option<i32>,
        activo: Option<bool>,
    ) -> Result<Servicio, AppError> {
        let servicio = sqlx::query_as::<_, Servicio>(
            r#"
            UPDATE servicios
            SET nombre       = COALESCE($2, nombre),
                precio       = COALESCE($3, precio),
                duracion_min = COALESCE($4, duracion_min),
                activo       = COALESCE($5, activo),
                updated_at   = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(nombre)
        .bind(precio)
        .bind(duracion_min)
        .bind(activo)
        .fetch_optional(&self.pool)
        .await?;

        servicio.ok_or(AppError::NotFound("Servicio"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM servicios WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Servicio"));
        }
        Ok(())
    }
}
