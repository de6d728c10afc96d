// src/db/barbero_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::barberos::Barbero};

#[derive(Clone)]
pub struct BarberoRepository {
    pool: PgPool,
}

impl BarberoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        name: &str,
        specialty: Option<&str>,
        work_schedule: Option<&str>,
        user_id: Option<Uuid>,
    ) -> Result<Barbero, AppError> {
        let barbero = sqlx::query_as::<_, Barbero>(
            r#"
            INSERT INTO barberos (name, specialty, work_schedule, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(specialty)
        .bind(work_schedule)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(barbero)
    }

    // A listagem pública esconde os excluídos logicamente
    pub async fn list_active(&self) -> Result<Vec<Barbero>, AppError> {
        let barberos = sqlx::query_as::<_, Barbero>(
            "SELECT * FROM barberos WHERE is_deleted = false ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(barberos)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Barbero>, AppError> {
        let barbero = sqlx::query_as::<_, Barbero>("SELECT * FROM barberos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(barbero)
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        specialty: Option<&str>,
        work_schedule: Option<&str>,
        user_id: Option<Uuid>,
    ) -> Result<Barbero, AppError> {
        let barbero = sqlx::query_as::<_, Barbero>(
            r#"
            UPDATE barberos
            SET name          = COALESCE($2, name),
                specialty     = COALESCE($3, specialty),
                work_schedule = COALESCE($4, work_schedule),
                user_id       = COALESCE($5, user_id),
                updated_at    = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(specialty)
        .bind(work_schedule)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        barbero.ok_or(AppError::NotFound("Barbero"))
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE barberos SET is_deleted = true, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Barbero"));
        }
        Ok(())
    }

    pub async fn restore(&self, id: Uuid) -> Result<Barbero, AppError> {
        let barbero = sqlx::query_as::<_, Barbero>(
            "UPDATE barberos SET is_deleted = false, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        barbero.ok_or(AppError::NotFound("Barbero"))
    }
}
