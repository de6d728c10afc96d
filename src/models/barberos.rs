// src/models/barberos.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Um barbero pode (ou não) estar vinculado a um usuário com login próprio.
// A exclusão é sempre lógica (soft delete): reservas antigas apontam para ele.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Barbero {
    pub id: Uuid,
    pub user_id: Option<Uuid>,

    #[schema(example = "Tomás")]
    pub name: String,
    #[schema(example = "Fade y barba")]
    pub specialty: Option<String>,
    #[schema(example = "Mar-Sab 09:00-13:00 / 17:00-22:00")]
    pub work_schedule: Option<String>,

    pub is_deleted: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBarberoPayload {
    #[validate(length(min = 1, message = "El nombre es obligatorio."))]
    pub name: String,
    pub specialty: Option<String>,
    pub work_schedule: Option<String>,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBarberoPayload {
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub work_schedule: Option<String>,
    pub user_id: Option<Uuid>,
}
