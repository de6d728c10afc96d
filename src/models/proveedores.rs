// src/models/proveedores.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Proveedor {
    pub id: Uuid,

    #[schema(example = "Martín Suárez")]
    pub name: String,
    #[schema(example = "Distribuidora Norte")]
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub direccion: Option<String>,

    #[schema(example = "productos_cabello")]
    pub tipo: String,

    pub active: bool,
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProveedorPayload {
    #[validate(length(min = 1, message = "El nombre es obligatorio."))]
    pub name: String,
    pub company: Option<String>,
    #[validate(email(message = "El email ingresado es inválido."))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub direccion: Option<String>,
    #[serde(default = "default_tipo")]
    pub tipo: String,
    pub notes: Option<String>,
}

fn default_tipo() -> String {
    "productos_cabello".to_string()
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProveedorPayload {
    pub name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub direccion: Option<String>,
    pub tipo: Option<String>,
    pub active: Option<bool>,
    pub notes: Option<String>,
}
