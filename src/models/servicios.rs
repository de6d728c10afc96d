// src/models/servicios.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Catálogo de serviços oferecidos (corte, barba, combos...).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Servicio {
    pub id: Uuid,

    #[schema(example = "Corte clásico")]
    pub nombre: String,

    #[schema(example = "12000.00")]
    pub precio: Decimal,

    /// Duração em minutos; alimenta o cálculo de blocos da agenda.
    #[schema(example = 60)]
    pub duracion_min: i32,

    pub activo: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateServicioPayload {
    #[validate(length(min = 1, message = "El nombre es obligatorio."))]
    pub nombre: String,

    #[validate(custom(function = "crate::models::validate_not_negative"))]
    pub precio: Decimal,

    #[validate(range(min = 15, message = "La duración mínima es de 15 minutos."))]
    pub duracion_min: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServicioPayload {
    pub nombre: Option<String>,

    #[validate(custom(function = "crate::models::validate_not_negative"))]
    pub precio: Option<Decimal>,

    #[validate(range(min = 15, message = "La duración mínima es de 15 minutos."))]
    pub duracion_min: Option<i32>,

    pub activo: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use validator::Validate;

    #[test]
    fn update_rechaza_precio_negativo() {
        let payload = UpdateServicioPayload {
            nombre: None,
            precio: Some(Decimal::from(-100)),
            duracion_min: None,
            activo: None,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn update_rechaza_duracion_corta() {
        let payload = UpdateServicioPayload {
            nombre: None,
            precio: None,
            duracion_min: Some(10),
            activo: None,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn update_sin_campos_es_valido() {
        let payload = UpdateServicioPayload {
            nombre: None,
            precio: None,
            duracion_min: None,
            activo: Some(false),
        };
        assert!(payload.validate().is_ok());
    }
}
