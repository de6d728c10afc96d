// src/models/caja.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::reservas::MetodoPago;

// --- Enums (Mapeando o Postgres) ---

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "tipo_movimiento", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TipoMovimiento {
    Ingreso,
    Egreso,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "categoria_movimiento", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CategoriaMovimiento {
    Servicios,
    Productos,
    Gastos,
    Sueldos,
    Alquiler,
    ServiciosPublicos,
    Otros,
}

impl CategoriaMovimiento {
    pub fn slug(&self) -> &'static str {
        match self {
            CategoriaMovimiento::Servicios => "servicios",
            CategoriaMovimiento::Productos => "productos",
            CategoriaMovimiento::Gastos => "gastos",
            CategoriaMovimiento::Sueldos => "sueldos",
            CategoriaMovimiento::Alquiler => "alquiler",
            CategoriaMovimiento::ServiciosPublicos => "servicios_publicos",
            CategoriaMovimiento::Otros => "otros",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "estado_turno", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EstadoTurno {
    Abierto,
    Cerrado,
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovimientoCaja {
    pub id: Uuid,

    pub tipo: TipoMovimiento,
    /// Monto siempre positivo; el signo lo da `tipo`.
    #[schema(example = "5000.00")]
    pub monto: Decimal,
    pub descripcion: Option<String>,
    pub metodo_pago: MetodoPago,
    pub categoria: CategoriaMovimiento,

    // Vínculos opcionales
    pub turno_id: Option<Uuid>,
    pub cierre_caja_id: Option<Uuid>,
    pub reserva_id: Option<Uuid>,
    pub barbero_id: Option<Uuid>,
    pub usuario_registro: Option<Uuid>,

    pub comprobante: Option<String>,

    /// Falso a partir do fechamento do turno dono: o movimento vira snapshot.
    pub es_editable: bool,

    pub fecha_creacion: DateTime<Utc>,
    pub fecha_actualizacion: DateTime<Utc>,
}

impl MovimientoCaja {
    pub fn monto_con_signo(&self) -> Decimal {
        match self.tipo {
            TipoMovimiento::Ingreso => self.monto,
            TipoMovimiento::Egreso => -self.monto,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TurnoCaja {
    pub id: Uuid,
    pub estado: EstadoTurno,

    // Apertura
    pub fecha_apertura: DateTime<Utc>,
    #[schema(example = "20000.00")]
    pub monto_apertura: Decimal,
    pub usuario_apertura: Option<Uuid>,

    // Cierre
    pub fecha_cierre: Option<DateTime<Utc>>,
    #[schema(example = "23800.00")]
    pub monto_cierre: Option<Decimal>,
    pub usuario_cierre: Option<Uuid>,
    pub observaciones_cierre: Option<String>,

    // Totales calculados sobre los movimientos del turno
    pub total_ingresos_efectivo: Decimal,
    pub total_egresos_efectivo: Decimal,
    pub efectivo_esperado: Decimal,
    /// Contado menos esperado: positivo = sobrante, negativo = faltante.
    pub diferencia: Decimal,

    pub fecha_creacion: DateTime<Utc>,
    pub fecha_actualizacion: DateTime<Utc>,
}

impl TurnoCaja {
    pub fn tipo_diferencia(&self) -> &'static str {
        if self.diferencia > Decimal::ZERO {
            "sobrante"
        } else if self.diferencia < Decimal::ZERO {
            "faltante"
        } else {
            "exacto"
        }
    }
}

/// Entrada del desglose por método de pago o por categoría.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Desglose {
    pub ingresos: Decimal,
    pub egresos: Decimal,
    pub neto: Decimal,
}

/// Cierre histórico por rango de fechas, independiente de los turnos.
/// Es el registro grueso para reportes, no la custodia diaria.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CierreCaja {
    pub id: Uuid,

    pub fecha_apertura: DateTime<Utc>,
    pub fecha_cierre: DateTime<Utc>,
    pub usuario_apertura: Option<Uuid>,
    pub usuario_cierre: Option<Uuid>,

    pub monto_inicial: Decimal,
    pub total_ingresos_efectivo: Decimal,
    pub total_egresos_efectivo: Decimal,
    pub total_ingresos_otros: Decimal,
    pub total_egresos_otros: Decimal,

    pub efectivo_esperado: Decimal,
    pub efectivo_real: Decimal,
    pub diferencia: Decimal,

    #[schema(value_type = Object)]
    pub desglose_metodos: Json<BTreeMap<String, Desglose>>,
    #[schema(value_type = Object)]
    pub desglose_categorias: Json<BTreeMap<String, Desglose>>,

    pub cantidad_movimientos: i32,
    pub cantidad_ingresos: i32,
    pub cantidad_egresos: i32,

    pub observaciones: Option<String>,
    pub esta_cerrado: bool,
}

impl CierreCaja {
    pub fn tipo_diferencia(&self) -> &'static str {
        if self.diferencia > Decimal::ZERO {
            "sobrante"
        } else if self.diferencia < Decimal::ZERO {
            "faltante"
        } else {
            "exacto"
        }
    }

    /// Duración del turno en horas, con 2 decimales.
    pub fn duracion_turno(&self) -> Decimal {
        let delta = self.fecha_cierre - self.fecha_apertura;
        (Decimal::from(delta.num_seconds()) / Decimal::from(3600)).round_dp(2)
    }
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AbrirTurnoPayload {
    #[validate(custom(function = "crate::models::validate_not_negative"))]
    #[schema(example = "20000.00")]
    pub monto_apertura: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CerrarTurnoPayload {
    /// Efectivo físicamente contado al cerrar.
    #[validate(custom(function = "crate::models::validate_not_negative"))]
    #[schema(example = "23800.00")]
    pub monto_cierre: Decimal,
    pub observaciones: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovimientoPayload {
    pub tipo: TipoMovimiento,

    #[validate(custom(function = "crate::models::validate_positive"))]
    #[schema(example = "5000.00")]
    pub monto: Decimal,

    pub descripcion: Option<String>,
    #[serde(default = "default_metodo")]
    pub metodo_pago: MetodoPago,
    #[serde(default = "default_categoria")]
    pub categoria: CategoriaMovimiento,

    pub turno_id: Option<Uuid>,
    pub reserva_id: Option<Uuid>,
    pub barbero_id: Option<Uuid>,
    pub comprobante: Option<String>,
}

fn default_metodo() -> MetodoPago {
    MetodoPago::Efectivo
}

fn default_categoria() -> CategoriaMovimiento {
    CategoriaMovimiento::Servicios
}

// PATCH parcial: as mesmas regras de monto do create valem aqui
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMovimientoPayload {
    #[validate(custom(function = "crate::models::validate_positive"))]
    pub monto: Option<Decimal>,
    pub descripcion: Option<String>,
    pub metodo_pago: Option<MetodoPago>,
    pub categoria: Option<CategoriaMovimiento>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CerrarCajaPayload {
    pub fecha_apertura: DateTime<Utc>,
    #[validate(custom(function = "crate::models::validate_not_negative"))]
    pub monto_inicial: Decimal,
    #[validate(custom(function = "crate::models::validate_not_negative"))]
    pub efectivo_real: Decimal,
    pub observaciones: Option<String>,
    pub usuario_apertura_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn update_de_movimiento_rechaza_monto_no_positivo() {
        // O PATCH tem que barrar o mesmo que o create barra; senão o monto
        // inválido só estoura no CHECK do banco e vira um 500 genérico.
        let negativo = UpdateMovimientoPayload {
            monto: Some(dec("-100.00")),
            descripcion: None,
            metodo_pago: None,
            categoria: None,
        };
        assert!(negativo.validate().is_err());

        let cero = UpdateMovimientoPayload {
            monto: Some(Decimal::ZERO),
            descripcion: None,
            metodo_pago: None,
            categoria: None,
        };
        assert!(cero.validate().is_err());
    }

    #[test]
    fn update_de_movimiento_sin_monto_es_valido() {
        let payload = UpdateMovimientoPayload {
            monto: None,
            descripcion: Some("Ajuste de descripción".into()),
            metodo_pago: Some(MetodoPago::Tarjeta),
            categoria: None,
        };
        assert!(payload.validate().is_ok());
    }
}
