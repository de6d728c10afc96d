// src/models/reservas.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- Enums (Mapeando o Postgres) ---

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "estado_reserva", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EstadoReserva {
    Pendiente,
    Confirmada,
    Rechazada,
    Cancelada,
}

impl EstadoReserva {
    /// Reservas canceladas ou rechazadas deixam de ocupar a agenda.
    pub fn ocupa_agenda(&self) -> bool {
        !matches!(self, EstadoReserva::Cancelada | EstadoReserva::Rechazada)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "metodo_pago", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MetodoPago {
    Efectivo,
    Tarjeta,
    Transferencia,
    Mercadopago,
}

impl MetodoPago {
    pub const TODOS: [MetodoPago; 4] = [
        MetodoPago::Efectivo,
        MetodoPago::Tarjeta,
        MetodoPago::Transferencia,
        MetodoPago::Mercadopago,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            MetodoPago::Efectivo => "efectivo",
            MetodoPago::Tarjeta => "tarjeta",
            MetodoPago::Transferencia => "transferencia",
            MetodoPago::Mercadopago => "mercadopago",
        }
    }
}

// --- Structs ---

/// Um serviço contratado dentro de uma reserva (cópia imutável do catálogo
/// no momento da reserva, para o histórico não mudar se o preço mudar).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServicioContratado {
    #[schema(example = "Corte clásico")]
    pub nombre: String,
    #[schema(example = "12000.00")]
    pub precio: Decimal,
    #[schema(example = 60)]
    pub duracion: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Reserva {
    pub id: Uuid,

    // Datos del cliente
    pub nombre_cliente: String,
    pub apellido_cliente: String,
    pub telefono_cliente: String,
    pub email_cliente: String,

    // Datos de la cita
    #[schema(value_type = String, format = Date, example = "2026-09-04")]
    pub fecha: NaiveDate,
    #[schema(value_type = String, example = "10:00:00")]
    pub horario: chrono::NaiveTime,
    pub barbero_id: Uuid,
    pub barbero_nombre: String,

    #[schema(value_type = Vec<ServicioContratado>)]
    pub servicios: Json<Vec<ServicioContratado>>,

    // Pagos
    #[schema(example = "24000.00")]
    pub total: Decimal,
    /// Seña: pago parcial adelantado que asegura la reserva.
    #[serde(rename = "seña")]
    #[schema(example = "7200.00")]
    pub sena: Decimal,
    #[schema(example = "0.00")]
    pub saldo_pagado: Decimal,
    pub metodo_pago: Option<MetodoPago>,
    pub fecha_pago: Option<DateTime<Utc>>,

    /// Duração total em minutos; a reserva ocupa
    /// `[horario, horario + duracion_total)` na agenda do barbero.
    pub duracion_total: i32,

    /// Caminho/URL do comprovante de pagamento (o upload em si é externo).
    pub comprobante: Option<String>,

    pub estado: EstadoReserva,

    pub fecha_creacion: DateTime<Utc>,
    pub fecha_confirmacion: Option<DateTime<Utc>>,
    pub notas_admin: Option<String>,
}

impl Reserva {
    /// Resto que el cliente debe pagar en el local.
    pub fn resto_a_pagar(&self) -> Decimal {
        self.total - self.sena - self.saldo_pagado
    }

    pub fn esta_completamente_pagado(&self) -> bool {
        self.resto_a_pagar() <= Decimal::ZERO
    }

    pub fn tiene_pago_parcial(&self) -> bool {
        (self.sena > Decimal::ZERO || self.saldo_pagado > Decimal::ZERO)
            && !self.esta_completamente_pagado()
    }

    /// Porcentaje pagado del total, redondeado a 2 decimales.
    pub fn porcentaje_pagado(&self) -> Decimal {
        if self.total <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let pagado = self.sena + self.saldo_pagado;
        (pagado / self.total * Decimal::from(100)).round_dp(2)
    }

    pub fn cliente_nombre_completo(&self) -> String {
        format!("{} {}", self.nombre_cliente, self.apellido_cliente)
    }

    /// Una reserva es "próxima" si sigue ocupando la agenda y su instante
    /// `fecha + horario` todavía no pasó. `fecha` y `horario` son hora de
    /// parede del local, así que `ahora` también tiene que ser el reloj
    /// local del negocio (no UTC).
    pub fn es_proxima(&self, ahora: chrono::NaiveDateTime) -> bool {
        self.estado.ocupa_agenda() && self.fecha.and_time(self.horario) >= ahora
    }
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientePayload {
    #[validate(length(min = 1, message = "El nombre es obligatorio."))]
    pub nombre: String,
    #[validate(length(min = 1, message = "El apellido es obligatorio."))]
    pub apellido: String,
    #[validate(length(min = 6, message = "El teléfono es obligatorio."))]
    pub telefono: String,
    #[validate(email(message = "El email ingresado es inválido."))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservaDatosPayload {
    #[schema(value_type = String, format = Date, example = "2026-09-04")]
    pub fecha: NaiveDate,
    /// Hora de inicio en formato HH:MM (una de las marcas de la grilla).
    #[schema(example = "10:00")]
    pub horario: String,
    pub barbero_id: Uuid,
    #[schema(example = "Tomás")]
    pub barbero_nombre: Option<String>,
    pub servicios: Vec<ServicioContratado>,
    #[validate(custom(function = "crate::models::validate_not_negative"))]
    pub total: Decimal,
    #[validate(range(min = 1, message = "Duración inválida"))]
    pub duracion_total: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservaPayload {
    #[validate(nested)]
    pub cliente: ClientePayload,
    #[validate(nested)]
    pub reserva: ReservaDatosPayload,
    /// Monto de la seña transferida.
    #[validate(custom(function = "crate::models::validate_not_negative"))]
    pub monto: Decimal,
    pub comprobante: Option<String>,
}

// PATCH de una reserva: gestión de pagos y notas del panel admin.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservaPayload {
    #[serde(rename = "seña")]
    pub sena: Option<Decimal>,
    pub saldo_pagado: Option<Decimal>,
    pub metodo_pago: Option<MetodoPago>,
    pub notas_admin: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RechazarReservaPayload {
    #[schema(example = "Comprobante de pago inválido")]
    pub motivo: Option<String>,
}

// --- Disponibilidad (Slot Allocator) ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SlotInfo {
    #[schema(example = "09:00")]
    pub hora: String,
    pub disponible: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DisponibilidadResponse {
    #[schema(value_type = String, format = Date)]
    pub fecha: NaiveDate,
    pub barbero: Uuid,
    #[schema(example = 60)]
    pub intervalo_min: i32,
    #[schema(example = 120)]
    pub duracion_min_requerida: i32,
    pub slots: Vec<SlotInfo>,
    #[schema(example = json!(["10:00", "11:00"]))]
    pub horarios_ocupados: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContadoresCliente {
    pub proximas: i64,
    pub pendientes: i64,
    pub confirmadas: i64,
    pub rechazadas: i64,
    pub canceladas: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn reserva_base() -> Reserva {
        Reserva {
            id: Uuid::new_v4(),
            nombre_cliente: "Juan".into(),
            apellido_cliente: "Pérez".into(),
            telefono_cliente: "1155555555".into(),
            email_cliente: "juan@example.com".into(),
            fecha: NaiveDate::from_ymd_opt(2026, 9, 4).unwrap(),
            horario: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            barbero_id: Uuid::new_v4(),
            barbero_nombre: "Tomás".into(),
            servicios: Json(vec![]),
            total: "24000.00".parse().unwrap(),
            sena: "7200.00".parse().unwrap(),
            saldo_pagado: Decimal::ZERO,
            metodo_pago: None,
            fecha_pago: None,
            duracion_total: 60,
            comprobante: None,
            estado: EstadoReserva::Pendiente,
            fecha_creacion: Utc::now(),
            fecha_confirmacion: None,
            notas_admin: None,
        }
    }

    #[test]
    fn resto_a_pagar_descuenta_sena_y_saldo() {
        let mut r = reserva_base();
        assert_eq!(r.resto_a_pagar(), "16800.00".parse::<Decimal>().unwrap());

        r.saldo_pagado = "16800.00".parse().unwrap();
        assert_eq!(r.resto_a_pagar(), Decimal::ZERO);
        assert!(r.esta_completamente_pagado());
        assert!(!r.tiene_pago_parcial());
    }

    #[test]
    fn pago_parcial_detectado() {
        let r = reserva_base();
        assert!(r.tiene_pago_parcial());
        assert!(!r.esta_completamente_pagado());
    }

    #[test]
    fn sobrepago_se_reporta_como_pagado() {
        // Decisión abierta: el sobrepago no se rechaza, solo se refleja
        // en un resto negativo.
        let mut r = reserva_base();
        r.saldo_pagado = "20000.00".parse().unwrap();
        assert!(r.esta_completamente_pagado());
        assert!(r.resto_a_pagar() < Decimal::ZERO);
    }

    #[test]
    fn porcentaje_pagado_redondea_a_dos_decimales() {
        let mut r = reserva_base();
        r.total = "30000.00".parse().unwrap();
        r.sena = "10000.00".parse().unwrap();
        r.saldo_pagado = Decimal::ZERO;
        assert_eq!(r.porcentaje_pagado(), "33.33".parse::<Decimal>().unwrap());
    }

    #[test]
    fn porcentaje_con_total_cero_es_cero() {
        let mut r = reserva_base();
        r.total = Decimal::ZERO;
        assert_eq!(r.porcentaje_pagado(), Decimal::ZERO);
    }

    #[test]
    fn proximas_se_cortan_por_hora_local() {
        // Reserva hoy a las 10:00, hora de pared del local. Al mediodía
        // local ya no es próxima; si el corte usara UTC (tres horas
        // adelantado en UTC-3) seguiría apareciendo hasta las 13:00.
        let r = reserva_base();
        let dia = NaiveDate::from_ymd_opt(2026, 9, 4).unwrap();

        assert!(r.es_proxima(dia.and_hms_opt(9, 0, 0).unwrap()));
        // En el instante exacto de la cita sigue contando
        assert!(r.es_proxima(dia.and_hms_opt(10, 0, 0).unwrap()));
        assert!(!r.es_proxima(dia.and_hms_opt(12, 0, 0).unwrap()));
    }

    #[test]
    fn reserva_cancelada_nunca_es_proxima() {
        let mut r = reserva_base();
        r.estado = EstadoReserva::Cancelada;
        let dia = NaiveDate::from_ymd_opt(2026, 9, 4).unwrap();
        assert!(!r.es_proxima(dia.and_hms_opt(9, 0, 0).unwrap()));
    }

    #[test]
    fn estados_terminales_liberan_agenda() {
        assert!(EstadoReserva::Pendiente.ocupa_agenda());
        assert!(EstadoReserva::Confirmada.ocupa_agenda());
        assert!(!EstadoReserva::Cancelada.ocupa_agenda());
        assert!(!EstadoReserva::Rechazada.ocupa_agenda());
    }
}
