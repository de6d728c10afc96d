// src/services/notificacion_service.rs
//
// Monta as notificações por e-mail das reservas. O envio em si é externo;
// aqui só renderizamos o conteúdo e registramos no log. A falha de uma
// notificação nunca derruba a operação que a disparou.

use crate::models::reservas::Reserva;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notificacion {
    pub destinatario: String,
    pub asunto: String,
    pub cuerpo: String,
}

#[derive(Clone, Default)]
pub struct NotificacionService;

impl NotificacionService {
    pub fn new() -> Self {
        Self
    }

    fn detalle_cita(reserva: &Reserva) -> String {
        let servicios = reserva
            .servicios
            .iter()
            .map(|s| format!("- {} (${})", s.nombre, s.precio))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "Fecha: {}\nHorario: {}\nBarbero: {}\nServicios:\n{}\nTotal: ${}\nSeña: ${}\nResto a pagar en el local: ${}",
            reserva.fecha.format("%d/%m/%Y"),
            reserva.horario.format("%H:%M"),
            reserva.barbero_nombre,
            servicios,
            reserva.total,
            reserva.sena,
            reserva.resto_a_pagar(),
        )
    }

    /// Aviso ao cliente de que a reserva entrou como pendiente.
    pub fn reserva_recibida(&self, reserva: &Reserva) -> Notificacion {
        let cuerpo = format!(
            "Hola {},\n\nRecibimos tu reserva y está pendiente de confirmación.\nTe avisaremos cuando verifiquemos el comprobante de la seña.\n\n{}\n\n¡Gracias!",
            reserva.nombre_cliente,
            Self::detalle_cita(reserva),
        );
        self.registrar(Notificacion {
            destinatario: reserva.email_cliente.clone(),
            asunto: "Recibimos tu reserva".to_string(),
            cuerpo,
        })
    }

    pub fn reserva_confirmada(&self, reserva: &Reserva) -> Notificacion {
        let cuerpo = format!(
            "Hola {},\n\n¡Tu reserva fue confirmada! Te esperamos.\n\n{}",
            reserva.nombre_cliente,
            Self::detalle_cita(reserva),
        );
        self.registrar(Notificacion {
            destinatario: reserva.email_cliente.clone(),
            asunto: "Tu reserva fue confirmada".to_string(),
            cuerpo,
        })
    }

    pub fn reserva_rechazada(&self, reserva: &Reserva, motivo: &str) -> Notificacion {
        let cuerpo = format!(
            "Hola {},\n\nLamentablemente tu reserva fue rechazada.\nMotivo: {}\n\nSi creés que es un error, respondé este correo con el comprobante correcto.",
            reserva.nombre_cliente, motivo,
        );
        self.registrar(Notificacion {
            destinatario: reserva.email_cliente.clone(),
            asunto: "Tu reserva fue rechazada".to_string(),
            cuerpo,
        })
    }

    /// Cópia para o barbero quando uma reserva nova entra na sua agenda.
    pub fn aviso_al_barbero(&self, reserva: &Reserva, email_barbero: &str) -> Notificacion {
        let cuerpo = format!(
            "Nueva reserva de {} ({}).\n\n{}",
            reserva.cliente_nombre_completo(),
            reserva.telefono_cliente,
            Self::detalle_cita(reserva),
        );
        self.registrar(Notificacion {
            destinatario: email_barbero.to_string(),
            asunto: format!("Nueva reserva - {}", reserva.fecha.format("%d/%m/%Y")),
            cuerpo,
        })
    }

    fn registrar(&self, notificacion: Notificacion) -> Notificacion {
        tracing::info!(
            destinatario = %notificacion.destinatario,
            asunto = %notificacion.asunto,
            "📧 Notificación generada"
        );
        notificacion
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reservas::{EstadoReserva, ServicioContratado};
    use chrono::{NaiveDate, NaiveTime, Utc};
    use rust_decimal::Decimal;
    use sqlx::types::Json;
    use uuid::Uuid;

    fn reserva() -> Reserva {
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
            servicios: Json(vec![ServicioContratado {
                nombre: "Corte clásico".into(),
                precio: "12000.00".parse().unwrap(),
                duracion: 60,
            }]),
            total: "12000.00".parse().unwrap(),
            sena: "3600.00".parse().unwrap(),
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
    fn recibida_incluye_datos_de_la_cita() {
        let n = NotificacionService::new().reserva_recibida(&reserva());
        assert_eq!(n.destinatario, "juan@example.com");
        assert!(n.cuerpo.contains("04/09/2026"));
        assert!(n.cuerpo.contains("10:00"));
        assert!(n.cuerpo.contains("Corte clásico"));
        assert!(n.cuerpo.contains("Resto a pagar en el local: $8400.00"));
    }

    #[test]
    fn rechazada_incluye_motivo() {
        let n = NotificacionService::new()
            .reserva_rechazada(&reserva(), "Comprobante de pago inválido");
        assert!(n.cuerpo.contains("Comprobante de pago inválido"));
        assert_eq!(n.asunto, "Tu reserva fue rechazada");
    }

    #[test]
    fn aviso_al_barbero_va_al_barbero() {
        let n = NotificacionService::new().aviso_al_barbero(&reserva(), "tomas@barberia.com");
        assert_eq!(n.destinatario, "tomas@barberia.com");
        assert!(n.cuerpo.contains("Juan Pérez"));
        assert!(n.cuerpo.contains("1155555555"));
    }
}
