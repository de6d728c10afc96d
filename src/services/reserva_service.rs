// src/services/reserva_service.rs
//
// Orquestra o ciclo de vida das reservas: criação (com admissão na agenda
// dentro da mesma transação), transições de estado e gestão de pagos.

use chrono::{Local, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BarberoRepository, ReservaRepository, UserRepository},
    models::reservas::{
        ContadoresCliente, CreateReservaPayload, EstadoReserva, Reserva, UpdateReservaPayload,
    },
    services::{agenda_service::AgendaService, notificacion_service::NotificacionService},
};

const MOTIVO_RECHAZO_DEFAULT: &str = "Comprobante de pago inválido";

/// Horário de entrada sempre chega como "HH:MM" do front.
fn parse_horario(horario: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(horario, "%H:%M")
        .map_err(|_| AppError::InvalidInput("Horario inválido (se espera HH:MM).".to_string()))
}

#[derive(Clone)]
pub struct ReservaService {
    reserva_repo: ReservaRepository,
    barbero_repo: BarberoRepository,
    user_repo: UserRepository,
    agenda: AgendaService,
    notificaciones: NotificacionService,
    pool: PgPool,
}

impl ReservaService {
    pub fn new(
        reserva_repo: ReservaRepository,
        barbero_repo: BarberoRepository,
        user_repo: UserRepository,
        agenda: AgendaService,
        notificaciones: NotificacionService,
        pool: PgPool,
    ) -> Self {
        Self {
            reserva_repo,
            barbero_repo,
            user_repo,
            agenda,
            notificaciones,
            pool,
        }
    }

    /// Cria uma reserva nova. A admissão na agenda e o INSERT rodam na mesma
    /// transação: duas requisições disputando o mesmo slot serializam no lock
    /// e a segunda recebe o conflito.
    pub async fn crear_reserva(&self, payload: &CreateReservaPayload) -> Result<Reserva, AppError> {
        let horario = parse_horario(&payload.reserva.horario)?;

        let barbero = self
            .barbero_repo
            .find_by_id(payload.reserva.barbero_id)
            .await?
            .filter(|b| !b.is_deleted)
            .ok_or(AppError::NotFound("Barbero"))?;

        let barbero_nombre = payload
            .reserva
            .barbero_nombre
            .as_deref()
            .unwrap_or(&barbero.name);

        let mut tx = self.pool.begin().await?;

        self.agenda
            .admitir(
                &mut *tx,
                barbero.id,
                payload.reserva.fecha,
                horario,
                payload.reserva.duracion_total,
            )
            .await?;

        let reserva = self
            .reserva_repo
            .create(
                &mut *tx,
                &payload.cliente.nombre,
                &payload.cliente.apellido,
                &payload.cliente.telefono,
                &payload.cliente.email,
                payload.reserva.fecha,
                horario,
                barbero.id,
                barbero_nombre,
                &payload.reserva.servicios,
                payload.reserva.total,
                payload.monto,
                payload.reserva.duracion_total,
                payload.comprobante.as_deref(),
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            reserva_id = %reserva.id,
            barbero = %reserva.barbero_nombre,
            fecha = %reserva.fecha,
            horario = %reserva.horario,
            "Reserva creada"
        );

        self.notificaciones.reserva_recibida(&reserva);
        self.notificar_barbero(&reserva, barbero.user_id).await;

        Ok(reserva)
    }

    async fn notificar_barbero(&self, reserva: &Reserva, barbero_user_id: Option<Uuid>) {
        let Some(user_id) = barbero_user_id else {
            return;
        };
        match self.user_repo.find_by_id(user_id).await {
            Ok(Some(user)) => {
                self.notificaciones.aviso_al_barbero(reserva, &user.email);
            }
            Ok(None) => {}
            Err(e) => {
                // A notificação nunca derruba a reserva já confirmada no banco
                tracing::warn!(error = %e, "No se pudo notificar al barbero");
            }
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Reserva, AppError> {
        self.reserva_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Reserva"))
    }

    pub async fn list_admin(
        &self,
        estado: Option<EstadoReserva>,
        email: Option<&str>,
    ) -> Result<Vec<Reserva>, AppError> {
        self.reserva_repo.list_admin(estado, email).await
    }

    pub async fn list_by_email(
        &self,
        email: &str,
        estado: Option<EstadoReserva>,
    ) -> Result<Vec<Reserva>, AppError> {
        self.reserva_repo.list_by_email(email, estado).await
    }

    // `fecha + horario` é hora de parede do negócio: o corte de "próximas"
    // compara contra o relógio local, não contra UTC.
    pub async fn list_proximas(&self, email: &str) -> Result<Vec<Reserva>, AppError> {
        self.reserva_repo
            .list_proximas(email, Local::now().naive_local())
            .await
    }

    pub async fn contadores_cliente(&self, email: &str) -> Result<ContadoresCliente, AppError> {
        self.reserva_repo
            .contadores_cliente(email, Local::now().naive_local())
            .await
    }

    pub async fn confirmar(&self, id: Uuid) -> Result<Reserva, AppError> {
        let reserva = self.reserva_repo.confirmar(id, Utc::now()).await?;
        tracing::info!(reserva_id = %id, "Reserva confirmada");
        self.notificaciones.reserva_confirmada(&reserva);
        Ok(reserva)
    }

    pub async fn rechazar(&self, id: Uuid, motivo: Option<&str>) -> Result<Reserva, AppError> {
        let motivo = motivo.unwrap_or(MOTIVO_RECHAZO_DEFAULT);
        let reserva = self.reserva_repo.rechazar(id, motivo).await?;
        tracing::info!(reserva_id = %id, motivo = %motivo, "Reserva rechazada");
        self.notificaciones.reserva_rechazada(&reserva, motivo);
        Ok(reserva)
    }

    pub async fn cancelar(&self, id: Uuid) -> Result<Reserva, AppError> {
        let reserva = self.reserva_repo.cancelar(id).await?;
        tracing::info!(reserva_id = %id, "Reserva cancelada");
        Ok(reserva)
    }

    /// Gestión de pagos del panel admin. Registrar un pago sella la fecha;
    /// el sobrepago no se rechaza, solo queda visible como resto negativo.
    pub async fn actualizar(
        &self,
        id: Uuid,
        payload: &UpdateReservaPayload,
    ) -> Result<Reserva, AppError> {
        if let Some(sena) = payload.sena {
            if sena < Decimal::ZERO {
                return Err(AppError::InvalidInput("La seña no puede ser negativa.".to_string()));
            }
        }
        if let Some(saldo) = payload.saldo_pagado {
            if saldo < Decimal::ZERO {
                return Err(AppError::InvalidInput(
                    "El saldo pagado no puede ser negativo.".to_string(),
                ));
            }
        }

        let hay_pago = payload.sena.is_some() || payload.saldo_pagado.is_some();
        let fecha_pago = hay_pago.then(Utc::now);

        let reserva = self.reserva_repo.update_pagos(id, payload, fecha_pago).await?;

        if reserva.resto_a_pagar() < Decimal::ZERO {
            tracing::warn!(
                reserva_id = %id,
                resto = %reserva.resto_a_pagar(),
                "Reserva con sobrepago"
            );
        }
        Ok(reserva)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horario_hhmm_valido() {
        assert_eq!(
            parse_horario("09:00").unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap()
        );
        assert_eq!(
            parse_horario("17:30").unwrap(),
            NaiveTime::from_hms_opt(17, 30, 0).unwrap()
        );
    }

    #[test]
    fn horario_invalido_es_error_de_entrada() {
        assert!(matches!(parse_horario("25:00"), Err(AppError::InvalidInput(_))));
        assert!(matches!(parse_horario("9am"), Err(AppError::InvalidInput(_))));
        assert!(matches!(parse_horario(""), Err(AppError::InvalidInput(_))));
    }
}
