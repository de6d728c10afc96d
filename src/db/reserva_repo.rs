// src/db/reserva_repo.rs

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::reservas::{
        ContadoresCliente, EstadoReserva, Reserva, ServicioContratado, UpdateReservaPayload,
    },
};

#[derive(Clone)]
pub struct ReservaRepository {
    pool: PgPool,
}

impl ReservaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  AGENDA
    // =========================================================================

    // Reservas que ocupam a agenda de um barbero num dia (exclui canceladas
    // e rechazadas).
    pub async fn activas_por_barbero_fecha(
        &self,
        barbero_id: Uuid,
        fecha: NaiveDate,
    ) -> Result<Vec<Reserva>, AppError> {
        let reservas = sqlx::query_as::<_, Reserva>(
            r#"
            SELECT * FROM reservas
            WHERE barbero_id = $1
              AND fecha = $2
              AND estado NOT IN ('cancelada', 'rechazada')
            ORDER BY horario ASC
            "#,
        )
        .bind(barbero_id)
        .bind(fecha)
        .fetch_all(&self.pool)
        .await?;
        Ok(reservas)
    }

    // Mesma consulta, mas com lock de linha (FOR UPDATE) dentro da transação
    // de admissão: fecha a janela entre checar o conflito e inserir.
    pub async fn activas_para_admision<'e, E>(
        &self,
        executor: E,
        barbero_id: Uuid,
        fecha: NaiveDate,
    ) -> Result<Vec<Reserva>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let reservas = sqlx::query_as::<_, Reserva>(
            r#"
            SELECT * FROM reservas
            WHERE barbero_id = $1
              AND fecha = $2
              AND estado NOT IN ('cancelada', 'rechazada')
            ORDER BY horario ASC
            FOR UPDATE
            "#,
        )
        .bind(barbero_id)
        .bind(fecha)
        .fetch_all(executor)
        .await?;
        Ok(reservas)
    }

    // =========================================================================
    //  CRIAÇÃO / BUSCA
    // =========================================================================

    #[allow(clippy::too_many_arguments)]
    pub async fn create<'e, E>(
        &self,
        executor: E,
        nombre_cliente: &str,
        apellido_cliente: &str,
        telefono_cliente: &str,
        email_cliente: &str,
        fecha: NaiveDate,
        horario: NaiveTime,
        barbero_id: Uuid,
        barbero_nombre: &str,
        servicios: &[ServicioContratado],
        total: Decimal,
        sena: Decimal,
        duracion_total: i32,
        comprobante: Option<&str>,
    ) -> Result<Reserva, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let reserva = sqlx::query_as::<_, Reserva>(
            r#"
            INSERT INTO reservas (
                nombre_cliente, apellido_cliente, telefono_cliente, email_cliente,
                fecha, horario, barbero_id, barbero_nombre,
                servicios, total, sena, duracion_total, comprobante
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(nombre_cliente)
        .bind(apellido_cliente)
        .bind(telefono_cliente)
        .bind(email_cliente)
        .bind(fecha)
        .bind(horario)
        .bind(barbero_id)
        .bind(barbero_nombre)
        .bind(Json(servicios))
        .bind(total)
        .bind(sena)
        .bind(duracion_total)
        .bind(comprobante)
        .fetch_one(executor)
        .await?;
        Ok(reserva)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Reserva>, AppError> {
        let reserva = sqlx::query_as::<_, Reserva>("SELECT * FROM reservas WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(reserva)
    }

    // =========================================================================
    //  LISTAGENS
    // =========================================================================

    pub async fn list_admin(
        &self,
        estado: Option<EstadoReserva>,
        email: Option<&str>,
    ) -> Result<Vec<Reserva>, AppError> {
        let reservas = sqlx::query_as::<_, Reserva>(
            r#"
            SELECT * FROM reservas
            WHERE ($1::estado_reserva IS NULL OR estado = $1)
              AND ($2::text IS NULL OR lower(email_cliente) = lower($2))
            ORDER BY fecha_creacion DESC
            "#,
        )
        .bind(estado)
        .bind(email)
        .fetch_all(&self.pool)
        .await?;
        Ok(reservas)
    }

    pub async fn list_by_email(
        &self,
        email: &str,
        estado: Option<EstadoReserva>,
    ) -> Result<Vec<Reserva>, AppError> {
        let reservas = sqlx::query_as::<_, Reserva>(
            r#"
            SELECT * FROM reservas
            WHERE lower(email_cliente) = lower($1)
              AND ($2::estado_reserva IS NULL OR estado = $2)
            ORDER BY fecha_creacion DESC
            "#,
        )
        .bind(email)
        .bind(estado)
        .fetch_all(&self.pool)
        .await?;
        Ok(reservas)
    }

    // Futuras e não canceladas/rechazadas ("proximas" do painel do cliente)
    pub async fn list_proximas(
        &self,
        email: &str,
        ahora: NaiveDateTime,
    ) -> Result<Vec<Reserva>, AppError> {
        let reservas = sqlx::query_as::<_, Reserva>(
            r#"
            SELECT * FROM reservas
            WHERE lower(email_cliente) = lower($1)
              AND estado NOT IN ('cancelada', 'rechazada')
              AND (fecha + horario) >= $2
            ORDER BY fecha_creacion DESC
            "#,
        )
        .bind(email)
        .bind(ahora)
        .fetch_all(&self.pool)
        .await?;
        Ok(reservas)
    }

    pub async fn contadores_cliente(
        &self,
        email: &str,
        ahora: NaiveDateTime,
    ) -> Result<ContadoresCliente, AppError> {
        let (pendientes, confirmadas, rechazadas, canceladas, proximas): (i64, i64, i64, i64, i64) =
            sqlx::query_as(
                r#"
                SELECT
                    count(*) FILTER (WHERE estado = 'pendiente'),
                    count(*) FILTER (WHERE estado = 'confirmada'),
                    count(*) FILTER (WHERE estado = 'rechazada'),
                    count(*) FILTER (WHERE estado = 'cancelada'),
                    count(*) FILTER (
                        WHERE estado NOT IN ('cancelada', 'rechazada')
                          AND (fecha + horario) >= $2
                    )
                FROM reservas
                WHERE lower(email_cliente) = lower($1)
                "#,
            )
            .bind(email)
            .bind(ahora)
            .fetch_one(&self.pool)
            .await?;

        Ok(ContadoresCliente {
            proximas,
            pendientes,
            confirmadas,
            rechazadas,
            canceladas,
        })
    }

    // =========================================================================
    //  TRANSIÇÕES DE ESTADO
    // =========================================================================

    pub async fn confirmar(
        &self,
        id: Uuid,
        fecha_confirmacion: DateTime<Utc>,
    ) -> Result<Reserva, AppError> {
        let reserva = sqlx::query_as::<_, Reserva>(
            r#"
            UPDATE reservas
            SET estado = 'confirmada', fecha_confirmacion = $2
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(fecha_confirmacion)
        .fetch_optional(&self.pool)
        .await?;

        reserva.ok_or(AppError::NotFound("Reserva"))
    }

    pub async fn rechazar(&self, id: Uuid, motivo: &str) -> Result<Reserva, AppError> {
        let reserva = sqlx::query_as::<_, Reserva>(
            r#"
            UPDATE reservas
            SET estado = 'rechazada', notas_admin = $2
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(motivo)
        .fetch_optional(&self.pool)
        .await?;

        reserva.ok_or(AppError::NotFound("Reserva"))
    }

    pub async fn cancelar(&self, id: Uuid) -> Result<Reserva, AppError> {
        let reserva = sqlx::query_as::<_, Reserva>(
            "UPDATE reservas SET estado = 'cancelada' WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        reserva.ok_or(AppError::NotFound("Reserva"))
    }

    // =========================================================================
    //  PAGOS
    // =========================================================================

    pub async fn update_pagos(
        &self,
        id: Uuid,
        payload: &UpdateReservaPayload,
        fecha_pago: Option<DateTime<Utc>>,
    ) -> Result<Reserva, AppError> {
        let reserva = sqlx::query_as::<_, Reserva>(
            r#"
            UPDATE reservas
            SET sena         = COALESCE($2, sena),
                saldo_pagado = COALESCE($3, saldo_pagado),
                metodo_pago  = COALESCE($4, metodo_pago),
                fecha_pago   = COALESCE($5, fecha_pago),
                notas_admin  = COALESCE($6, notas_admin)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.sena)
        .bind(payload.saldo_pagado)
        .bind(payload.metodo_pago)
        .bind(fecha_pago)
        .bind(&payload.notas_admin)
        .fetch_optional(&self.pool)
        .await?;

        reserva.ok_or(AppError::NotFound("Reserva"))
    }
}
