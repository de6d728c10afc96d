// src/db/caja_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{Executor, PgPool, Postgres};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::caja::{
        CierreCaja, CreateMovimientoPayload, Desglose, MovimientoCaja, TurnoCaja,
        UpdateMovimientoPayload,
    },
};

#[derive(Clone)]
pub struct CajaRepository {
    pool: PgPool,
}

impl CajaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  TURNOS DE CAJA
    // =========================================================================

    pub async fn crear_turno(
        &self,
        monto_apertura: Decimal,
        usuario_apertura: Option<Uuid>,
    ) -> Result<TurnoCaja, AppError> {
        let turno = sqlx::query_as::<_, TurnoCaja>(
            r#"
            INSERT INTO turnos_caja (monto_apertura, efectivo_esperado, usuario_apertura)
            VALUES ($1, $1, $2)
            RETURNING *
            "#,
        )
        .bind(monto_apertura)
        .bind(usuario_apertura)
        .fetch_one(&self.pool)
        .await?;
        Ok(turno)
    }

    pub async fn turno_abierto(&self) -> Result<Option<TurnoCaja>, AppError> {
        let turno = sqlx::query_as::<_, TurnoCaja>(
            "SELECT * FROM turnos_caja WHERE estado = 'abierto' ORDER BY fecha_apertura DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(turno)
    }

    pub async fn find_turno(&self, id: Uuid) -> Result<Option<TurnoCaja>, AppError> {
        let turno = sqlx::query_as::<_, TurnoCaja>("SELECT * FROM turnos_caja WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(turno)
    }

    // Variante com lock de linha, para as sequências checar-e-gravar
    // (anexar movimento, fechar turno).
    pub async fn find_turno_for_update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<TurnoCaja>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let turno =
            sqlx::query_as::<_, TurnoCaja>("SELECT * FROM turnos_caja WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(turno)
    }

    pub async fn list_turnos(&self) -> Result<Vec<TurnoCaja>, AppError> {
        let turnos = sqlx::query_as::<_, TurnoCaja>(
            "SELECT * FROM turnos_caja ORDER BY fecha_apertura DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(turnos)
    }

    // Passo explícito de recálculo: o serviço decide QUANDO, o repo só grava.
    pub async fn update_totales<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        ingresos_efectivo: Decimal,
        egresos_efectivo: Decimal,
        efectivo_esperado: Decimal,
    ) -> Result<TurnoCaja, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let turno = sqlx::query_as::<_, TurnoCaja>(
            r#"
            UPDATE turnos_caja
            SET total_ingresos_efectivo = $2,
                total_egresos_efectivo  = $3,
                efectivo_esperado       = $4,
                fecha_actualizacion     = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(ingresos_efectivo)
        .bind(egresos_efectivo)
        .bind(efectivo_esperado)
        .fetch_optional(executor)
        .await?;

        turno.ok_or(AppError::NotFound("Turno de caja"))
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn cerrar_turno<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        fecha_cierre: DateTime<Utc>,
        monto_cierre: Decimal,
        diferencia: Decimal,
        observaciones: Option<&str>,
        usuario_cierre: Option<Uuid>,
    ) -> Result<TurnoCaja, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let turno = sqlx::query_as::<_, TurnoCaja>(
            r#"
            UPDATE turnos_caja
            SET estado               = 'cerrado',
                fecha_cierre         = $2,
                monto_cierre         = $3,
                diferencia           = $4,
                observaciones_cierre = $5,
                usuario_cierre       = $6,
                fecha_actualizacion  = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(fecha_cierre)
        .bind(monto_cierre)
        .bind(diferencia)
        .bind(observaciones)
        .bind(usuario_cierre)
        .fetch_optional(executor)
        .await?;

        turno.ok_or(AppError::NotFound("Turno de caja"))
    }

    // Congela os movimentos de um turno fechado
    pub async fn congelar_movimientos<'e, E>(
        &self,
        executor: E,
        turno_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE movimientos_caja SET es_editable = false, fecha_actualizacion = now() WHERE turno_id = $1",
        )
        .bind(turno_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    // =========================================================================
    //  MOVIMIENTOS
    // =========================================================================

    pub async fn insertar_movimiento<'e, E>(
        &self,
        executor: E,
        payload: &CreateMovimientoPayload,
        usuario_registro: Option<Uuid>,
    ) -> Result<MovimientoCaja, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let movimiento = sqlx::query_as::<_, MovimientoCaja>(
            r#"
            INSERT INTO movimientos_caja (
                tipo, monto, descripcion, metodo_pago, categoria,
                turno_id, reserva_id, barbero_id, usuario_registro, comprobante
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(payload.tipo)
        .bind(payload.monto)
        .bind(&payload.descripcion)
        .bind(payload.metodo_pago)
        .bind(payload.categoria)
        .bind(payload.turno_id)
        .bind(payload.reserva_id)
        .bind(payload.barbero_id)
        .bind(usuario_registro)
        .bind(&payload.comprobante)
        .fetch_one(executor)
        .await?;
        Ok(movimiento)
    }

    pub async fn find_movimiento(&self, id: Uuid) -> Result<Option<MovimientoCaja>, AppError> {
        let movimiento =
            sqlx::query_as::<_, MovimientoCaja>("SELECT * FROM movimientos_caja WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(movimiento)
    }

    pub async fn actualizar_movimiento<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &UpdateMovimientoPayload,
    ) -> Result<MovimientoCaja, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let movimiento = sqlx::query_as::<_, MovimientoCaja>(
            r#"
            UPDATE movimientos_caja
            SET monto               = COALESCE($2, monto),
                descripcion         = COALESCE($3, descripcion),
                metodo_pago         = COALESCE($4, metodo_pago),
                categoria           = COALESCE($5, categoria),
                fecha_actualizacion = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.monto)
        .bind(&payload.descripcion)
        .bind(payload.metodo_pago)
        .bind(payload.categoria)
        .fetch_optional(executor)
        .await?;

        movimiento.ok_or(AppError::NotFound("Movimiento de caja"))
    }

    pub async fn movimientos_de_turno<'e, E>(
        &self,
        executor: E,
        turno_id: Uuid,
    ) -> Result<Vec<MovimientoCaja>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let movimientos = sqlx::query_as::<_, MovimientoCaja>(
            "SELECT * FROM movimientos_caja WHERE turno_id = $1 ORDER BY fecha_creacion DESC",
        )
        .bind(turno_id)
        .fetch_all(executor)
        .await?;
        Ok(movimientos)
    }

    pub async fn list_movimientos(
        &self,
        turno_id: Option<Uuid>,
        desde: Option<DateTime<Utc>>,
        hasta: Option<DateTime<Utc>>,
    ) -> Result<Vec<MovimientoCaja>, AppError> {
        let movimientos = sqlx::query_as::<_, MovimientoCaja>(
            r#"
            SELECT * FROM movimientos_caja
            WHERE ($1::uuid IS NULL OR turno_id = $1)
              AND ($2::timestamptz IS NULL OR fecha_creacion >= $2)
              AND ($3::timestamptz IS NULL OR fecha_creacion <= $3)
            ORDER BY fecha_creacion DESC
            "#,
        )
        .bind(turno_id)
        .bind(desde)
        .bind(hasta)
        .fetch_all(&self.pool)
        .await?;
        Ok(movimientos)
    }

    // Movimentos ainda não vinculados a nenhum cierre histórico
    pub async fn movimientos_sin_cierre<'e, E>(
        &self,
        executor: E,
        desde: DateTime<Utc>,
        hasta: DateTime<Utc>,
    ) -> Result<Vec<MovimientoCaja>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let movimientos = sqlx::query_as::<_, MovimientoCaja>(
            r#"
            SELECT * FROM movimientos_caja
            WHERE cierre_caja_id IS NULL
              AND fecha_creacion >= $1
              AND fecha_creacion <= $2
            ORDER BY fecha_creacion ASC
            "#,
        )
        .bind(desde)
        .bind(hasta)
        .fetch_all(executor)
        .await?;
        Ok(movimientos)
    }

    pub async fn vincular_a_cierre<'e, E>(
        &self,
        executor: E,
        cierre_id: Uuid,
        movimiento_ids: &[Uuid],
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE movimientos_caja SET cierre_caja_id = $1 WHERE id = ANY($2)",
        )
        .bind(cierre_id)
        .bind(movimiento_ids)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    // =========================================================================
    //  CIERRES HISTÓRICOS
    // =========================================================================

    #[allow(clippy::too_many_arguments)]
    pub async fn crear_cierre<'e, E>(
        &self,
        executor: E,
        fecha_apertura: DateTime<Utc>,
        fecha_cierre: DateTime<Utc>,
        usuario_apertura: Option<Uuid>,
        usuario_cierre: Option<Uuid>,
        monto_inicial: Decimal,
        total_ingresos_efectivo: Decimal,
        total_egresos_efectivo: Decimal,
        total_ingresos_otros: Decimal,
        total_egresos_otros: Decimal,
        efectivo_esperado: Decimal,
        efectivo_real: Decimal,
        diferencia: Decimal,
        desglose_metodos: &BTreeMap<String, Desglose>,
        desglose_categorias: &BTreeMap<String, Desglose>,
        cantidad_movimientos: i32,
        cantidad_ingresos: i32,
        cantidad_egresos: i32,
        observaciones: Option<&str>,
    ) -> Result<CierreCaja, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let cierre = sqlx::query_as::<_, CierreCaja>(
            r#"
            INSERT INTO cierres_caja (
                fecha_apertura, fecha_cierre, usuario_apertura, usuario_cierre,
                monto_inicial, total_ingresos_efectivo, total_egresos_efectivo,
                total_ingresos_otros, total_egresos_otros,
                efectivo_esperado, efectivo_real, diferencia,
                desglose_metodos, desglose_categorias,
                cantidad_movimientos, cantidad_ingresos, cantidad_egresos,
                observaciones
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING *
            "#,
        )
        .bind(fecha_apertura)
        .bind(fecha_cierre)
        .bind(usuario_apertura)
        .bind(usuario_cierre)
        .bind(monto_inicial)
        .bind(total_ingresos_efectivo)
        .bind(total_egresos_efectivo)
        .bind(total_ingresos_otros)
        .bind(total_egresos_otros)
        .bind(efectivo_esperado)
        .bind(efectivo_real)
        .bind(diferencia)
        .bind(Json(desglose_metodos))
        .bind(Json(desglose_categorias))
        .bind(cantidad_movimientos)
        .bind(cantidad_ingresos)
        .bind(cantidad_egresos)
        .bind(observaciones)
        .fetch_one(executor)
        .await?;
        Ok(cierre)
    }

    pub async fn list_cierres(&self) -> Result<Vec<CierreCaja>, AppError> {
        let cierres = sqlx::query_as::<_, CierreCaja>(
            "SELECT * FROM cierres_caja ORDER BY fecha_cierre DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(cierres)
    }

    pub async fn find_cierre(&self, id: Uuid) -> Result<Option<CierreCaja>, AppError> {
        let cierre = sqlx::query_as::<_, CierreCaja>("SELECT * FROM cierres_caja WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(cierre)
    }

    pub async fn movimientos_de_cierre(
        &self,
        cierre_id: Uuid,
    ) -> Result<Vec<MovimientoCaja>, AppError> {
        let movimientos = sqlx::query_as::<_, MovimientoCaja>(
            "SELECT * FROM movimientos_caja WHERE cierre_caja_id = $1 ORDER BY fecha_creacion ASC",
        )
        .bind(cierre_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(movimientos)
    }
}
