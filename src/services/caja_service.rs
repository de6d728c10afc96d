// src/services/caja_service.rs
//
// Reconciliação da caja: soma os movimentos por método/categoria e, no
// fechamento do turno, compara o efetivo esperado com o contado.
// Toda a aritmética é Decimal; nada de float binário somando dinheiro.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CajaRepository,
    models::caja::{
        CerrarCajaPayload, CierreCaja, CreateMovimientoPayload, Desglose, EstadoTurno,
        MovimientoCaja, TipoMovimiento, TurnoCaja, UpdateMovimientoPayload,
    },
    models::reservas::MetodoPago,
};

// --- Núcleo puro de reconciliação ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalesEfectivo {
    pub ingresos: Decimal,
    pub egresos: Decimal,
    pub esperado: Decimal,
}

/// `efectivo_esperado = monto_apertura + ingresos_efectivo - egresos_efectivo`.
/// Somente movimentos em efectivo contam para a custódia física.
pub fn totales_efectivo(monto_apertura: Decimal, movimientos: &[MovimientoCaja]) -> TotalesEfectivo {
    let mut ingresos = Decimal::ZERO;
    let mut egresos = Decimal::ZERO;

    for m in movimientos {
        if m.metodo_pago != MetodoPago::Efectivo {
            continue;
        }
        match m.tipo {
            TipoMovimiento::Ingreso => ingresos += m.monto,
            TipoMovimiento::Egreso => egresos += m.monto,
        }
    }

    TotalesEfectivo {
        ingresos,
        egresos,
        esperado: monto_apertura + ingresos - egresos,
    }
}

/// Contado menos esperado: positivo = sobrante, negativo = faltante.
pub fn diferencia(contado: Decimal, esperado: Decimal) -> Decimal {
    contado - esperado
}

/// Totais de ingresos/egresos fora do efectivo (tarjeta, transferencia...).
pub fn totales_otros(movimientos: &[MovimientoCaja]) -> (Decimal, Decimal) {
    let mut ingresos = Decimal::ZERO;
    let mut egresos = Decimal::ZERO;
    for m in movimientos {
        if m.metodo_pago == MetodoPago::Efectivo {
            continue;
        }
        match m.tipo {
            TipoMovimiento::Ingreso => ingresos += m.monto,
            TipoMovimiento::Egreso => egresos += m.monto,
        }
    }
    (ingresos, egresos)
}

/// Desglose por método de pago. Todos os métodos aparecem, mesmo zerados,
/// para o front não ter que tratar chave ausente.
pub fn desglose_por_metodo(movimientos: &[MovimientoCaja]) -> BTreeMap<String, Desglose> {
    let mut desglose: BTreeMap<String, Desglose> = MetodoPago::TODOS
        .iter()
        .map(|m| (m.slug().to_string(), Desglose::default()))
        .collect();

    for m in movimientos {
        let entry = desglose.entry(m.metodo_pago.slug().to_string()).or_default();
        match m.tipo {
            TipoMovimiento::Ingreso => entry.ingresos += m.monto,
            TipoMovimiento::Egreso => entry.egresos += m.monto,
        }
    }

    for entry in desglose.values_mut() {
        entry.neto = entry.ingresos - entry.egresos;
    }
    desglose
}

/// Desglose por categoría; só as categorias presentes nos movimentos.
pub fn desglose_por_categoria(movimientos: &[MovimientoCaja]) -> BTreeMap<String, Desglose> {
    let mut desglose: BTreeMap<String, Desglose> = BTreeMap::new();

    for m in movimientos {
        let entry = desglose.entry(m.categoria.slug().to_string()).or_default();
        match m.tipo {
            TipoMovimiento::Ingreso => entry.ingresos += m.monto,
            TipoMovimiento::Egreso => entry.egresos += m.monto,
        }
    }

    for entry in desglose.values_mut() {
        entry.neto = entry.ingresos - entry.egresos;
    }
    desglose
}

/// Um turno fechado não aceita mais movimentos nem edições.
pub fn verificar_turno_abierto(turno: &TurnoCaja) -> Result<(), AppError> {
    if turno.estado == EstadoTurno::Cerrado {
        return Err(AppError::ShiftClosed);
    }
    Ok(())
}

/// Fechar duas vezes é sempre erro; os totais congelados não mudam.
pub fn verificar_no_cerrado(turno: &TurnoCaja) -> Result<(), AppError> {
    if turno.estado == EstadoTurno::Cerrado {
        return Err(AppError::AlreadyClosed);
    }
    Ok(())
}

// --- Service ---

#[derive(Clone)]
pub struct CajaService {
    repo: CajaRepository,
    pool: PgPool,
}

impl CajaService {
    pub fn new(repo: CajaRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn abrir_turno(
        &self,
        monto_apertura: Decimal,
        usuario: Option<Uuid>,
    ) -> Result<TurnoCaja, AppError> {
        // Um turno aberto por vez: a caja física é uma só
        if self.repo.turno_abierto().await?.is_some() {
            return Err(AppError::ShiftAlreadyOpen);
        }

        let turno = self.repo.crear_turno(monto_apertura, usuario).await?;
        tracing::info!(turno_id = %turno.id, monto = %monto_apertura, "Turno de caja abierto");
        Ok(turno)
    }

    pub async fn turno_actual(&self) -> Result<TurnoCaja, AppError> {
        self.repo
            .turno_abierto()
            .await?
            .ok_or(AppError::NotFound("Turno de caja abierto"))
    }

    pub async fn detalle_turno(
        &self,
        id: Uuid,
    ) -> Result<(TurnoCaja, Vec<MovimientoCaja>), AppError> {
        let turno = self
            .repo
            .find_turno(id)
            .await?
            .ok_or(AppError::NotFound("Turno de caja"))?;
        let movimientos = self.repo.movimientos_de_turno(&self.pool, id).await?;
        Ok((turno, movimientos))
    }

    pub async fn list_turnos(&self) -> Result<Vec<TurnoCaja>, AppError> {
        self.repo.list_turnos().await
    }

    /// Registra um movimento. Protocolo em dois passos explícitos dentro da
    /// mesma transação: (1) insere o movimento; (2) recalcula os totais do
    /// turno dono. Nada de gravação recursiva escondida num hook de save.
    pub async fn registrar_movimiento(
        &self,
        payload: &CreateMovimientoPayload,
        usuario: Option<Uuid>,
    ) -> Result<MovimientoCaja, AppError> {
        let mut tx = self.pool.begin().await?;

        if let Some(turno_id) = payload.turno_id {
            let turno = self
                .repo
                .find_turno_for_update(&mut *tx, turno_id)
                .await?
                .ok_or(AppError::NotFound("Turno de caja"))?;
            verificar_turno_abierto(&turno)?;
        }

        let movimiento = self
            .repo
            .insertar_movimiento(&mut *tx, payload, usuario)
            .await?;

        if let Some(turno_id) = payload.turno_id {
            self.recalcular_totales(&mut tx, turno_id).await?;
        }

        tx.commit().await?;
        Ok(movimiento)
    }

    pub async fn actualizar_movimiento(
        &self,
        id: Uuid,
        payload: &UpdateMovimientoPayload,
    ) -> Result<MovimientoCaja, AppError> {
        let mut tx = self.pool.begin().await?;

        let actual = self
            .repo
            .find_movimiento(id)
            .await?
            .ok_or(AppError::NotFound("Movimiento de caja"))?;

        if !actual.es_editable {
            return Err(AppError::ShiftClosed);
        }
        if let Some(turno_id) = actual.turno_id {
            let turno = self
                .repo
                .find_turno_for_update(&mut *tx, turno_id)
                .await?
                .ok_or(AppError::NotFound("Turno de caja"))?;
            verificar_turno_abierto(&turno)?;
        }

        let movimiento = self.repo.actualizar_movimiento(&mut *tx, id, payload).await?;

        if let Some(turno_id) = actual.turno_id {
            self.recalcular_totales(&mut tx, turno_id).await?;
        }

        tx.commit().await?;
        Ok(movimiento)
    }

    pub async fn list_movimientos(
        &self,
        turno_id: Option<Uuid>,
        desde: Option<DateTime<Utc>>,
        hasta: Option<DateTime<Utc>>,
    ) -> Result<Vec<MovimientoCaja>, AppError> {
        self.repo.list_movimientos(turno_id, desde, hasta).await
    }

    /// Fecha o turno: recalcula tudo a partir dos movimentos, grava a
    /// diferença (contado - esperado) e congela as edições.
    pub async fn cerrar_turno(
        &self,
        id: Uuid,
        monto_cierre: Decimal,
        observaciones: Option<&str>,
        usuario: Option<Uuid>,
    ) -> Result<TurnoCaja, AppError> {
        let mut tx = self.pool.begin().await?;

        let turno = self
            .repo
            .find_turno_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Turno de caja"))?;
        verificar_no_cerrado(&turno)?;

        let movimientos = self.repo.movimientos_de_turno(&mut *tx, id).await?;
        let totales = totales_efectivo(turno.monto_apertura, &movimientos);
        let dif = diferencia(monto_cierre, totales.esperado);

        self.repo
            .update_totales(
                &mut *tx,
                id,
                totales.ingresos,
                totales.egresos,
                totales.esperado,
            )
            .await?;

        let cerrado = self
            .repo
            .cerrar_turno(
                &mut *tx,
                id,
                Utc::now(),
                monto_cierre,
                dif,
                observaciones,
                usuario,
            )
            .await?;

        self.repo.congelar_movimientos(&mut *tx, id).await?;

        tx.commit().await?;

        tracing::info!(
            turno_id = %id,
            esperado = %totales.esperado,
            contado = %monto_cierre,
            diferencia = %dif,
            resultado = cerrado.tipo_diferencia(),
            "Turno de caja cerrado"
        );
        Ok(cerrado)
    }

    async fn recalcular_totales(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        turno_id: Uuid,
    ) -> Result<TurnoCaja, AppError> {
        let turno = self
            .repo
            .find_turno_for_update(&mut **tx, turno_id)
            .await?
            .ok_or(AppError::NotFound("Turno de caja"))?;

        let movimientos = self.repo.movimientos_de_turno(&mut **tx, turno_id).await?;
        let totales = totales_efectivo(turno.monto_apertura, &movimientos);

        self.repo
            .update_totales(
                &mut **tx,
                turno_id,
                totales.ingresos,
                totales.egresos,
                totales.esperado,
            )
            .await
    }

    /// Cierre histórico grosso por rango: agrupa os movimentos ainda sem
    /// cierre, calcula desgloses e vincula tudo num registro imutável.
    pub async fn cerrar_caja(
        &self,
        payload: &CerrarCajaPayload,
        usuario_cierre: Option<Uuid>,
    ) -> Result<CierreCaja, AppError> {
        let ahora = Utc::now();
        if payload.fecha_apertura > ahora {
            return Err(AppError::InvalidInput(
                "fecha_apertura no puede ser futura".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let movimientos = self
            .repo
            .movimientos_sin_cierre(&mut *tx, payload.fecha_apertura, ahora)
            .await?;

        let totales = totales_efectivo(payload.monto_inicial, &movimientos);
        let (ingresos_otros, egresos_otros) = totales_otros(&movimientos);
        let dif = diferencia(payload.efectivo_real, totales.esperado);

        let cantidad_ingresos = movimientos
            .iter()
            .filter(|m| m.tipo == TipoMovimiento::Ingreso)
            .count() as i32;
        let cantidad_egresos = movimientos.len() as i32 - cantidad_ingresos;

        let cierre = self
            .repo
            .crear_cierre(
                &mut *tx,
                payload.fecha_apertura,
                ahora,
                payload.usuario_apertura_id,
                usuario_cierre,
                payload.monto_inicial,
                totales.ingresos,
                totales.egresos,
                ingresos_otros,
                egresos_otros,
                totales.esperado,
                payload.efectivo_real,
                dif,
                &desglose_por_metodo(&movimientos),
                &desglose_por_categoria(&movimientos),
                movimientos.len() as i32,
                cantidad_ingresos,
                cantidad_egresos,
                payload.observaciones.as_deref(),
            )
            .await?;

        let ids: Vec<Uuid> = movimientos.iter().map(|m| m.id).collect();
        if !ids.is_empty() {
            self.repo.vincular_a_cierre(&mut *tx, cierre.id, &ids).await?;
        }

        tx.commit().await?;

        tracing::info!(
            cierre_id = %cierre.id,
            movimientos = cierre.cantidad_movimientos,
            diferencia = %cierre.diferencia,
            "Caja cerrada"
        );
        Ok(cierre)
    }

    pub async fn list_cierres(&self) -> Result<Vec<CierreCaja>, AppError> {
        self.repo.list_cierres().await
    }

    pub async fn detalle_cierre(
        &self,
        id: Uuid,
    ) -> Result<(CierreCaja, Vec<MovimientoCaja>), AppError> {
        let cierre = self
            .repo
            .find_cierre(id)
            .await?
            .ok_or(AppError::NotFound("Cierre de caja"))?;
        let movimientos = self.repo.movimientos_de_cierre(id).await?;
        Ok((cierre, movimientos))
    }

    /// Reporte por rango de fechas, sem persistir nada: desgloses por
    /// método e por categoría sobre todos os movimentos do período.
    pub async fn reporte_periodo(
        &self,
        desde: DateTime<Utc>,
        hasta: DateTime<Utc>,
    ) -> Result<ReportePeriodo, AppError> {
        if desde > hasta {
            return Err(AppError::InvalidInput(
                "El rango de fechas es inválido (desde > hasta)".to_string(),
            ));
        }

        let movimientos = self
            .repo
            .list_movimientos(None, Some(desde), Some(hasta))
            .await?;

        let cantidad_ingresos = movimientos
            .iter()
            .filter(|m| m.tipo == TipoMovimiento::Ingreso)
            .count() as i64;

        Ok(ReportePeriodo {
            desde,
            hasta,
            cantidad_movimientos: movimientos.len() as i64,
            cantidad_ingresos,
            cantidad_egresos: movimientos.len() as i64 - cantidad_ingresos,
            desglose_metodos: desglose_por_metodo(&movimientos),
            desglose_categorias: desglose_por_categoria(&movimientos),
        })
    }
}

#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportePeriodo {
    pub desde: DateTime<Utc>,
    pub hasta: DateTime<Utc>,
    pub cantidad_movimientos: i64,
    pub cantidad_ingresos: i64,
    pub cantidad_egresos: i64,
    #[schema(value_type = Object)]
    pub desglose_metodos: BTreeMap<String, Desglose>,
    #[schema(value_type = Object)]
    pub desglose_categorias: BTreeMap<String, Desglose>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::caja::CategoriaMovimiento;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn mov(
        tipo: TipoMovimiento,
        monto: &str,
        metodo: MetodoPago,
        categoria: CategoriaMovimiento,
    ) -> MovimientoCaja {
        MovimientoCaja {
            id: Uuid::new_v4(),
            tipo,
            monto: dec(monto),
            descripcion: None,
            metodo_pago: metodo,
            categoria,
            turno_id: None,
            cierre_caja_id: None,
            reserva_id: None,
            barbero_id: None,
            usuario_registro: None,
            comprobante: None,
            es_editable: true,
            fecha_creacion: Utc::now(),
            fecha_actualizacion: Utc::now(),
        }
    }

    fn turno(estado: EstadoTurno) -> TurnoCaja {
        TurnoCaja {
            id: Uuid::new_v4(),
            estado,
            fecha_apertura: Utc::now(),
            monto_apertura: dec("20000.00"),
            usuario_apertura: None,
            fecha_cierre: None,
            monto_cierre: None,
            usuario_cierre: None,
            observaciones_cierre: None,
            total_ingresos_efectivo: Decimal::ZERO,
            total_egresos_efectivo: Decimal::ZERO,
            efectivo_esperado: dec("20000.00"),
            diferencia: Decimal::ZERO,
            fecha_creacion: Utc::now(),
            fecha_actualizacion: Utc::now(),
        }
    }

    #[test]
    fn efectivo_esperado_ejemplo_del_negocio() {
        // apertura 20000.00 + ingreso 5000.00 - egreso 1200.50 = 23799.50
        let movimientos = vec![
            mov(
                TipoMovimiento::Ingreso,
                "5000.00",
                MetodoPago::Efectivo,
                CategoriaMovimiento::Servicios,
            ),
            mov(
                TipoMovimiento::Egreso,
                "1200.50",
                MetodoPago::Efectivo,
                CategoriaMovimiento::Gastos,
            ),
        ];

        let totales = totales_efectivo(dec("20000.00"), &movimientos);
        assert_eq!(totales.ingresos, dec("5000.00"));
        assert_eq!(totales.egresos, dec("1200.50"));
        assert_eq!(totales.esperado, dec("23799.50"));
    }

    #[test]
    fn diferencia_con_signo() {
        // contado 23800.00 vs esperado 23799.50 => sobrante de 0.50
        assert_eq!(diferencia(dec("23800.00"), dec("23799.50")), dec("0.50"));
        // faltante
        assert_eq!(diferencia(dec("23000.00"), dec("23799.50")), dec("-799.50"));
        // exacto
        assert_eq!(diferencia(dec("23799.50"), dec("23799.50")), Decimal::ZERO);
    }

    #[test]
    fn tarjeta_no_toca_el_efectivo_esperado() {
        let movimientos = vec![
            mov(
                TipoMovimiento::Ingreso,
                "9999.99",
                MetodoPago::Tarjeta,
                CategoriaMovimiento::Servicios,
            ),
            mov(
                TipoMovimiento::Ingreso,
                "100.00",
                MetodoPago::Efectivo,
                CategoriaMovimiento::Servicios,
            ),
        ];

        let totales = totales_efectivo(dec("1000.00"), &movimientos);
        assert_eq!(totales.esperado, dec("1100.00"));

        let (otros_ing, otros_egr) = totales_otros(&movimientos);
        assert_eq!(otros_ing, dec("9999.99"));
        assert_eq!(otros_egr, Decimal::ZERO);
    }

    #[test]
    fn desglose_por_metodo_incluye_todos() {
        let movimientos = vec![
            mov(
                TipoMovimiento::Ingreso,
                "5000.00",
                MetodoPago::Efectivo,
                CategoriaMovimiento::Servicios,
            ),
            mov(
                TipoMovimiento::Egreso,
                "1500.00",
                MetodoPago::Efectivo,
                CategoriaMovimiento::Gastos,
            ),
            mov(
                TipoMovimiento::Ingreso,
                "3000.00",
                MetodoPago::Mercadopago,
                CategoriaMovimiento::Productos,
            ),
        ];

        let desglose = desglose_por_metodo(&movimientos);
        assert_eq!(desglose.len(), 4);

        let efectivo = &desglose["efectivo"];
        assert_eq!(efectivo.ingresos, dec("5000.00"));
        assert_eq!(efectivo.egresos, dec("1500.00"));
        assert_eq!(efectivo.neto, dec("3500.00"));

        assert_eq!(desglose["mercadopago"].neto, dec("3000.00"));
        // Sin movimientos, pero presente y en cero
        assert_eq!(desglose["tarjeta"], Desglose::default());
    }

    #[test]
    fn desglose_por_categoria_solo_presentes() {
        let movimientos = vec![
            mov(
                TipoMovimiento::Ingreso,
                "2000.00",
                MetodoPago::Efectivo,
                CategoriaMovimiento::Servicios,
            ),
            mov(
                TipoMovimiento::Egreso,
                "800.00",
                MetodoPago::Efectivo,
                CategoriaMovimiento::ServiciosPublicos,
            ),
        ];

        let desglose = desglose_por_categoria(&movimientos);
        assert_eq!(desglose.len(), 2);
        assert_eq!(desglose["servicios"].neto, dec("2000.00"));
        assert_eq!(desglose["servicios_publicos"].neto, dec("-800.00"));
        assert!(!desglose.contains_key("sueldos"));
    }

    #[test]
    fn turno_cerrado_rechaza_movimientos() {
        let cerrado = turno(EstadoTurno::Cerrado);
        assert!(matches!(
            verificar_turno_abierto(&cerrado),
            Err(AppError::ShiftClosed)
        ));
        assert!(verificar_turno_abierto(&turno(EstadoTurno::Abierto)).is_ok());
    }

    #[test]
    fn doble_cierre_rechazado() {
        let cerrado = turno(EstadoTurno::Cerrado);
        assert!(matches!(
            verificar_no_cerrado(&cerrado),
            Err(AppError::AlreadyClosed)
        ));
        assert!(verificar_no_cerrado(&turno(EstadoTurno::Abierto)).is_ok());
    }

    #[test]
    fn esperado_sin_movimientos_es_la_apertura() {
        let totales = totales_efectivo(dec("15000.00"), &[]);
        assert_eq!(totales.esperado, dec("15000.00"));
        assert_eq!(totales.ingresos, Decimal::ZERO);
        assert_eq!(totales.egresos, Decimal::ZERO);
    }
}
