// src/handlers/caja.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AdminUser,
    models::caja::{
        AbrirTurnoPayload, CerrarCajaPayload, CerrarTurnoPayload, CierreCaja,
        CreateMovimientoPayload, MovimientoCaja, TurnoCaja, UpdateMovimientoPayload,
    },
    services::caja_service::ReportePeriodo,
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TurnoDetalle {
    #[serde(flatten)]
    pub turno: TurnoCaja,
    pub movimientos: Vec<MovimientoCaja>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CierreDetalle {
    #[serde(flatten)]
    pub cierre: CierreCaja,
    pub movimientos: Vec<MovimientoCaja>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct MovimientosQuery {
    pub turno: Option<Uuid>,
    pub desde: Option<DateTime<Utc>>,
    pub hasta: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReporteQuery {
    pub desde: DateTime<Utc>,
    pub hasta: DateTime<Utc>,
}

// --- Turnos ---

#[utoipa::path(
    post,
    path = "/api/caja/turnos/abrir",
    tag = "caja",
    security(("api_jwt" = [])),
    request_body = AbrirTurnoPayload,
    responses(
        (status = 201, description = "Turno abierto", body = TurnoCaja),
        (status = 409, description = "Ya existe un turno abierto"),
    )
)]
pub async fn abrir_turno(
    State(app_state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<AbrirTurnoPayload>,
) -> Result<(StatusCode, Json<TurnoCaja>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let turno = app_state
        .caja_service
        .abrir_turno(payload.monto_apertura, Some(admin.id))
        .await?;
    Ok((StatusCode::CREATED, Json(turno)))
}

#[utoipa::path(
    get,
    path = "/api/caja/turnos/actual",
    tag = "caja",
    security(("api_jwt" = [])),
    responses(
        (status = 200, description = "Turno abierto actual", body = TurnoCaja),
        (status = 404, description = "No hay turno abierto"),
    )
)]
pub async fn turno_actual(
    State(app_state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<TurnoCaja>, AppError> {
    let turno = app_state.caja_service.turno_actual().await?;
    Ok(Json(turno))
}

#[utoipa::path(
    get,
    path = "/api/caja/turnos",
    tag = "caja",
    security(("api_jwt" = [])),
    responses((status = 200, description = "Historial de turnos", body = Vec<TurnoCaja>))
)]
pub async fn list_turnos(
    State(app_state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<TurnoCaja>>, AppError> {
    let turnos = app_state.caja_service.list_turnos().await?;
    Ok(Json(turnos))
}

#[utoipa::path(
    get,
    path = "/api/caja/turnos/{id}",
    tag = "caja",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID del turno")),
    responses(
        (status = 200, description = "Turno con sus movimientos", body = TurnoDetalle),
        (status = 404, description = "Turno no encontrado"),
    )
)]
pub async fn get_turno(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TurnoDetalle>, AppError> {
    let (turno, movimientos) = app_state.caja_service.detalle_turno(id).await?;
    Ok(Json(TurnoDetalle { turno, movimientos }))
}

#[utoipa::path(
    post,
    path = "/api/caja/turnos/{id}/cerrar",
    tag = "caja",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID del turno")),
    request_body = CerrarTurnoPayload,
    responses(
        (status = 200, description = "Turno cerrado con la diferencia calculada", body = TurnoCaja),
        (status = 409, description = "El turno ya estaba cerrado"),
        (status = 404, description = "Turno no encontrado"),
    )
)]
pub async fn cerrar_turno(
    State(app_state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CerrarTurnoPayload>,
) -> Result<Json<TurnoCaja>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let turno = app_state
        .caja_service
        .cerrar_turno(
            id,
            payload.monto_cierre,
            payload.observaciones.as_deref(),
            Some(admin.id),
        )
        .await?;
    Ok(Json(turno))
}

// --- Movimientos ---

#[utoipa::path(
    post,
    path = "/api/caja/movimientos",
    tag = "caja",
    security(("api_jwt" = [])),
    request_body = CreateMovimientoPayload,
    responses(
        (status = 201, description = "Movimiento registrado", body = MovimientoCaja),
        (status = 409, description = "El turno está cerrado"),
    )
)]
pub async fn crear_movimiento(
    State(app_state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<CreateMovimientoPayload>,
) -> Result<(StatusCode, Json<MovimientoCaja>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let movimiento = app_state
        .caja_service
        .registrar_movimiento(&payload, Some(admin.id))
        .await?;
    Ok((StatusCode::CREATED, Json(movimiento)))
}

#[utoipa::path(
    get,
    path = "/api/caja/movimientos",
    tag = "caja",
    security(("api_jwt" = [])),
    params(MovimientosQuery),
    responses((status = 200, description = "Movimientos filtrados", body = Vec<MovimientoCaja>))
)]
pub async fn list_movimientos(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<MovimientosQuery>,
) -> Result<Json<Vec<MovimientoCaja>>, AppError> {
    let movimientos = app_state
        .caja_service
        .list_movimientos(query.turno, query.desde, query.hasta)
        .await?;
    Ok(Json(movimientos))
}

#[utoipa::path(
    patch,
    path = "/api/caja/movimientos/{id}",
    tag = "caja",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID del movimiento")),
    request_body = UpdateMovimientoPayload,
    responses(
        (status = 200, description = "Movimiento actualizado", body = MovimientoCaja),
        (status = 400, description = "Datos inválidos"),
        (status = 409, description = "El movimiento pertenece a un turno cerrado"),
        (status = 404, description = "Movimiento no encontrado"),
    )
)]
pub async fn update_movimiento(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMovimientoPayload>,
) -> Result<Json<MovimientoCaja>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let movimiento = app_state
        .caja_service
        .actualizar_movimiento(id, &payload)
        .await?;
    Ok(Json(movimiento))
}

// --- Cierres históricos ---

#[utoipa::path(
    post,
    path = "/api/caja/cierres",
    tag = "caja",
    security(("api_jwt" = [])),
    request_body = CerrarCajaPayload,
    responses(
        (status = 201, description = "Cierre histórico creado", body = CierreCaja),
        (status = 400, description = "Rango de fechas inválido"),
    )
)]
pub async fn crear_cierre(
    State(app_state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<CerrarCajaPayload>,
) -> Result<(StatusCode, Json<CierreCaja>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let cierre = app_state
        .caja_service
        .cerrar_caja(&payload, Some(admin.id))
        .await?;
    Ok((StatusCode::CREATED, Json(cierre)))
}

#[utoipa::path(
    get,
    path = "/api/caja/cierres",
    tag = "caja",
    security(("api_jwt" = [])),
    responses((status = 200, description = "Historial de cierres", body = Vec<CierreCaja>))
)]
pub async fn list_cierres(
    State(app_state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<CierreCaja>>, AppError> {
    let cierres = app_state.caja_service.list_cierres().await?;
    Ok(Json(cierres))
}

#[utoipa::path(
    get,
    path = "/api/caja/cierres/{id}",
    tag = "caja",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID del cierre")),
    responses(
        (status = 200, description = "Cierre con sus movimientos", body = CierreDetalle),
        (status = 404, description = "Cierre no encontrado"),
    )
)]
pub async fn get_cierre(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<CierreDetalle>, AppError> {
    let (cierre, movimientos) = app_state.caja_service.detalle_cierre(id).await?;
    Ok(Json(CierreDetalle { cierre, movimientos }))
}

// --- Reportes ---

#[utoipa::path(
    get,
    path = "/api/caja/reporte",
    tag = "caja",
    security(("api_jwt" = [])),
    params(ReporteQuery),
    responses(
        (status = 200, description = "Desgloses del período", body = ReportePeriodo),
        (status = 400, description = "Rango de fechas inválido"),
    )
)]
pub async fn reporte_periodo(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<ReporteQuery>,
) -> Result<Json<ReportePeriodo>, AppError> {
    let reporte = app_state
        .caja_service
        .reporte_periodo(query.desde, query.hasta)
        .await?;
    Ok(Json(reporte))
}
