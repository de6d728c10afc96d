// src/handlers/reservas.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{AdminUser, AuthenticatedUser},
    models::auth::Role,
    models::reservas::{
        ContadoresCliente, CreateReservaPayload, DisponibilidadResponse, EstadoReserva,
        RechazarReservaPayload, Reserva, UpdateReservaPayload,
    },
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct DisponibilidadQuery {
    pub barbero: Uuid,
    pub fecha: NaiveDate,
    /// Duración total pedida en minutos; por defecto un bloque de 60.
    pub duracion: Option<i32>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReservasQuery {
    pub estado: Option<EstadoReserva>,
    pub email: Option<String>,
}

// --- Público ---

// Grilla de disponibilidad de un barbero para un día
#[utoipa::path(
    get,
    path = "/api/reservas/horarios",
    tag = "reservas",
    params(DisponibilidadQuery),
    responses(
        (status = 200, description = "Slots de la grilla con su disponibilidad", body = DisponibilidadResponse),
        (status = 400, description = "Duración inválida"),
    )
)]
pub async fn horarios_disponibles(
    State(app_state): State<AppState>,
    Query(query): Query<DisponibilidadQuery>,
) -> Result<Json<DisponibilidadResponse>, AppError> {
    let disponibilidad = app_state
        .agenda_service
        .disponibilidad(query.barbero, query.fecha, query.duracion)
        .await?;
    Ok(Json(disponibilidad))
}

// Criação pública: o cliente reserva sem login
#[utoipa::path(
    post,
    path = "/api/reservas",
    tag = "reservas",
    request_body = CreateReservaPayload,
    responses(
        (status = 201, description = "Reserva creada (pendiente)", body = Reserva),
        (status = 409, description = "El horario ya está ocupado"),
        (status = 400, description = "Datos inválidos"),
    )
)]
pub async fn crear_reserva(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateReservaPayload>,
) -> Result<(StatusCode, Json<Reserva>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let reserva = app_state.reserva_service.crear_reserva(&payload).await?;
    Ok((StatusCode::CREATED, Json(reserva)))
}

// --- Painel do cliente (autenticado) ---

#[utoipa::path(
    get,
    path = "/api/reservas/mias",
    tag = "reservas",
    security(("api_jwt" = [])),
    params(ReservasQuery),
    responses((status = 200, description = "Reservas del usuario autenticado", body = Vec<Reserva>))
)]
pub async fn mis_reservas(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<ReservasQuery>,
) -> Result<Json<Vec<Reserva>>, AppError> {
    let reservas = app_state
        .reserva_service
        .list_by_email(&user.email, query.estado)
        .await?;
    Ok(Json(reservas))
}

#[utoipa::path(
    get,
    path = "/api/reservas/proximas",
    tag = "reservas",
    security(("api_jwt" = [])),
    responses((status = 200, description = "Reservas futuras del usuario", body = Vec<Reserva>))
)]
pub async fn proximas_reservas(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<Reserva>>, AppError> {
    let reservas = app_state.reserva_service.list_proximas(&user.email).await?;
    Ok(Json(reservas))
}

#[utoipa::path(
    get,
    path = "/api/reservas/contadores",
    tag = "reservas",
    security(("api_jwt" = [])),
    responses((status = 200, description = "Contadores por estado del usuario", body = ContadoresCliente))
)]
pub async fn contadores(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<ContadoresCliente>, AppError> {
    let contadores = app_state
        .reserva_service
        .contadores_cliente(&user.email)
        .await?;
    Ok(Json(contadores))
}

// O dono cancela a própria reserva; o admin cancela qualquer uma
#[utoipa::path(
    post,
    path = "/api/reservas/{id}/cancelar",
    tag = "reservas",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID de la reserva")),
    responses(
        (status = 200, description = "Reserva cancelada", body = Reserva),
        (status = 403, description = "La reserva pertenece a otro cliente"),
        (status = 404, description = "Reserva no encontrada"),
    )
)]
pub async fn cancelar_reserva(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Reserva>, AppError> {
    let reserva = app_state.reserva_service.find_by_id(id).await?;

    let es_admin = user.effective_role() == Role::Admin;
    if !es_admin && !reserva.email_cliente.eq_ignore_ascii_case(&user.email) {
        return Err(AppError::Forbidden);
    }

    let cancelada = app_state.reserva_service.cancelar(id).await?;
    Ok(Json(cancelada))
}

// --- Painel admin ---

#[utoipa::path(
    get,
    path = "/api/reservas",
    tag = "reservas",
    security(("api_jwt" = [])),
    params(ReservasQuery),
    responses((status = 200, description = "Todas las reservas", body = Vec<Reserva>))
)]
pub async fn list_reservas(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<ReservasQuery>,
) -> Result<Json<Vec<Reserva>>, AppError> {
    let reservas = app_state
        .reserva_service
        .list_admin(query.estado, query.email.as_deref())
        .await?;
    Ok(Json(reservas))
}

#[utoipa::path(
    get,
    path = "/api/reservas/{id}",
    tag = "reservas",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID de la reserva")),
    responses(
        (status = 200, description = "Reserva", body = Reserva),
        (status = 404, description = "Reserva no encontrada"),
    )
)]
pub async fn get_reserva(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Reserva>, AppError> {
    let reserva = app_state.reserva_service.find_by_id(id).await?;
    Ok(Json(reserva))
}

#[utoipa::path(
    post,
    path = "/api/reservas/{id}/confirmar",
    tag = "reservas",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID de la reserva")),
    responses(
        (status = 200, description = "Reserva confirmada", body = Reserva),
        (status = 404, description = "Reserva no encontrada"),
    )
)]
pub async fn confirmar_reserva(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Reserva>, AppError> {
    let reserva = app_state.reserva_service.confirmar(id).await?;
    Ok(Json(reserva))
}

#[utoipa::path(
    post,
    path = "/api/reservas/{id}/rechazar",
    tag = "reservas",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID de la reserva")),
    request_body = RechazarReservaPayload,
    responses(
        (status = 200, description = "Reserva rechazada", body = Reserva),
        (status = 404, description = "Reserva no encontrada"),
    )
)]
pub async fn rechazar_reserva(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RechazarReservaPayload>,
) -> Result<Json<Reserva>, AppError> {
    let reserva = app_state
        .reserva_service
        .rechazar(id, payload.motivo.as_deref())
        .await?;
    Ok(Json(reserva))
}

// Gestión de pagos y notas del panel admin
#[utoipa::path(
    patch,
    path = "/api/reservas/{id}",
    tag = "reservas",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID de la reserva")),
    request_body = UpdateReservaPayload,
    responses(
        (status = 200, description = "Reserva actualizada", body = Reserva),
        (status = 404, description = "Reserva no encontrada"),
    )
)]
pub async fn update_reserva(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReservaPayload>,
) -> Result<Json<Reserva>, AppError> {
    let reserva = app_state.reserva_service.actualizar(id, &payload).await?;
    Ok(Json(reserva))
}
