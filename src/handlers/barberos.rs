// src/handlers/barberos.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AdminUser,
    models::barberos::{Barbero, CreateBarberoPayload, UpdateBarberoPayload},
};

// Listagem pública (o front de reservas precisa dela sem login)
#[utoipa::path(
    get,
    path = "/api/barberos",
    tag = "barberos",
    responses((status = 200, description = "Barberos activos", body = Vec<Barbero>))
)]
pub async fn list_barberos(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Barbero>>, AppError> {
    let barberos = app_state.barbero_repo.list_active().await?;
    Ok(Json(barberos))
}

#[utoipa::path(
    get,
    path = "/api/barberos/{id}",
    tag = "barberos",
    params(("id" = Uuid, Path, description = "ID del barbero")),
    responses(
        (status = 200, description = "Barbero", body = Barbero),
        (status = 404, description = "Barbero no encontrado"),
    )
)]
pub async fn get_barbero(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Barbero>, AppError> {
    let barbero = app_state
        .barbero_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Barbero"))?;
    Ok(Json(barbero))
}

#[utoipa::path(
    post,
    path = "/api/barberos",
    tag = "barberos",
    security(("api_jwt" = [])),
    request_body = CreateBarberoPayload,
    responses(
        (status = 201, description = "Barbero creado", body = Barbero),
        (status = 403, description = "Requiere rol de administrador"),
    )
)]
pub async fn create_barbero(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<CreateBarberoPayload>,
) -> Result<(StatusCode, Json<Barbero>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let barbero = app_state
        .barbero_repo
        .create(
            &payload.name,
            payload.specialty.as_deref(),
            payload.work_schedule.as_deref(),
            payload.user_id,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(barbero)))
}

#[utoipa::path(
    patch,
    path = "/api/barberos/{id}",
    tag = "barberos",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID del barbero")),
    request_body = UpdateBarberoPayload,
    responses(
        (status = 200, description = "Barbero actualizado", body = Barbero),
        (status = 404, description = "Barbero no encontrado"),
    )
)]
pub async fn update_barbero(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBarberoPayload>,
) -> Result<Json<Barbero>, AppError> {
    let barbero = app_state
        .barbero_repo
        .update(
            id,
            payload.name.as_deref(),
            payload.specialty.as_deref(),
            payload.work_schedule.as_deref(),
            payload.user_id,
        )
        .await?;
    Ok(Json(barbero))
}

// Exclusão lógica: a agenda histórica segue apontando para o barbero
#[utoipa::path(
    delete,
    path = "/api/barberos/{id}",
    tag = "barberos",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID del barbero")),
    responses(
        (status = 204, description = "Barbero eliminado"),
        (status = 404, description = "Barbero no encontrado"),
    )
)]
pub async fn delete_barbero(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.barbero_repo.soft_delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/barberos/{id}/restore",
    tag = "barberos",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID del barbero")),
    responses(
        (status = 200, description = "Barbero restaurado", body = Barbero),
        (status = 404, description = "Barbero no encontrado"),
    )
)]
pub async fn restore_barbero(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Barbero>, AppError> {
    let barbero = app_state.barbero_repo.restore(id).await?;
    Ok(Json(barbero))
}
