// src/handlers/servicios.rs

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
    models::servicios::{CreateServicioPayload, Servicio, UpdateServicioPayload},
};

#[utoipa::path(
    get,
    path = "/api/servicios",
    tag = "servicios",
    responses((status = 200, description = "Catálogo de servicios", body = Vec<Servicio>))
)]
pub async fn list_servicios(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Servicio>>, AppError> {
    let servicios = app_state.servicio_repo.list_all().await?;
    Ok(Json(servicios))
}

#[utoipa::path(
    get,
    path = "/api/servicios/{id}",
    tag = "servicios",
    params(("id" = Uuid, Path, description = "ID del servicio")),
    responses(
        (status = 200, description = "Servicio", body = Servicio),
        (status = 404, description = "Servicio no encontrado"),
    )
)]
pub async fn get_servicio(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Servicio>, AppError> {
    let servicio = app_state
        .servicio_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Servicio"))?;
    Ok(Json(servicio))
}

#[utoipa::path(
    post,
    path = "/api/servicios",
    tag = "servicios",
    security(("api_jwt" = [])),
    request_body = CreateServicioPayload,
    responses(
        (status = 201, description = "Servicio creado", body = Servicio),
        (status = 403, description = "Requiere rol de administrador"),
    )
)]
pub async fn create_servicio(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<CreateServicioPayload>,
) -> Result<(StatusCode, Json<Servicio>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let servicio = app_state
        .servicio_repo
        .create(&payload.nombre, payload.precio, payload.duracion_min)
        .await?;
    Ok((StatusCode::CREATED, Json(servicio)))
}

#[utoipa::path(
    patch,
    path = "/api/servicios/{id}",
    tag = "servicios",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID del servicio")),
    request_body = UpdateServicioPayload,
    responses(
        (status = 200, description = "Servicio actualizado", body = Servicio),
        (status = 400, description = "Datos inválidos"),
        (status = 404, description = "Servicio no encontrado"),
    )
)]
pub async fn update_servicio(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateServicioPayload>,
) -> Result<Json<Servicio>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let servicio = app_state
        .servicio_repo
        .update(
            id,
            payload.nombre.as_deref(),
            payload.precio,
            payload.duracion_min,
            payload.activo,
        )
        .await?;
    Ok(Json(servicio))
}

#[utoipa::path(
    delete,
    path = "/api/servicios/{id}",
    tag = "servicios",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID del servicio")),
    responses(
        (status = 204, description = "Servicio eliminado"),
        (status = 404, description = "Servicio no encontrado"),
    )
)]
pub async fn delete_servicio(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.servicio_repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
