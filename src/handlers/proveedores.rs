// src/handlers/proveedores.rs

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
    models::proveedores::{CreateProveedorPayload, Proveedor, UpdateProveedorPayload},
};

#[utoipa::path(
    get,
    path = "/api/proveedores",
    tag = "proveedores",
    security(("api_jwt" = [])),
    responses((status = 200, description = "Listado de proveedores", body = Vec<Proveedor>))
)]
pub async fn list_proveedores(
    State(app_state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<Proveedor>>, AppError> {
    let proveedores = app_state.proveedor_repo.list_all().await?;
    Ok(Json(proveedores))
}

#[utoipa::path(
    get,
    path = "/api/proveedores/{id}",
    tag = "proveedores",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID del proveedor")),
    responses(
        (status = 200, description = "Proveedor", body = Proveedor),
        (status = 404, description = "Proveedor no encontrado"),
    )
)]
pub async fn get_proveedor(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Proveedor>, AppError> {
    let proveedor = app_state
        .proveedor_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Proveedor"))?;
    Ok(Json(proveedor))
}

#[utoipa::path(
    post,
    path = "/api/proveedores",
    tag = "proveedores",
    security(("api_jwt" = [])),
    request_body = CreateProveedorPayload,
    responses(
        (status = 201, description = "Proveedor creado", body = Proveedor),
        (status = 400, description = "Datos inválidos"),
    )
)]
pub async fn create_proveedor(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Json(payload): Json<CreateProveedorPayload>,
) -> Result<(StatusCode, Json<Proveedor>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let proveedor = app_state.proveedor_repo.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(proveedor)))
}

#[utoipa::path(
    patch,
    path = "/api/proveedores/{id}",
    tag = "proveedores",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID del proveedor")),
    request_body = UpdateProveedorPayload,
    responses(
        (status = 200, description = "Proveedor actualizado", body = Proveedor),
        (status = 404, description = "Proveedor no encontrado"),
    )
)]
pub async fn update_proveedor(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProveedorPayload>,
) -> Result<Json<Proveedor>, AppError> {
    let proveedor = app_state.proveedor_repo.update(id, &payload).await?;
    Ok(Json(proveedor))
}

#[utoipa::path(
    delete,
    path = "/api/proveedores/{id}",
    tag = "proveedores",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID del proveedor")),
    responses(
        (status = 204, description = "Proveedor eliminado"),
        (status = 404, description = "Proveedor no encontrado"),
    )
)]
pub async fn delete_proveedor(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.proveedor_repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
