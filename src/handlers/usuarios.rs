// src/handlers/usuarios.rs

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AdminUser,
    models::auth::{UpdateRolePayload, User},
};

#[utoipa::path(
    get,
    path = "/api/usuarios",
    tag = "usuarios",
    security(("api_jwt" = [])),
    responses(
        (status = 200, description = "Listado de usuarios", body = Vec<User>),
        (status = 403, description = "Requiere rol de administrador"),
    )
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<User>>, AppError> {
    let users = app_state.auth_service.list_users().await?;
    Ok(Json(users))
}

// Troca de papel: o papel 'admin' também liga a flag is_staff
#[utoipa::path(
    patch,
    path = "/api/usuarios/{id}/role",
    tag = "usuarios",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID del usuario")),
    request_body = UpdateRolePayload,
    responses(
        (status = 200, description = "Rol actualizado", body = User),
        (status = 403, description = "Requiere rol de administrador"),
        (status = 404, description = "Usuario no encontrado"),
    )
)]
pub async fn update_role(
    State(app_state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRolePayload>,
) -> Result<Json<User>, AppError> {
    let user = app_state.auth_service.update_role(id, payload.role).await?;
    Ok(Json(user))
}
