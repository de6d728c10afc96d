// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- Enums ---

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Barbero,
    Cliente,
}

impl Role {
    pub fn display(&self) -> &'static str {
        match self {
            Role::Admin => "Administrador",
            Role::Barbero => "Barbero",
            Role::Cliente => "Cliente",
        }
    }
}

/// Deriva o papel efetivo de um usuário num único lugar.
/// Superuser ou staff sempre contam como Admin; caso contrário vale o papel
/// armazenado no perfil.
pub fn effective_role(is_superuser: bool, is_staff: bool, stored_role: Role) -> Role {
    if is_superuser || is_staff {
        Role::Admin
    } else {
        stored_role
    }
}

// --- Structs ---

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    #[schema(example = "lucas.b")]
    pub username: String,
    #[schema(example = "lucas@clasev.com.ar")]
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    pub first_name: String,
    pub last_name: String,

    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,

    pub role: Role,

    #[schema(example = "+54 9 11 5555-5555")]
    pub telefono: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn effective_role(&self) -> Role {
        effective_role(self.is_superuser, self.is_staff, self.role)
    }
}

// Dados para registro de um novo usuário
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserPayload {
    #[validate(length(min = 3, message = "El usuario debe tener al menos 3 caracteres."))]
    pub username: String,
    #[validate(email(message = "El email ingresado es inválido."))]
    pub email: String,
    #[validate(length(min = 8, message = "La contraseña debe tener al menos 8 caracteres."))]
    pub password: String,
    #[validate(length(min = 8, message = "La confirmación debe tener al menos 8 caracteres."))]
    pub password2: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "El email ingresado es inválido."))]
    pub email: String,
    #[validate(length(min = 1, message = "La contraseña es obligatoria."))]
    pub password: String,
}

// Resposta de autenticação com o token e o papel efetivo
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub role: Role,
    pub user: UserSummary,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

// Payload para troca de papel (somente admin)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRolePayload {
    pub role: Role,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn superuser_sempre_admin() {
        assert_eq!(effective_role(true, false, Role::Cliente), Role::Admin);
        assert_eq!(effective_role(true, true, Role::Barbero), Role::Admin);
    }

    #[test]
    fn staff_sempre_admin() {
        assert_eq!(effective_role(false, true, Role::Cliente), Role::Admin);
    }

    #[test]
    fn sem_flags_vale_o_papel_armazenado() {
        assert_eq!(effective_role(false, false, Role::Barbero), Role::Barbero);
        assert_eq!(effective_role(false, false, Role::Cliente), Role::Cliente);
        assert_eq!(effective_role(false, false, Role::Admin), Role::Admin);
    }
}
