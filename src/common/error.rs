use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro central, com `thiserror` para melhor ergonomia.
// Nenhuma variante é retentável: não existe componente distribuído no núcleo.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Entrada inválida: {0}")]
    InvalidInput(String),

    #[error("Horário em conflito: {0}")]
    SlotConflict(String),

    #[error("O turno de caja já está fechado")]
    ShiftClosed,

    #[error("O turno de caja já foi fechado anteriormente")]
    AlreadyClosed,

    #[error("Já existe um turno de caja aberto")]
    ShiftAlreadyOpen,

    #[error("{0} não encontrado")]
    NotFound(&'static str),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado")]
    Forbidden,

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Uno o más campos son inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidInput(msg) => {
                let body = Json(json!({ "error": msg }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::SlotConflict(horario) => {
                let body = Json(json!({
                    "error": format!(
                        "El horario {} ya está ocupado. Por favor selecciona otro horario.",
                        horario
                    )
                }));
                return (StatusCode::CONFLICT, body).into_response();
            }
            AppError::ShiftClosed => (
                StatusCode::CONFLICT,
                "El turno está cerrado; sus movimientos ya no se pueden modificar.",
            ),
            AppError::AlreadyClosed => (StatusCode::CONFLICT, "El turno ya está cerrado."),
            AppError::ShiftAlreadyOpen => {
                (StatusCode::CONFLICT, "Ya hay un turno de caja abierto.")
            }
            AppError::NotFound(recurso) => {
                let body = Json(json!({ "error": format!("{} no encontrado", recurso) }));
                return (StatusCode::NOT_FOUND, body).into_response();
            }
            AppError::EmailAlreadyExists => {
                (StatusCode::CONFLICT, "Este email ya está registrado.")
            }
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Email o contraseña inválidos.")
            }
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticación inválido o ausente.",
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "No tenés permisos para esta operación.",
            ),

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada; o cliente recebe algo genérico.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocurrió un error inesperado.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
