pub mod agenda_service;
pub mod auth_service;
pub mod caja_service;
pub mod notificacion_service;
pub mod reserva_service;

pub use agenda_service::AgendaService;
pub use auth_service::AuthService;
pub use caja_service::CajaService;
pub use notificacion_service::NotificacionService;
pub use reserva_service::ReservaService;
