// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Usuarios ---
        handlers::usuarios::list_users,
        handlers::usuarios::update_role,

        // --- Barberos ---
        handlers::barberos::list_barberos,
        handlers::barberos::get_barbero,
        handlers::barberos::create_barbero,
        handlers::barberos::update_barbero,
        handlers::barberos::delete_barbero,
        handlers::barberos::restore_barbero,

        // --- Servicios ---
        handlers::servicios::list_servicios,
        handlers::servicios::get_servicio,
        handlers::servicios::create_servicio,
        handlers::servicios::update_servicio,
        handlers::servicios::delete_servicio,

        // --- Proveedores ---
        handlers::proveedores::list_proveedores,
        handlers::proveedores::get_proveedor,
        handlers::proveedores::create_proveedor,
        handlers::proveedores::update_proveedor,
        handlers::proveedores::delete_proveedor,

        // --- Reservas ---
        handlers::reservas::horarios_disponibles,
        handlers::reservas::crear_reserva,
        handlers::reservas::mis_reservas,
        handlers::reservas::proximas_reservas,
        handlers::reservas::contadores,
        handlers::reservas::cancelar_reserva,
        handlers::reservas::list_reservas,
        handlers::reservas::get_reserva,
        handlers::reservas::confirmar_reserva,
        handlers::reservas::rechazar_reserva,
        handlers::reservas::update_reserva,

        // --- Caja ---
        handlers::caja::abrir_turno,
        handlers::caja::turno_actual,
        handlers::caja::list_turnos,
        handlers::caja::get_turno,
        handlers::caja::cerrar_turno,
        handlers::caja::crear_movimiento,
        handlers::caja::list_movimientos,
        handlers::caja::update_movimiento,
        handlers::caja::crear_cierre,
        handlers::caja::list_cierres,
        handlers::caja::get_cierre,
        handlers::caja::reporte_periodo,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::UserSummary,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::UpdateRolePayload,

            // --- Barberos ---
            models::barberos::Barbero,
            models::barberos::CreateBarberoPayload,
            models::barberos::UpdateBarberoPayload,

            // --- Servicios ---
            models::servicios::Servicio,
            models::servicios::CreateServicioPayload,
            models::servicios::UpdateServicioPayload,

            // --- Proveedores ---
            models::proveedores::Proveedor,
            models::proveedores::CreateProveedorPayload,
            models::proveedores::UpdateProveedorPayload,

            // --- Reservas ---
            models::reservas::EstadoReserva,
            models::reservas::MetodoPago,
            models::reservas::ServicioContratado,
            models::reservas::Reserva,
            models::reservas::ClientePayload,
            models::reservas::ReservaDatosPayload,
            models::reservas::CreateReservaPayload,
            models::reservas::UpdateReservaPayload,
            models::reservas::RechazarReservaPayload,
            models::reservas::SlotInfo,
            models::reservas::DisponibilidadResponse,
            models::reservas::ContadoresCliente,

            // --- Caja ---
            models::caja::TipoMovimiento,
            models::caja::CategoriaMovimiento,
            models::caja::EstadoTurno,
            models::caja::MovimientoCaja,
            models::caja::TurnoCaja,
            models::caja::Desglose,
            models::caja::CierreCaja,
            models::caja::AbrirTurnoPayload,
            models::caja::CerrarTurnoPayload,
            models::caja::CreateMovimientoPayload,
            models::caja::UpdateMovimientoPayload,
            models::caja::CerrarCajaPayload,
            handlers::caja::TurnoDetalle,
            handlers::caja::CierreDetalle,
            services::caja_service::ReportePeriodo,
        )
    ),
    tags(
        (name = "auth", description = "Autenticación y registro"),
        (name = "usuarios", description = "Gestión de usuarios y roles"),
        (name = "barberos", description = "Barberos del local"),
        (name = "servicios", description = "Catálogo de servicios"),
        (name = "proveedores", description = "Proveedores del local"),
        (name = "reservas", description = "Agenda y reservas"),
        (name = "caja", description = "Turnos de caja, movimientos y cierres"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
