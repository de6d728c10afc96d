//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_middleware;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação: registro e login públicos, /me protegido
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .merge(
            Router::new()
                .route("/me", get(handlers::auth::get_me))
                .layer(axum_middleware::from_fn_with_state(
                    app_state.clone(),
                    auth_middleware,
                )),
        );

    let usuarios_routes = Router::new()
        .route("/", get(handlers::usuarios::list_users))
        .route("/{id}/role", patch(handlers::usuarios::update_role))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    // Barberos: leitura pública (o front de reservas lista sem login),
    // mutações atrás do middleware
    let barberos_routes = Router::new()
        .route("/", get(handlers::barberos::list_barberos))
        .route("/{id}", get(handlers::barberos::get_barbero))
        .merge(
            Router::new()
                .route("/", post(handlers::barberos::create_barbero))
                .route(
                    "/{id}",
                    patch(handlers::barberos::update_barbero)
                        .delete(handlers::barberos::delete_barbero),
                )
                .route("/{id}/restore", post(handlers::barberos::restore_barbero))
                .layer(axum_middleware::from_fn_with_state(
                    app_state.clone(),
                    auth_middleware,
                )),
        );

    let servicios_routes = Router::new()
        .route("/", get(handlers::servicios::list_servicios))
        .route("/{id}", get(handlers::servicios::get_servicio))
        .merge(
            Router::new()
                .route("/", post(handlers::servicios::create_servicio))
                .route(
                    "/{id}",
                    patch(handlers::servicios::update_servicio)
                        .delete(handlers::servicios::delete_servicio),
                )
                .layer(axum_middleware::from_fn_with_state(
                    app_state.clone(),
                    auth_middleware,
                )),
        );

    let proveedores_routes = Router::new()
        .route(
            "/",
            post(handlers::proveedores::create_proveedor)
                .get(handlers::proveedores::list_proveedores),
        )
        .route(
            "/{id}",
            get(handlers::proveedores::get_proveedor)
                .patch(handlers::proveedores::update_proveedor)
                .delete(handlers::proveedores::delete_proveedor),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    // Reservas: criação e grilla de horários públicas; painel do cliente e
    // gestão admin protegidos
    let reservas_routes = Router::new()
        .route("/", post(handlers::reservas::crear_reserva))
        .route("/horarios", get(handlers::reservas::horarios_disponibles))
        .merge(
            Router::new()
                .route("/", get(handlers::reservas::list_reservas))
                .route("/mias", get(handlers::reservas::mis_reservas))
                .route("/proximas", get(handlers::reservas::proximas_reservas))
                .route("/contadores", get(handlers::reservas::contadores))
                .route(
                    "/{id}",
                    get(handlers::reservas::get_reserva)
                        .patch(handlers::reservas::update_reserva),
                )
                .route(
                    "/{id}/confirmar",
                    post(handlers::reservas::confirmar_reserva),
                )
                .route("/{id}/rechazar", post(handlers::reservas::rechazar_reserva))
                .route("/{id}/cancelar", post(handlers::reservas::cancelar_reserva))
                .layer(axum_middleware::from_fn_with_state(
                    app_state.clone(),
                    auth_middleware,
                )),
        );

    let caja_routes = Router::new()
        .route("/turnos", get(handlers::caja::list_turnos))
        .route("/turnos/abrir", post(handlers::caja::abrir_turno))
        .route("/turnos/actual", get(handlers::caja::turno_actual))
        .route("/turnos/{id}", get(handlers::caja::get_turno))
        .route("/turnos/{id}/cerrar", post(handlers::caja::cerrar_turno))
        .route(
            "/movimientos",
            post(handlers::caja::crear_movimiento).get(handlers::caja::list_movimientos),
        )
        .route("/movimientos/{id}", patch(handlers::caja::update_movimiento))
        .route(
            "/cierres",
            post(handlers::caja::crear_cierre).get(handlers::caja::list_cierres),
        )
        .route("/cierres/{id}", get(handlers::caja::get_cierre))
        .route("/reporte", get(handlers::caja::reporte_periodo))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/usuarios", usuarios_routes)
        .nest("/api/barberos", barberos_routes)
        .nest("/api/servicios", servicios_routes)
        .nest("/api/proveedores", proveedores_routes)
        .nest("/api/reservas", reservas_routes)
        .nest("/api/caja", caja_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
