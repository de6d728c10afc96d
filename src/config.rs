// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{
        BarberoRepository, CajaRepository, ProveedorRepository, ReservaRepository,
        ServicioRepository, UserRepository,
    },
    services::{AgendaService, AuthService, CajaService, NotificacionService, ReservaService},
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub agenda_service: AgendaService,
    pub reserva_service: ReservaService,
    pub caja_service: CajaService,
    pub barbero_repo: BarberoRepository,
    pub servicio_repo: ServicioRepository,
    pub proveedor_repo: ProveedorRepository,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let barbero_repo = BarberoRepository::new(db_pool.clone());
        let servicio_repo = ServicioRepository::new(db_pool.clone());
        let proveedor_repo = ProveedorRepository::new(db_pool.clone());
        let reserva_repo = ReservaRepository::new(db_pool.clone());
        let caja_repo = CajaRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo.clone(), jwt_secret);
        let agenda_service = AgendaService::new(reserva_repo.clone());
        let notificaciones = NotificacionService::new();
        let reserva_service = ReservaService::new(
            reserva_repo,
            barbero_repo.clone(),
            user_repo,
            agenda_service.clone(),
            notificaciones,
            db_pool.clone(),
        );
        let caja_service = CajaService::new(caja_repo, db_pool.clone());

        Ok(Self {
            db_pool,
            auth_service,
            agenda_service,
            reserva_service,
            caja_service,
            barbero_repo,
            servicio_repo,
            proveedor_repo,
        })
    }
}
