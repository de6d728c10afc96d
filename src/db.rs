pub mod barbero_repo;
pub mod caja_repo;
pub mod proveedor_repo;
pub mod reserva_repo;
pub mod servicio_repo;
pub mod user_repo;

pub use barbero_repo::BarberoRepository;
pub use caja_repo::CajaRepository;
pub use proveedor_repo::ProveedorRepository;
pub use reserva_repo::ReservaRepository;
pub use servicio_repo::ServicioRepository;
pub use user_repo::UserRepository;
