pub mod auth;
pub mod barberos;
pub mod caja;
pub mod proveedores;
pub mod reservas;
pub mod servicios;
pub mod usuarios;
