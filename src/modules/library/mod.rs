//! Authors-and-books catalog: entities, storage, service, and routes.

pub mod models;
pub mod routes;
pub mod service;
pub mod store;
