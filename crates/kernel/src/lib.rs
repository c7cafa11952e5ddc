//! Configuration kernel for the bookshelf service.

pub mod settings;

pub use settings::{DatabaseSettings, Environment, LogFormat, ServerSettings, Settings};
