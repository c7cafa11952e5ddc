//! Bookshelf Application Library
//!
//! Domain modules for the bookshelf HTTP service.

pub mod modules;
