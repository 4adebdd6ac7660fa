//! productapp application library
//!
//! Product catalogue CRUD over SQLite plus a demo proxy to a public REST API,
//! assembled from modules on top of the kernel, db and http crates.

pub mod bootstrap;
pub mod modules;

pub use bootstrap::Application;
