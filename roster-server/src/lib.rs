//! roster-server: user record service
//!
//! Layers, leaves first:
//! - `models`: the `User` entity, request/view shapes, pagination arithmetic
//! - `scope`: explicit cancellation/deadline tokens threaded through every call
//! - `db`: the `UserRepository` port with PostgreSQL and in-memory adapters
//! - `service`: CRUD orchestration and the concurrent paginated listing
//! - `http`: axum surface mapping the service onto `/user` routes

pub mod config;
pub mod db;
pub mod http;
pub mod models;
pub mod scope;
pub mod service;

pub use config::{AppConfig, ConfigError, DatabaseConfig};
pub use scope::{CallScope, ScopeError};
pub use service::{ServiceConfig, UserService};
