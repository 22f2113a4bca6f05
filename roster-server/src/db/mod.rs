//! Database layer - connection pool, migrations, and repositories
//!
//! # Design Principles
//!
//! - One shared connection pool, no Arc<Mutex<Connection>>
//! - Rely on DB constraints for id uniqueness, no check-then-insert
//! - No transactions: every repository call is a single statement

pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::create_pool;
pub use repos::*;
