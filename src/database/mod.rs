//! Database module
//!
//! Connection pooling, migrations and the repository layer.

pub mod connection;
pub mod repositories;
pub mod service;

pub use connection::{create_pool, health_check, run_migrations, DatabasePool};
pub use repositories::{
    LedgerRepository, OrderLedger, ServiceCatalog, ServiceRepository, UserDirectory,
    UserRepository,
};
pub use service::DatabaseService;
