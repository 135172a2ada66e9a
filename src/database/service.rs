//! Database service layer
//!
//! This module provides a high-level interface to database operations

use crate::database::{DatabasePool, LedgerRepository, ServiceRepository, UserRepository};

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub users: UserRepository,
    pub services: ServiceRepository,
    pub ledger: LedgerRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            services: ServiceRepository::new(pool.clone()),
            ledger: LedgerRepository::new(pool),
        }
    }
}
