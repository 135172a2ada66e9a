//! Repository layer
//!
//! Each repository owns the SQL for one slice of the domain. The engine
//! depends on the `UserDirectory`, `ServiceCatalog` and `OrderLedger` traits
//! so flow handlers can be exercised without a live database.

pub mod ledger;
pub mod service;
pub mod user;

pub use ledger::LedgerRepository;
pub use service::ServiceRepository;
pub use user::UserRepository;

use async_trait::async_trait;

use crate::models::{NewOrder, NewService, NewTransaction, Order, Service, ServiceEdit, Transaction, User};
use crate::utils::errors::Result;

/// User lookup and balance mutation operations invoked by flows
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find a user by normalized phone, creating the record on first contact
    async fn get_or_create(&self, phone: &str) -> Result<User>;

    async fn find(&self, phone: &str) -> Result<Option<User>>;

    /// Credit the balance, returning the new balance
    async fn credit_balance(&self, phone: &str, amount: f64) -> Result<f64>;

    /// Debit the balance only if it covers `amount`. Returns false when the
    /// balance is insufficient; the check and the write are one atomic
    /// statement at the persistence layer.
    async fn debit_if_sufficient(&self, phone: &str, amount: f64) -> Result<bool>;

    /// All known user phones, for broadcast fan-out
    async fn list_phones(&self) -> Result<Vec<String>>;
}

/// Service catalog operations invoked by flows
#[async_trait]
pub trait ServiceCatalog: Send + Sync {
    async fn list_active(&self) -> Result<Vec<Service>>;

    async fn list_all(&self) -> Result<Vec<Service>>;

    async fn find(&self, id: &str) -> Result<Option<Service>>;

    async fn create(&self, service: NewService) -> Result<Service>;

    /// Patch exactly one aspect of a service, refreshing its update timestamp
    async fn apply_edit(&self, id: &str, edit: ServiceEdit) -> Result<Service>;

    async fn delete(&self, id: &str) -> Result<()>;
}

/// Order and balance-transaction bookkeeping invoked by flows
#[async_trait]
pub trait OrderLedger: Send + Sync {
    async fn create_order(&self, order: NewOrder) -> Result<Order>;

    async fn list_orders_for(&self, phone: &str, limit: i64) -> Result<Vec<Order>>;

    async fn record_transaction(&self, tx: NewTransaction) -> Result<Transaction>;

    /// Look up a credit by its external payment reference, used to reject
    /// an already-redeemed trx id
    async fn find_transaction_by_reference(&self, reference: &str) -> Result<Option<Transaction>>;

    async fn list_transactions_for(&self, phone: &str, limit: i64) -> Result<Vec<Transaction>>;
}
