//! Domain models

pub mod order;
pub mod service;
pub mod transaction;
pub mod user;

pub use order::{NewOrder, Order, ORDER_STATUS_PENDING};
pub use service::{FieldKind, NewService, Service, ServiceDraft, ServiceEdit, ServiceField};
pub use transaction::{NewTransaction, Transaction, TransactionKind};
pub use user::User;
