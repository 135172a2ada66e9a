//! Utility modules
//!
//! Shared error types, logging setup and small helpers.

pub mod errors;
pub mod helpers;
pub mod logging;

pub use errors::{ChatCartError, PaymentError, Result};
