//! Error handling for chatcart
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the chatcart application
#[derive(Error, Debug)]
pub enum ChatCartError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Payment verification error: {0}")]
    Payment(#[from] PaymentError),

    #[error("Message delivery failed: {0}")]
    Delivery(String),

    #[error("User not found: {phone}")]
    UserNotFound { phone: String },

    #[error("Service not found: {id}")]
    ServiceNotFound { id: String },
}

/// Payment verification specific errors
#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Payment API request failed: {0}")]
    RequestFailed(String),

    #[error("Payment API timeout")]
    Timeout,

    #[error("Invalid payment API response: {0}")]
    InvalidResponse(String),

    #[error("Transaction not found or not verified")]
    NotVerified,

    #[error("Verified payment carried no amount")]
    MissingAmount,
}

/// Result type alias for chatcart operations
pub type Result<T> = std::result::Result<T, ChatCartError>;

/// Result type alias for payment operations
pub type PaymentResult<T> = std::result::Result<T, PaymentError>;
