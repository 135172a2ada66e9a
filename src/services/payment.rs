//! Payment verification service
//!
//! This service checks a user-supplied transaction id against the external
//! payment provider. The engine depends on the [`PaymentVerifier`] trait;
//! `HttpPaymentVerifier` is the production implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::PaymentConfig;
use crate::utils::errors::{ChatCartError, PaymentError, PaymentResult, Result};

/// A verified payment as reported by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentInfo {
    pub amount: f64,
    pub payer: String,
}

/// Verification contract for the recharge flow
#[async_trait]
pub trait PaymentVerifier: Send + Sync {
    /// Verify a transaction id, returning its amount and payer
    async fn verify(&self, trx_id: &str) -> PaymentResult<PaymentInfo>;
}

/// Provider API response structure
#[derive(Debug, Deserialize)]
struct VerifyResponse {
    status: String,
    amount: Option<f64>,
    payer: Option<String>,
}

/// HTTP payment verifier against the provider's verification endpoint
#[derive(Debug, Clone)]
pub struct HttpPaymentVerifier {
    client: Client,
    config: PaymentConfig,
}

impl HttpPaymentVerifier {
    /// Create a new verifier instance
    pub fn new(config: PaymentConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("chatcart/1.0")
            .build()
            .map_err(ChatCartError::Http)?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl PaymentVerifier for HttpPaymentVerifier {
    async fn verify(&self, trx_id: &str) -> PaymentResult<PaymentInfo> {
        debug!(trx_id = trx_id, "Verifying transaction");

        let url = format!(
            "{}/transactions/{}",
            self.config.api_url.trim_end_matches('/'),
            trx_id
        );

        let response = self
            .client
            .get(&url)
            .header("x-api-key", &self.config.api_key)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PaymentError::Timeout
                } else {
                    PaymentError::RequestFailed(e.to_string())
                }
            })?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(PaymentError::NotVerified);
        }

        if !response.status().is_success() {
            return Err(PaymentError::RequestFailed(format!(
                "provider returned {}",
                response.status()
            )));
        }

        let parsed: VerifyResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::InvalidResponse(e.to_string()))?;

        if parsed.status != "verified" {
            warn!(trx_id = trx_id, status = %parsed.status, "Transaction not verified");
            return Err(PaymentError::NotVerified);
        }

        let amount = match parsed.amount {
            Some(amount) if amount > 0.0 => amount,
            _ => return Err(PaymentError::MissingAmount),
        };

        let payer = parsed
            .payer
            .ok_or_else(|| PaymentError::InvalidResponse("payer missing".to_string()))?;

        Ok(PaymentInfo { amount, payer })
    }
}
