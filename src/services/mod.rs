//! Services module
//!
//! Business-facing services: payment verification, admin notification and
//! broadcast fan-out.

pub mod broadcast;
pub mod notifier;
pub mod payment;

pub use broadcast::{BroadcastReport, Broadcaster};
pub use notifier::AdminNotifier;
pub use payment::{HttpPaymentVerifier, PaymentInfo, PaymentVerifier};

use std::sync::Arc;

use crate::config::Settings;
use crate::platform::{Messenger, WhatsAppClient};
use crate::utils::errors::Result;

/// Service factory wiring the production implementations together
#[derive(Clone)]
pub struct ServiceFactory {
    pub messenger: Arc<dyn Messenger>,
    pub payment: Arc<dyn PaymentVerifier>,
    pub notifier: AdminNotifier,
    pub broadcaster: Broadcaster,
}

impl ServiceFactory {
    /// Create all services from settings
    pub fn new(settings: &Settings) -> Result<Self> {
        let messenger: Arc<dyn Messenger> =
            Arc::new(WhatsAppClient::new(settings.platform.clone())?);
        let payment: Arc<dyn PaymentVerifier> =
            Arc::new(HttpPaymentVerifier::new(settings.payment.clone())?);
        let notifier = AdminNotifier::new(messenger.clone(), settings.platform.admin_phone.clone());
        let broadcaster = Broadcaster::new(messenger.clone(), &settings.broadcast);

        Ok(Self {
            messenger,
            payment,
            notifier,
            broadcaster,
        })
    }
}

impl std::fmt::Debug for ServiceFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceFactory").finish_non_exhaustive()
    }
}
