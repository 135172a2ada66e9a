//! Shared test doubles and the dispatcher harness
//!
//! In-memory implementations of every trait seam, so full dispatch paths run
//! without Postgres, Redis or the network.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use uuid::Uuid;

use chatcart::config::Settings;
use chatcart::database::{OrderLedger, ServiceCatalog, UserDirectory};
use chatcart::dispatch::Dispatcher;
use chatcart::flows::FlowContext;
use chatcart::i18n::I18n;
use chatcart::models::{
    NewOrder, NewService, NewTransaction, Order, Service, ServiceEdit, ServiceField, Transaction,
    User, ORDER_STATUS_PENDING,
};
use chatcart::platform::{InboundEvent, Messenger, OutboundMessage};
use chatcart::services::{
    AdminNotifier, Broadcaster, PaymentInfo, PaymentVerifier,
};
use chatcart::state::{DialogStore, Flow, InMemoryDialogStore};
use chatcart::utils::errors::{ChatCartError, PaymentError, PaymentResult, Result};

pub const ADMIN: &str = "8801999999999";
pub const USER: &str = "8801712345678";

#[derive(Default)]
pub struct MockUsers {
    users: Mutex<Vec<User>>,
    next_id: AtomicI64,
}

impl MockUsers {
    pub fn seed(&self, phone: &str, balance: f64) {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.users.lock().unwrap().push(User {
            id,
            phone: phone.to_string(),
            name: None,
            balance,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
    }

    pub fn balance_of(&self, phone: &str) -> Option<f64> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.phone == phone)
            .map(|u| u.balance)
    }
}

#[async_trait]
impl UserDirectory for MockUsers {
    async fn get_or_create(&self, phone: &str) -> Result<User> {
        if let Some(user) = self.find(phone).await? {
            return Ok(user);
        }
        self.seed(phone, 0.0);
        Ok(self.find(phone).await?.unwrap())
    }

    async fn find(&self, phone: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.phone == phone)
            .cloned())
    }

    async fn credit_balance(&self, phone: &str, amount: f64) -> Result<f64> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.phone == phone)
            .ok_or_else(|| ChatCartError::UserNotFound {
                phone: phone.to_string(),
            })?;
        user.balance += amount;
        Ok(user.balance)
    }

    async fn debit_if_sufficient(&self, phone: &str, amount: f64) -> Result<bool> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.phone == phone)
            .ok_or_else(|| ChatCartError::UserNotFound {
                phone: phone.to_string(),
            })?;
        if user.balance < amount {
            return Ok(false);
        }
        user.balance -= amount;
        Ok(true)
    }

    async fn list_phones(&self) -> Result<Vec<String>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .map(|u| u.phone.clone())
            .collect())
    }
}

#[derive(Default)]
pub struct MockCatalog {
    services: Mutex<Vec<Service>>,
}

impl MockCatalog {
    pub fn seed(&self, service: Service) {
        self.services.lock().unwrap().push(service);
    }

    pub fn get(&self, id: &str) -> Option<Service> {
        self.services
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    pub fn count(&self) -> usize {
        self.services.lock().unwrap().len()
    }
}

#[async_trait]
impl ServiceCatalog for MockCatalog {
    async fn list_active(&self) -> Result<Vec<Service>> {
        Ok(self
            .services
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.active)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Service>> {
        Ok(self.services.lock().unwrap().clone())
    }

    async fn find(&self, id: &str) -> Result<Option<Service>> {
        Ok(self.get(id))
    }

    async fn create(&self, service: NewService) -> Result<Service> {
        let created = Service {
            id: service.id,
            name: service.name,
            description: service.description,
            price: service.price,
            instructions: service.instructions,
            active: service.active,
            fields: Json(Vec::new()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.services.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn apply_edit(&self, id: &str, edit: ServiceEdit) -> Result<Service> {
        let mut services = self.services.lock().unwrap();
        let service = services
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| ChatCartError::ServiceNotFound { id: id.to_string() })?;
        match edit {
            ServiceEdit::Name(name) => service.name = name,
            ServiceEdit::Description(description) => service.description = description,
            ServiceEdit::Price(price) => service.price = price,
            ServiceEdit::Instructions(instructions) => service.instructions = instructions,
            ServiceEdit::Active(active) => service.active = active,
            ServiceEdit::Fields(fields) => service.fields = Json(fields),
        }
        service.updated_at = Utc::now();
        Ok(service.clone())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut services = self.services.lock().unwrap();
        let before = services.len();
        services.retain(|s| s.id != id);
        if services.len() == before {
            return Err(ChatCartError::ServiceNotFound { id: id.to_string() });
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MockLedger {
    pub orders: Mutex<Vec<Order>>,
    pub transactions: Mutex<Vec<Transaction>>,
}

#[async_trait]
impl OrderLedger for MockLedger {
    async fn create_order(&self, order: NewOrder) -> Result<Order> {
        let created = Order {
            id: Uuid::new_v4(),
            user_phone: order.user_phone,
            service_id: order.service_id,
            service_name: order.service_name,
            price: order.price,
            status: ORDER_STATUS_PENDING.to_string(),
            created_at: Utc::now(),
        };
        self.orders.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn list_orders_for(&self, phone: &str, limit: i64) -> Result<Vec<Order>> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.user_phone == phone)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn record_transaction(&self, tx: NewTransaction) -> Result<Transaction> {
        let created = Transaction {
            id: Uuid::new_v4(),
            user_phone: tx.user_phone,
            amount: tx.amount,
            kind: tx.kind.as_str().to_string(),
            reference: tx.reference,
            note: tx.note,
            created_at: Utc::now(),
        };
        self.transactions.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn find_transaction_by_reference(&self, reference: &str) -> Result<Option<Transaction>> {
        Ok(self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.reference.as_deref() == Some(reference))
            .cloned())
    }

    async fn list_transactions_for(&self, phone: &str, limit: i64) -> Result<Vec<Transaction>> {
        Ok(self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.user_phone == phone)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

/// Messenger that records everything it is told to deliver
#[derive(Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<(String, OutboundMessage)>>,
    failing: Mutex<Vec<String>>,
}

impl RecordingMessenger {
    pub fn fail_for(&self, phone: &str) {
        self.failing.lock().unwrap().push(phone.to_string());
    }

    /// Plain-text renderings of everything sent to `phone`, in order
    pub fn texts_to(&self, phone: &str) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(to, _)| to == phone)
            .map(|(_, m)| m.to_text_fallback())
            .collect()
    }

    pub fn last_to(&self, phone: &str) -> Option<String> {
        self.texts_to(phone).pop()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send(&self, to: &str, message: OutboundMessage) -> Result<()> {
        if self.failing.lock().unwrap().iter().any(|f| f == to) {
            return Err(ChatCartError::Delivery("unreachable".to_string()));
        }
        self.sent.lock().unwrap().push((to.to_string(), message));
        Ok(())
    }
}

/// Scripted payment verifier
#[derive(Default)]
pub struct StubVerifier {
    outcomes: Mutex<HashMap<String, StubPayment>>,
}

#[derive(Clone)]
pub enum StubPayment {
    Verified { amount: f64, payer: String },
    NotVerified,
    MissingAmount,
    Timeout,
}

impl StubVerifier {
    pub fn script(&self, trx_id: &str, outcome: StubPayment) {
        self.outcomes
            .lock()
            .unwrap()
            .insert(trx_id.to_string(), outcome);
    }
}

#[async_trait]
impl PaymentVerifier for StubVerifier {
    async fn verify(&self, trx_id: &str) -> PaymentResult<PaymentInfo> {
        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .get(trx_id)
            .cloned()
            .unwrap_or(StubPayment::NotVerified);
        match outcome {
            StubPayment::Verified { amount, payer } => Ok(PaymentInfo { amount, payer }),
            StubPayment::NotVerified => Err(PaymentError::NotVerified),
            StubPayment::MissingAmount => Err(PaymentError::MissingAmount),
            StubPayment::Timeout => Err(PaymentError::Timeout),
        }
    }
}

/// A dispatcher wired entirely to in-memory doubles
pub struct Harness {
    pub dispatcher: Dispatcher,
    pub users: Arc<MockUsers>,
    pub catalog: Arc<MockCatalog>,
    pub ledger: Arc<MockLedger>,
    pub messenger: Arc<RecordingMessenger>,
    pub verifier: Arc<StubVerifier>,
    pub store: Arc<InMemoryDialogStore>,
}

impl Harness {
    pub async fn text(&self, from: &str, body: &str) {
        self.dispatcher
            .handle_inbound(from, InboundEvent::Text(body.to_string()))
            .await;
    }

    pub async fn list_reply(&self, from: &str, id: &str) {
        self.dispatcher
            .handle_inbound(
                from,
                InboundEvent::ListReply {
                    id: id.to_string(),
                    title: id.to_string(),
                },
            )
            .await;
    }

    pub async fn button(&self, from: &str, id: &str) {
        self.dispatcher
            .handle_inbound(
                from,
                InboundEvent::ButtonReply {
                    id: id.to_string(),
                    title: id.to_string(),
                },
            )
            .await;
    }

    pub async fn flow_of(&self, phone: &str) -> Option<Flow> {
        self.store.load(phone).await.unwrap().map(|s| s.flow)
    }
}

pub fn harness() -> Harness {
    let users = Arc::new(MockUsers::default());
    let catalog = Arc::new(MockCatalog::default());
    let ledger = Arc::new(MockLedger::default());
    let messenger = Arc::new(RecordingMessenger::default());
    let verifier = Arc::new(StubVerifier::default());
    let store = Arc::new(InMemoryDialogStore::new());

    let mut settings = Settings::default();
    settings.platform.admin_phone = ADMIN.to_string();
    settings.broadcast.batch_delay_ms = 0;

    let mut i18n = I18n::new(&settings.i18n);
    i18n.insert_catalog(
        "en",
        serde_json::from_str(include_str!("../../translations/en.json")).unwrap(),
    );

    let dyn_messenger: Arc<dyn Messenger> = messenger.clone();
    let ctx = FlowContext {
        users: users.clone(),
        services: catalog.clone(),
        ledger: ledger.clone(),
        payment: verifier.clone(),
        messenger: dyn_messenger.clone(),
        notifier: AdminNotifier::new(dyn_messenger.clone(), ADMIN.to_string()),
        broadcaster: Broadcaster::new(dyn_messenger, &settings.broadcast),
        i18n,
    };

    let dispatcher = Dispatcher::new(ctx, store.clone() as Arc<dyn DialogStore>, &settings);

    Harness {
        dispatcher,
        users,
        catalog,
        ledger,
        messenger,
        verifier,
        store,
    }
}

/// A catalog entry ready for seeding
pub fn service(id: &str, name: &str, price: f64) -> Service {
    Service {
        id: id.to_string(),
        name: name.to_string(),
        description: format!("{} description", name),
        price,
        instructions: None,
        active: true,
        fields: Json(Vec::new()),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn field(name: &str, label: &str, kind: chatcart::models::FieldKind) -> ServiceField {
    ServiceField {
        name: name.to_string(),
        label: label.to_string(),
        kind,
        options: Vec::new(),
    }
}
