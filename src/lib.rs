//! ChatCart - a WhatsApp conversational commerce backend
//!
//! Users recharge a balance and buy digital services over chat; the single
//! admin manages the catalog and broadcasts announcements. The engine is a
//! per-user dialog state machine driven by webhook events.
//!
//! ## Architecture
//!
//! - `platform`: webhook parsing, outbound message shapes, delivery client
//! - `dispatch`: the inbound waterfall and flow-less command routing
//! - `flows`: one handler per multi-step dialog
//! - `state`: typed flow definitions and the dialog store
//! - `database`: sqlx repositories behind trait seams
//! - `services`: payment verification, admin notification, broadcast fan-out

pub mod config;
pub mod database;
pub mod dispatch;
pub mod flows;
pub mod i18n;
pub mod models;
pub mod platform;
pub mod services;
pub mod state;
pub mod utils;

pub use config::Settings;
pub use dispatch::Dispatcher;
pub use utils::errors::{ChatCartError, Result};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const NAME: &str = env!("CARGO_PKG_NAME");
