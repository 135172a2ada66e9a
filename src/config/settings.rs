//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub platform: PlatformConfig,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub payment: PaymentConfig,
    pub phone: PhoneConfig,
    pub broadcast: BroadcastConfig,
    pub dialog: DialogConfig,
    pub i18n: I18nConfig,
    pub logging: LoggingConfig,
}

/// Messaging platform (WhatsApp Cloud API) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlatformConfig {
    /// Base URL of the graph API, e.g. https://graph.facebook.com/v18.0
    pub api_url: String,
    /// Bearer credential for the send-message endpoint
    pub access_token: String,
    /// Sender phone-number id registered with the platform
    pub phone_number_id: String,
    /// Shared secret echoed back during the webhook verification handshake
    pub verify_token: String,
    /// The single admin identity, as a normalized phone number
    pub admin_phone: String,
}

/// Webhook server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedisConfig {
    pub url: String,
    pub prefix: String,
    pub ttl_seconds: u64,
}

/// Payment verification API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaymentConfig {
    pub api_url: String,
    pub api_key: String,
    pub timeout_seconds: u64,
}

/// Phone identity normalization configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PhoneConfig {
    /// Numbering schemes tried in order during normalization
    pub schemes: Vec<PhoneScheme>,
}

/// One national numbering scheme
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PhoneScheme {
    /// Country calling code digits, e.g. "880"
    pub country_code: String,
    /// Number of digits in a bare subscriber number, e.g. 10
    pub local_len: usize,
    /// Local trunk digit that replaces the country code domestically
    pub trunk_digit: char,
}

/// Broadcast fan-out configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BroadcastConfig {
    /// Recipients sent concurrently per batch
    pub batch_size: usize,
    /// Pause between batches in milliseconds
    pub batch_delay_ms: u64,
}

/// Dialog engine configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DialogConfig {
    /// Abandoned flows expire after this many seconds
    pub ttl_seconds: u64,
}

/// Internationalization configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct I18nConfig {
    pub default_language: String,
    pub supported_languages: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("CHATCART"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::ChatCartError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            platform: PlatformConfig {
                api_url: "https://graph.facebook.com/v18.0".to_string(),
                access_token: String::new(),
                phone_number_id: String::new(),
                verify_token: String::new(),
                admin_phone: String::new(),
            },
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/chatcart".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            redis: RedisConfig {
                url: "redis://localhost:6379".to_string(),
                prefix: "chatcart:".to_string(),
                ttl_seconds: 21600,
            },
            payment: PaymentConfig {
                api_url: "https://payments.example.com".to_string(),
                api_key: String::new(),
                timeout_seconds: 10,
            },
            phone: PhoneConfig {
                schemes: vec![
                    PhoneScheme {
                        country_code: "880".to_string(),
                        local_len: 10,
                        trunk_digit: '0',
                    },
                    PhoneScheme {
                        country_code: "91".to_string(),
                        local_len: 10,
                        trunk_digit: '0',
                    },
                ],
            },
            broadcast: BroadcastConfig {
                batch_size: 10,
                batch_delay_ms: 1000,
            },
            dialog: DialogConfig {
                ttl_seconds: 21600,
            },
            i18n: I18nConfig {
                default_language: "en".to_string(),
                supported_languages: vec!["en".to_string()],
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "/var/log/chatcart".to_string(),
            },
        }
    }
}
