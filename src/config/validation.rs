//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::Settings;
use crate::utils::errors::{ChatCartError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_platform_config(&settings.platform)?;
    validate_database_config(&settings.database)?;
    validate_redis_config(&settings.redis)?;
    validate_payment_config(&settings.payment)?;
    validate_phone_config(&settings.phone)?;
    validate_broadcast_config(&settings.broadcast)?;
    validate_i18n_config(&settings.i18n)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate messaging platform configuration
fn validate_platform_config(config: &super::PlatformConfig) -> Result<()> {
    if config.access_token.is_empty() {
        return Err(ChatCartError::Config(
            "Platform access token is required".to_string(),
        ));
    }

    if config.phone_number_id.is_empty() {
        return Err(ChatCartError::Config(
            "Platform phone number id is required".to_string(),
        ));
    }

    if config.verify_token.is_empty() {
        return Err(ChatCartError::Config(
            "Webhook verify token is required".to_string(),
        ));
    }

    if config.admin_phone.is_empty() {
        return Err(ChatCartError::Config(
            "Admin phone number is required".to_string(),
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(ChatCartError::Config(
            "Database URL is required".to_string(),
        ));
    }

    if config.max_connections == 0 {
        return Err(ChatCartError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(ChatCartError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

/// Validate Redis configuration
fn validate_redis_config(config: &super::RedisConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(ChatCartError::Config("Redis URL is required".to_string()));
    }

    Ok(())
}

/// Validate payment verification configuration
fn validate_payment_config(config: &super::PaymentConfig) -> Result<()> {
    if config.api_url.is_empty() {
        return Err(ChatCartError::Config(
            "Payment API URL is required".to_string(),
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(ChatCartError::Config(
            "Payment timeout must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate phone normalization configuration
fn validate_phone_config(config: &super::PhoneConfig) -> Result<()> {
    if config.schemes.is_empty() {
        return Err(ChatCartError::Config(
            "At least one phone numbering scheme is required".to_string(),
        ));
    }

    for scheme in &config.schemes {
        if scheme.country_code.is_empty() || !scheme.country_code.chars().all(|c| c.is_ascii_digit()) {
            return Err(ChatCartError::Config(format!(
                "Invalid country code: {}",
                scheme.country_code
            )));
        }
        if scheme.local_len == 0 {
            return Err(ChatCartError::Config(
                "Phone scheme local length must be greater than 0".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validate broadcast fan-out configuration
fn validate_broadcast_config(config: &super::BroadcastConfig) -> Result<()> {
    if config.batch_size == 0 {
        return Err(ChatCartError::Config(
            "Broadcast batch size must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate internationalization configuration
fn validate_i18n_config(config: &super::I18nConfig) -> Result<()> {
    if config.default_language.is_empty() {
        return Err(ChatCartError::Config(
            "Default language is required".to_string(),
        ));
    }

    if config.supported_languages.is_empty() {
        return Err(ChatCartError::Config(
            "At least one supported language is required".to_string(),
        ));
    }

    if !config.supported_languages.contains(&config.default_language) {
        return Err(ChatCartError::Config(
            "Default language must be in supported languages list".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(ChatCartError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(ChatCartError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}
