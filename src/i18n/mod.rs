//! Internationalization module
//!
//! Multi-language message catalogs with parameter substitution.

pub mod loader;

pub use loader::{I18n, TranslationParams};
