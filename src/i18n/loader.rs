//! Translation loader and i18n management
//!
//! Loads JSON translation catalogs at startup and resolves dotted keys with
//! `{param}` substitution. Copy structure only; the engine never hard-codes
//! user-facing strings.

use std::collections::HashMap;
use std::path::Path;

use serde_json::{Map, Value};
use tokio::fs;
use tracing::{info, warn};

use crate::config::I18nConfig;
use crate::utils::errors::{ChatCartError, Result};

/// Translation parameters for message formatting
pub type TranslationParams = HashMap<String, String>;

/// Main internationalization manager
#[derive(Debug, Clone)]
pub struct I18n {
    translations: HashMap<String, Map<String, Value>>,
    default_language: String,
    supported_languages: Vec<String>,
}

impl I18n {
    /// Create a new I18n instance
    pub fn new(config: &I18nConfig) -> Self {
        Self {
            translations: HashMap::new(),
            default_language: config.default_language.clone(),
            supported_languages: config.supported_languages.clone(),
        }
    }

    /// Load all translation files from the translations directory
    pub async fn load_translations(&mut self) -> Result<()> {
        let translations_dir = Path::new("translations");

        let supported_languages = self.supported_languages.clone();
        for lang_code in &supported_languages {
            let file_path = translations_dir.join(format!("{}.json", lang_code));

            if file_path.exists() {
                let content = fs::read_to_string(&file_path).await?;
                let parsed: Value = serde_json::from_str(&content)?;

                if let Value::Object(map) = parsed {
                    self.translations.insert(lang_code.clone(), map);
                    info!("Loaded translations for language: {}", lang_code);
                } else {
                    return Err(ChatCartError::Config(format!(
                        "Invalid translation file format for {}",
                        lang_code
                    )));
                }
            } else if lang_code == &self.default_language {
                return Err(ChatCartError::Config(format!(
                    "Default language translation file not found: {}",
                    file_path.display()
                )));
            } else {
                warn!("Translation file not found: {}", file_path.display());
            }
        }

        Ok(())
    }

    /// Install a catalog directly, used by tests
    pub fn insert_catalog(&mut self, lang: &str, catalog: Value) {
        if let Value::Object(map) = catalog {
            self.translations.insert(lang.to_string(), map);
        }
    }

    /// Get a translated message
    pub fn t(&self, key: &str, lang: &str, params: Option<&TranslationParams>) -> String {
        let text = self
            .lookup(key, lang)
            .or_else(|| self.lookup(key, &self.default_language));

        match text {
            Some(text) => format_message(&text, params),
            None => {
                warn!("Translation key '{}' not found", key);
                key.to_string()
            }
        }
    }

    /// Get a translated message in the default language
    pub fn td(&self, key: &str, params: Option<&TranslationParams>) -> String {
        self.t(key, &self.default_language.clone(), params)
    }

    fn lookup(&self, key: &str, lang: &str) -> Option<String> {
        let catalog = self.translations.get(lang)?;

        let mut current: &Value = &Value::Object(catalog.clone());
        for part in key.split('.') {
            current = current.get(part)?;
        }

        current.as_str().map(|s| s.to_string())
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }
}

fn format_message(text: &str, params: Option<&TranslationParams>) -> String {
    let Some(params) = params else {
        return text.to_string();
    };

    let mut formatted = text.to_string();
    for (key, value) in params {
        formatted = formatted.replace(&format!("{{{}}}", key), value);
    }
    formatted
}

/// Convenience constructor for [`TranslationParams`]
#[macro_export]
macro_rules! tr_params {
    ($($key:expr => $value:expr),* $(,)?) => {{
        let mut params = $crate::i18n::TranslationParams::new();
        $(params.insert($key.to_string(), $value.to_string());)*
        params
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_i18n() -> I18n {
        let mut i18n = I18n::new(&I18nConfig {
            default_language: "en".to_string(),
            supported_languages: vec!["en".to_string()],
        });
        i18n.insert_catalog(
            "en",
            serde_json::json!({
                "greeting": "Hello {name}!",
                "menu": { "header": "Main Menu" }
            }),
        );
        i18n
    }

    #[test]
    fn test_nested_lookup() {
        assert_eq!(test_i18n().t("menu.header", "en", None), "Main Menu");
    }

    #[test]
    fn test_param_substitution() {
        let params = tr_params!("name" => "Amin");
        assert_eq!(test_i18n().t("greeting", "en", Some(&params)), "Hello Amin!");
    }

    #[test]
    fn test_missing_key_returns_key() {
        assert_eq!(test_i18n().t("nope.nothing", "en", None), "nope.nothing");
    }

    #[test]
    fn test_unknown_language_falls_back() {
        assert_eq!(test_i18n().t("menu.header", "bn", None), "Main Menu");
    }
}
