//! Bilingual message lookup.
//!
//! Messages come from a key -> {en, ar} table embedded at build time and
//! parsed once. A [`Translator`] is a cheap handle on that table fixed to one
//! language; lookups fall back to English and then to the key itself.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use portfolio_admin_core::{Direction, Language};

use crate::models::session::keys;
use crate::storage::{KeyValueStore, StorageError};

const BUILTIN_MESSAGES: &str = include_str!("../resources/messages.yaml");

#[derive(Debug, Error)]
pub enum I18nError {
    #[error("invalid message table: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Debug, Deserialize)]
struct Message {
    en: String,
    #[serde(default)]
    ar: Option<String>,
}

impl Message {
    fn get(&self, language: Language) -> &str {
        match language {
            Language::Ar => self.ar.as_deref().unwrap_or(&self.en),
            Language::En => &self.en,
        }
    }
}

/// Message lookup for one language.
#[derive(Debug, Clone)]
pub struct Translator {
    messages: Arc<HashMap<String, Message>>,
    language: Language,
}

impl Translator {
    /// Translator over the built-in message table.
    ///
    /// # Errors
    ///
    /// Returns `I18nError::Parse` if the embedded table is malformed.
    pub fn new(language: Language) -> Result<Self, I18nError> {
        Self::from_yaml(BUILTIN_MESSAGES, language)
    }

    /// Translator over a caller-supplied table.
    ///
    /// # Errors
    ///
    /// Returns `I18nError::Parse` if `yaml` is not a key -> {en, ar} map.
    pub fn from_yaml(yaml: &str, language: Language) -> Result<Self, I18nError> {
        let messages: HashMap<String, Message> = serde_yaml::from_str(yaml)?;
        Ok(Self {
            messages: Arc::new(messages),
            language,
        })
    }

    /// The same table in another language.
    #[must_use]
    pub fn with_language(&self, language: Language) -> Self {
        Self {
            messages: Arc::clone(&self.messages),
            language,
        }
    }

    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.language.direction()
    }

    /// The message for `key`, if the table has one.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(|m| m.get(self.language))
    }

    /// The message for `key`, or `key` itself when the table lacks it.
    #[must_use]
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key).unwrap_or(key)
    }

    /// [`Self::t`] with `{name}` placeholders filled from `args`.
    #[must_use]
    pub fn t_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        args.iter()
            .fold(self.t(key).to_string(), |text, (name, value)| {
                text.replace(&format!("{{{name}}}"), value)
            })
    }
}

/// The saved dashboard language, English when unset or unreadable.
#[must_use]
pub fn load_language(store: &dyn KeyValueStore) -> Language {
    match store.get(keys::LANGUAGE) {
        Ok(Some(code)) => code.parse().unwrap_or_else(|e| {
            warn!(error = %e, "Ignoring stored language");
            Language::default()
        }),
        Ok(None) => Language::default(),
        Err(e) => {
            warn!(error = %e, "Failed to read stored language");
            Language::default()
        }
    }
}

/// # Errors
///
/// Returns `StorageError` if the preference cannot be written.
pub fn save_language(store: &dyn KeyValueStore, language: Language) -> Result<(), StorageError> {
    store.set(keys::LANGUAGE, language.code())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_builtin_table_parses() {
        let t = Translator::new(Language::En).unwrap();
        assert_eq!(t.t("auth.invalid_credentials"), "Invalid credentials");
        assert_eq!(
            t.t("error.table_not_found"),
            "Table not found. Please check database setup."
        );
    }

    #[test]
    fn test_arabic_and_fallbacks() {
        let yaml = "greeting:\n  en: Hello\n  ar: مرحبا\nonly_en:\n  en: English only\n";
        let t = Translator::from_yaml(yaml, Language::Ar).unwrap();

        assert_eq!(t.t("greeting"), "مرحبا");
        assert_eq!(t.t("only_en"), "English only");
        assert_eq!(t.t("missing.key"), "missing.key");
        assert_eq!(t.direction(), Direction::Rtl);
        assert_eq!(t.with_language(Language::En).t("greeting"), "Hello");
    }

    #[test]
    fn test_placeholders() {
        let t = Translator::new(Language::En).unwrap();
        assert_eq!(
            t.t_with("validation.too_long", &[("field", "English Title"), ("max", "200")]),
            "English Title is too long (max 200 characters)"
        );
    }

    #[test]
    fn test_language_preference_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(load_language(&store), Language::En);

        save_language(&store, Language::Ar).unwrap();
        assert_eq!(load_language(&store), Language::Ar);

        store.set(keys::LANGUAGE, "klingon").unwrap();
        assert_eq!(load_language(&store), Language::En);
    }
}
