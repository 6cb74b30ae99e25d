use std::collections::HashMap;

/// The language that needs no translation table.
pub const DEFAULT_LANG: &str = "en-US";

/// Convert a language tag like `pt_BR` into the
/// locale format of the remote API (`pt-BR`).
pub fn locale_from_lang(lang: &str) -> String {
    lang.replace('_', "-")
}

/// Translated UI strings of a single language.
#[derive(Debug, Clone)]
pub struct Translations {
    lang: String,
    strings: HashMap<String, String>,
}

impl Translations {
    pub fn new(lang: impl Into<String>, strings: HashMap<String, String>) -> Self {
        Self {
            lang: lang.into(),
            strings,
        }
    }

    /// Translations that return every key unchanged.
    pub fn identity(lang: impl Into<String>) -> Self {
        Self::new(lang, HashMap::new())
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn locale(&self) -> String {
        locale_from_lang(&self.lang)
    }

    /// Missing or empty entries fall back to the key.
    pub fn translate<'a>(&'a self, key: &'a str) -> &'a str {
        self.strings
            .get(key)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(key)
    }
}

impl Default for Translations {
    fn default() -> Self {
        Self::identity(DEFAULT_LANG)
    }
}
