use std::{fmt::Display, str::FromStr};

use url::Url;

use crate::gateways::HistoryGateway;

pub const PARAM_TERM: &str = "q";
pub const PARAM_PAGE: &str = "page";
pub const PARAM_PER_PAGE: &str = "per_page";
pub const PARAM_LANG: &str = "lang";

/// Mirrors parts of the search state in the query
/// string of the current document URL.
///
/// Every modification pushes a new history entry.
#[derive(Debug)]
pub struct UrlStateSync<H> {
    url: Url,
    history: H,
}

impl<H> UrlStateSync<H>
where
    H: HistoryGateway,
{
    pub fn new(url: Url, history: H) -> Self {
        Self { url, history }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn contains(&self, key: &str) -> bool {
        self.url.query_pairs().any(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    /// Parse the value of `key` or return `default` if it is
    /// missing or can't be parsed.
    pub fn read_or_default<T>(&self, key: &str, default: T) -> T
    where
        T: FromStr,
    {
        let Some(value) = self.get(key) else {
            return default;
        };
        match value.parse() {
            Ok(v) => v,
            Err(_) => {
                log::warn!("Ignoring invalid URL parameter {key}={value}");
                default
            }
        }
    }

    pub fn set_or_update(&mut self, key: &str, value: impl Display) {
        let value = value.to_string();
        let mut pairs = self.other_pairs(key);
        let pos = self
            .url
            .query_pairs()
            .position(|(k, _)| k == key)
            .unwrap_or(pairs.len());
        pairs.insert(pos, (key.to_string(), value));
        self.replace_query(&pairs);
        self.history.push_state(&self.url);
    }

    /// Returns `true` if the parameter has been removed.
    pub fn remove_if_present(&mut self, key: &str) -> bool {
        if !self.contains(key) {
            return false;
        }
        let pairs = self.other_pairs(key);
        self.replace_query(&pairs);
        self.history.push_state(&self.url);
        true
    }

    fn other_pairs(&self, key: &str) -> Vec<(String, String)> {
        self.url
            .query_pairs()
            .filter(|(k, _)| k != key)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    fn replace_query(&mut self, pairs: &[(String, String)]) {
        if pairs.is_empty() {
            self.url.set_query(None);
            return;
        }
        self.url
            .query_pairs_mut()
            .clear()
            .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::tests::fakes::FakeHistory;

    fn url_state(url: &str) -> UrlStateSync<FakeHistory> {
        UrlStateSync::new(url.parse().unwrap(), FakeHistory::default())
    }

    #[test]
    fn read_values_or_defaults() {
        let state = url_state("https://birds.example/?q=owl&page=3&per_page=abc");
        assert_eq!(state.get(PARAM_TERM).as_deref(), Some("owl"));
        assert_eq!(state.read_or_default(PARAM_PAGE, 1_u32), 3);
        assert_eq!(state.read_or_default(PARAM_PER_PAGE, 30_u32), 30);
        assert_eq!(state.read_or_default(PARAM_LANG, "en-US".to_string()), "en-US");
        assert!(state.contains(PARAM_TERM));
        assert!(!state.contains(PARAM_LANG));
    }

    #[test]
    fn set_or_update_keeps_parameter_order() {
        let mut state = url_state("https://birds.example/?lang=pt-BR&page=1#map");
        state.set_or_update(PARAM_PAGE, 2);
        assert_eq!(state.url().as_str(), "https://birds.example/?lang=pt-BR&page=2#map");
        state.set_or_update(PARAM_TERM, "Sicalis flaveola");
        assert_eq!(
            state.url().as_str(),
            "https://birds.example/?lang=pt-BR&page=2&q=Sicalis+flaveola#map"
        );
        assert_eq!(state.get(PARAM_TERM).as_deref(), Some("Sicalis flaveola"));
        assert_eq!(state.history().pushed.len(), 2);
    }

    #[test]
    fn always_push_on_update() {
        let mut state = url_state("https://birds.example/?page=2");
        state.set_or_update(PARAM_PAGE, 2);
        assert_eq!(state.history().pushed.len(), 1);
    }

    #[test]
    fn remove_only_if_present() {
        let mut state = url_state("https://birds.example/?q=owl&page=2");
        assert!(!state.remove_if_present(PARAM_PER_PAGE));
        assert!(state.history().pushed.is_empty());
        assert!(state.remove_if_present(PARAM_TERM));
        assert_eq!(state.url().as_str(), "https://birds.example/?page=2");
        assert!(state.remove_if_present(PARAM_PAGE));
        assert_eq!(state.url().as_str(), "https://birds.example/");
        assert_eq!(state.history().pushed.len(), 2);
    }
}
