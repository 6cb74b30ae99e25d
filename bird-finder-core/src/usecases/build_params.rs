use std::{collections::BTreeMap, fmt};

use crate::entities::MapBbox;

pub const PARAM_Q: &str = "q";
pub const PARAM_PAGE: &str = "page";
pub const PARAM_PER_PAGE: &str = "per_page";
pub const PARAM_LOCALE: &str = "locale";
pub const PARAM_NE_LAT: &str = "nelat";
pub const PARAM_NE_LNG: &str = "nelng";
pub const PARAM_SW_LAT: &str = "swlat";
pub const PARAM_SW_LNG: &str = "swlng";

const BBOX_PARAMS: [&str; 4] = [PARAM_NE_LAT, PARAM_NE_LNG, PARAM_SW_LAT, PARAM_SW_LNG];

/// Everything that constrains a single search request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub term: Option<String>,
    pub bbox: Option<MapBbox>,
    pub page: u32,
    pub per_page: u32,
    pub locale: String,
}

impl SearchQuery {
    /// The search term unless it is blank.
    pub fn term(&self) -> Option<&str> {
        self.term.as_deref().filter(|t| !t.trim().is_empty())
    }

    /// An unconstrained query must never be sent.
    pub fn is_eligible(&self) -> bool {
        self.term().is_some() || self.bbox.is_some()
    }
}

/// Query parameters of the remote observation search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams(BTreeMap<String, String>);

impl SearchParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) {
        self.0.insert(key.into(), value.to_string());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for SearchParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl fmt::Display for SearchParams {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{k}={v}")?;
        }
        Ok(())
    }
}

/// Derive the request parameters of a query.
///
/// Term and bounding box are either set or removed, so nothing
/// of a previous query can leak through `base_params`.
pub fn build_params(query: &SearchQuery, base_params: &SearchParams) -> SearchParams {
    let mut params = base_params.clone();
    params.insert(PARAM_PAGE, query.page);
    params.insert(PARAM_PER_PAGE, query.per_page);
    params.insert(PARAM_LOCALE, &query.locale);
    match query.term() {
        Some(term) => params.insert(PARAM_Q, term),
        None => {
            params.remove(PARAM_Q);
        }
    }
    match &query.bbox {
        Some(bbox) => {
            params.insert(PARAM_NE_LAT, bbox.northeast().lat().to_deg());
            params.insert(PARAM_NE_LNG, bbox.northeast().lng().to_deg());
            params.insert(PARAM_SW_LAT, bbox.southwest().lat().to_deg());
            params.insert(PARAM_SW_LNG, bbox.southwest().lng().to_deg());
        }
        None => {
            for key in BBOX_PARAMS {
                params.remove(key);
            }
        }
    }
    params
}
