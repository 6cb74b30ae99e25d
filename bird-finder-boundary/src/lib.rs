use serde::{Deserialize, Serialize};

#[cfg(feature = "entity-conversions")]
mod conv;

/// Response of `GET /observations`.
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct ObservationsResponse {
    pub total_results: u64,
    /// `0` if the API omits it.
    #[serde(default)]
    pub page: u32,
    /// `0` if the API omits it.
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub results: Vec<Observation>,
}

#[rustfmt::skip]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct Observation {
    pub id                 : u64,
    pub geojson            : Option<GeoJsonPoint>,
    pub taxon              : Option<Taxon>,
    pub species_guess      : Option<String>,
    #[serde(default)]
    pub observation_photos : Vec<ObservationPhoto>,
    #[serde(default)]
    pub observation_sounds : Vec<ObservationSound>,
    pub description        : Option<String>,
    pub place_guess        : Option<String>,
    pub user               : User,
    pub created_at         : Option<String>,
    pub uri                : Option<String>,
}

/// A GeoJSON point with `[lng, lat]` coordinates.
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct GeoJsonPoint {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<f64>,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct Taxon {
    pub name: String,
    pub preferred_common_name: Option<String>,
    pub english_common_name: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct ObservationPhoto {
    pub photo: Photo,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct Photo {
    pub url: String,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct ObservationSound {
    pub sound: Sound,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct Sound {
    pub file_url: String,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct User {
    pub id: u64,
    pub login: String,
    pub name: Option<String>,
    pub icon: Option<String>,
}

/// Error body returned by the remote API.
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, thiserror::Error))]
#[cfg_attr(feature = "extra-derive", error("{error}"))]
pub struct Error {
    #[serde(default)]
    pub status: Option<u16>,
    pub error: String,
}
