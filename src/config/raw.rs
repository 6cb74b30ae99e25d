use serde::Deserialize;
use std::path::PathBuf;

const DEFAULT_CONFIG_FILE: &str = include_str!("bird-finder.default.toml");

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub app: Option<App>,
    pub inaturalist: Option<Inaturalist>,
    pub map: Option<Map>,
    pub location: Option<Location>,
}

impl Config {
    /// The configuration that is compiled into the binary.
    pub fn embedded() -> Result<Self, toml::de::Error> {
        toml::from_str(DEFAULT_CONFIG_FILE)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct App {
    pub default_lang: String,
    pub locales_dir: PathBuf,
    pub public_url: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Inaturalist {
    pub api_url: String,
    pub per_page_options: Vec<u32>,
    pub params: toml::Table,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Map {
    pub lat_lng: [f64; 2],
    pub zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Location {
    pub default_buffer_km: f64,
}
