use anyhow::{anyhow, bail, Result};
use bird_finder_core::{
    entities::MapPoint,
    usecases::{SearchParams, SearchSettings, PARAM_PER_PAGE},
};
use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use url::Url;

mod raw;

const DEFAULT_CONFIG_FILE_NAME: &str = "bird-finder.toml";

const ENV_NAME_API_URL: &str = "BIRD_FINDER_API_URL";

#[derive(Debug)]
pub struct Config {
    pub app: App,
    pub inaturalist: Inaturalist,
    pub map: Map,
    pub location: Location,
}

impl Config {
    pub fn try_load_from_file_or_default<P: AsRef<Path>>(file_path: Option<P>) -> Result<Self> {
        let file_path: &Path = file_path.as_ref().map(|p| p.as_ref()).unwrap_or_else(|| {
            log::debug!("No configuration file specified. load {DEFAULT_CONFIG_FILE_NAME}");
            Path::new(DEFAULT_CONFIG_FILE_NAME)
        });

        let raw_config = match fs::read_to_string(file_path) {
            Ok(cfg_string) => toml::from_str(&cfg_string)?,
            Err(err) => match err.kind() {
                ErrorKind::NotFound => {
                    log::info!(
                        "{} not found => load default configuration.",
                        file_path.display()
                    );
                    raw::Config::embedded()?
                }
                _ => return Err(err.into()),
            },
        };
        let mut cfg = Self::try_from(raw_config)?;
        if let Ok(api_url) = env::var(ENV_NAME_API_URL) {
            log::debug!("Use API URL from {ENV_NAME_API_URL}");
            cfg.inaturalist.api_url = api_url;
        }
        Ok(cfg)
    }

    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            base_params: self.inaturalist.params.clone(),
            default_per_page: self.inaturalist.per_page,
            per_page_options: self.inaturalist.per_page_options.clone(),
            default_lang: self.app.default_lang.clone(),
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub default_lang: String,
    /// File system directory with the `{lang}.json` translation files.
    pub locales_dir: PathBuf,
    pub public_url: Url,
}

#[derive(Debug)]
pub struct Inaturalist {
    pub api_url: String,
    pub per_page_options: Vec<u32>,
    pub params: SearchParams,
    /// Default number of records per page.
    pub per_page: u32,
}

#[derive(Debug, Clone)]
pub struct Map {
    pub center: MapPoint,
    pub zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
}

#[derive(Debug)]
pub struct Location {
    pub default_buffer_km: f64,
}

impl TryFrom<raw::Config> for Config {
    type Error = anyhow::Error;
    fn try_from(from: raw::Config) -> Result<Self> {
        let raw::Config {
            app,
            inaturalist,
            map,
            location,
        } = from;

        // Missing sections are taken from the embedded defaults
        let defaults = raw::Config::embedded()?;

        let raw::App {
            default_lang,
            locales_dir,
            public_url,
        } = app
            .or(defaults.app)
            .ok_or_else(|| anyhow!("Missing app configuration"))?;
        let public_url = public_url.parse()?;
        let app = App {
            default_lang,
            locales_dir,
            public_url,
        };

        let raw::Inaturalist {
            api_url,
            per_page_options,
            params,
        } = inaturalist
            .or(defaults.inaturalist)
            .ok_or_else(|| anyhow!("Missing inaturalist configuration"))?;
        if per_page_options.is_empty() {
            bail!("No per-page options defined");
        }
        if per_page_options.contains(&0) {
            bail!("Per-page options must be positive");
        }
        let params = params
            .into_iter()
            .map(|(key, value)| -> Result<(String, String)> {
                let value = param_value(&key, value)?;
                Ok((key, value))
            })
            .collect::<Result<SearchParams>>()?;
        let per_page = params
            .get(PARAM_PER_PAGE)
            .ok_or_else(|| anyhow!("Missing '{PARAM_PER_PAGE}' in inaturalist params"))?
            .parse::<u32>()?;
        if per_page == 0 {
            bail!("'{PARAM_PER_PAGE}' must be positive");
        }
        let inaturalist = Inaturalist {
            api_url,
            per_page_options,
            params,
            per_page,
        };

        let raw::Map {
            lat_lng: [lat, lng],
            zoom,
            min_zoom,
            max_zoom,
        } = map
            .or(defaults.map)
            .ok_or_else(|| anyhow!("Missing map configuration"))?;
        let center = MapPoint::try_from_lat_lng_deg(lat, lng)?;
        if min_zoom > max_zoom || !(min_zoom..=max_zoom).contains(&zoom) {
            bail!("Invalid zoom levels: {min_zoom} <= {zoom} <= {max_zoom}");
        }
        let map = Map {
            center,
            zoom,
            min_zoom,
            max_zoom,
        };

        let raw::Location { default_buffer_km } = location
            .or(defaults.location)
            .ok_or_else(|| anyhow!("Missing location configuration"))?;
        if default_buffer_km.is_nan() || default_buffer_km <= 0.0 {
            bail!("The default buffer must be positive");
        }
        let location = Location { default_buffer_km };

        Ok(Self {
            app,
            inaturalist,
            map,
            location,
        })
    }
}

fn param_value(key: &str, value: toml::Value) -> Result<String> {
    let value = match value {
        toml::Value::String(s) => s,
        toml::Value::Integer(i) => i.to_string(),
        toml::Value::Float(f) => f.to_string(),
        toml::Value::Boolean(b) => b.to_string(),
        toml::Value::Array(values) => values
            .into_iter()
            .map(|v| param_value(key, v))
            .collect::<Result<Vec<_>>>()?
            .join(","),
        toml::Value::Datetime(_) | toml::Value::Table(_) => {
            bail!("Unsupported value of parameter '{key}'")
        }
    };
    Ok(value)
}
