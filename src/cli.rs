use std::{io, path::PathBuf};

use anyhow::{anyhow, bail, Context as _, Result};
use bird_finder_core::{
    entities::*,
    markers::PopupTransition,
    url_state::{UrlStateSync, PARAM_LANG},
    usecases::{SearchController, SearchRequest},
};
use bird_finder_gateways::InaturalistApi;
use clap::{Parser, Subcommand};
use url::Url;

use crate::{
    config::Config,
    console::{ConsoleHistory, ConsoleMap, ConsoleView},
    locales::load_translations,
};

type Controller = SearchController<ConsoleMap, ConsoleView<io::Stdout>, ConsoleHistory>;

#[derive(Debug, Parser)]
#[command(version, about = "Search bird observations by name and area")]
struct Cli {
    /// Configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search observations and print the results
    Search(SearchArgs),
}

#[derive(Debug, clap::Args)]
struct SearchArgs {
    /// Restore the state of a shared URL
    #[arg(long)]
    url: Option<Url>,

    /// Search term (species name)
    #[arg(long, short)]
    term: Option<String>,

    /// Rectangle given by its corners
    #[arg(
        long,
        value_name = "SW_LAT,SW_LNG,NE_LAT,NE_LNG",
        value_parser = parse_rect,
        allow_hyphen_values = true,
        group = "area"
    )]
    rect: Option<DrawnShape>,

    /// Circle given by its center and radius in meters
    #[arg(
        long,
        value_name = "LAT,LNG,RADIUS_M",
        value_parser = parse_circle,
        allow_hyphen_values = true,
        group = "area"
    )]
    circle: Option<DrawnShape>,

    /// Polygon given by its vertices
    #[arg(
        long,
        value_name = "LAT,LNG;LAT,LNG;...",
        value_parser = parse_polygon,
        allow_hyphen_values = true,
        group = "area"
    )]
    polygon: Option<DrawnShape>,

    /// Search around your position
    #[arg(
        long,
        value_name = "LAT,LNG",
        value_parser = parse_point,
        allow_hyphen_values = true,
        group = "area"
    )]
    locate: Option<MapPoint>,

    /// Buffer around your position in kilometers
    #[arg(long, value_name = "KM", requires = "locate")]
    buffer_km: Option<f64>,

    #[arg(long)]
    page: Option<u32>,

    #[arg(long)]
    per_page: Option<u32>,

    /// Language of the results (e.g. pt-BR)
    #[arg(long)]
    lang: Option<String>,

    /// Open the popup of a record
    #[arg(long, value_name = "ID")]
    select: Option<String>,
}

impl SearchArgs {
    fn shape(&self) -> Option<DrawnShape> {
        self.rect
            .as_ref()
            .or(self.circle.as_ref())
            .or(self.polygon.as_ref())
            .cloned()
    }
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();
    let cfg = Config::try_load_from_file_or_default(args.config.as_ref())?;
    match args.command {
        Command::Search(args) => search(cfg, args).await,
    }
}

async fn search(cfg: Config, args: SearchArgs) -> Result<()> {
    let api = InaturalistApi::new(cfg.inaturalist.api_url.clone());
    let mut controller = controller(&cfg, &args);

    let mut request = controller.restore_from_url();
    if let Some(per_page) = args.per_page {
        request = controller.set_per_page(per_page)?.or(request);
    }
    if let Some(term) = &args.term {
        request = controller.submit_term(term).or(request);
    }
    if let Some(shape) = args.shape() {
        request = controller.shape_drawn(shape).or(request);
    }
    if let Some(pos) = args.locate {
        let buffer_km = args.buffer_km.unwrap_or(cfg.location.default_buffer_km);
        if buffer_km.is_nan() || buffer_km <= 0.0 {
            bail!("The buffer must be positive");
        }
        request = controller.location_found(pos, buffer_km).or(request);
    }
    let Some(request) = request else {
        println!("{}", controller.url_state().url());
        return Ok(());
    };
    execute(&mut controller, &api, request).await?;

    if let Some(page) = args.page {
        match controller.go_to_page(page) {
            Some(request) => execute(&mut controller, &api, request).await?,
            None => log::warn!("Page {page} is not available"),
        }
    }
    if let Some(id) = args.select.map(Id::from) {
        if let PopupTransition::Opening { id, reveal_after } = controller.toggle_popup(&id)? {
            tokio::time::sleep(reveal_after).await;
            controller.reveal_popup(&id);
        }
    }
    log_map_state(&controller);
    println!("{}", controller.url_state().url());
    Ok(())
}

fn log_map_state(controller: &Controller) {
    let map = controller.markers().map();
    log::info!(
        "Map centered at {} (zoom level {}) with {} markers",
        map.center(),
        map.zoom(),
        map.markers().len()
    );
    if let Some(area) = map.search_area() {
        log::debug!("Search area: {}", area.kind());
    }
    if let Some(pos) = map.user_location() {
        log::debug!("User location: {pos}");
    }
    if let Some(id) = map.opened_popup() {
        log::debug!("Open popup: {id}");
    }
    log::debug!(
        "{} history entries",
        controller.url_state().history().entries().len()
    );
}

fn controller(cfg: &Config, args: &SearchArgs) -> Controller {
    let url = args
        .url
        .clone()
        .unwrap_or_else(|| cfg.app.public_url.clone());
    let mut url_state = UrlStateSync::new(url, ConsoleHistory::default());
    if let Some(lang) = &args.lang {
        url_state.set_or_update(PARAM_LANG, lang);
    }
    let lang = url_state.read_or_default(PARAM_LANG, cfg.app.default_lang.clone());
    let translations = load_translations(&cfg.app.locales_dir, &lang);
    let view = ConsoleView::new(io::stdout(), translations);
    let map = ConsoleMap::new(cfg.map.clone());
    SearchController::new(cfg.search_settings(), map, view, url_state)
}

async fn execute(
    controller: &mut Controller,
    api: &InaturalistApi,
    request: SearchRequest,
) -> Result<()> {
    let outcome = controller
        .execute(api, request)
        .await
        .context("Search failed")?;
    log::debug!("Search finished: {outcome:?}");
    Ok(())
}

fn parse_numbers<const N: usize>(s: &str) -> Result<[f64; N]> {
    let numbers = s
        .split(',')
        .map(|n| n.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()?;
    numbers
        .try_into()
        .map_err(|_| anyhow!("Expected {N} comma separated numbers"))
}

fn parse_point(s: &str) -> Result<MapPoint> {
    let [lat, lng] = parse_numbers(s)?;
    Ok(MapPoint::try_from_lat_lng_deg(lat, lng)?)
}

fn parse_rect(s: &str) -> Result<DrawnShape> {
    let [sw_lat, sw_lng, ne_lat, ne_lng] = parse_numbers(s)?;
    let sw = MapPoint::try_from_lat_lng_deg(sw_lat, sw_lng)?;
    let ne = MapPoint::try_from_lat_lng_deg(ne_lat, ne_lng)?;
    Ok(DrawnShape::Rectangle { corners: [sw, ne] })
}

fn parse_circle(s: &str) -> Result<DrawnShape> {
    let [lat, lng, radius_meters] = parse_numbers(s)?;
    if radius_meters.is_nan() || radius_meters <= 0.0 {
        bail!("The radius must be positive");
    }
    let center = MapPoint::try_from_lat_lng_deg(lat, lng)?;
    Ok(DrawnShape::Circle {
        center,
        radius_meters,
    })
}

fn parse_polygon(s: &str) -> Result<DrawnShape> {
    let vertices = s
        .split(';')
        .filter(|v| !v.trim().is_empty())
        .map(parse_point)
        .collect::<Result<Vec<_>>>()?;
    if vertices.len() < 3 {
        bail!("A polygon needs at least 3 vertices");
    }
    Ok(DrawnShape::Polygon { vertices })
}
