use std::f64::consts::PI;

use bird_finder_core::{entities::*, gateways::MapGateway};

use crate::config;

const TILE_SIZE_PX: f64 = 256.0;
const VIEWPORT_WIDTH_PX: f64 = 1024.0;
const VIEWPORT_HEIGHT_PX: f64 = 768.0;

/// Markers closer than this are merged into a cluster.
const CLUSTER_RADIUS_PX: f64 = 80.0;

/// Ground resolution at the equator for zoom level 0.
const METERS_PER_PIXEL_AT_ZOOM_0: f64 = 156_543.033_92;

/// A map without a screen that simulates viewport and
/// marker clustering of a web mercator map.
#[derive(Debug)]
pub struct ConsoleMap {
    cfg: config::Map,
    center: MapPoint,
    zoom: u8,
    markers: Vec<(Id, MapPoint)>,
    search_area: Option<DrawnShape>,
    user_location: Option<MapPoint>,
    open_popup: Option<Id>,
}

impl ConsoleMap {
    pub fn new(cfg: config::Map) -> Self {
        Self {
            center: cfg.center,
            zoom: cfg.zoom,
            cfg,
            markers: vec![],
            search_area: None,
            user_location: None,
            open_popup: None,
        }
    }

    pub fn center(&self) -> MapPoint {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn markers(&self) -> &[(Id, MapPoint)] {
        &self.markers
    }

    pub fn search_area(&self) -> Option<&DrawnShape> {
        self.search_area.as_ref()
    }

    pub fn user_location(&self) -> Option<MapPoint> {
        self.user_location
    }

    pub fn opened_popup(&self) -> Option<&Id> {
        self.open_popup.as_ref()
    }

    fn marker_pos(&self, id: &Id) -> Option<MapPoint> {
        self.markers
            .iter()
            .find(|(marker_id, _)| marker_id == id)
            .map(|(_, pos)| *pos)
    }

    fn zoom_to_fit(&self, bbox: &MapBbox) -> u8 {
        let sw = bbox.southwest();
        let ne = bbox.northeast();
        let lng_fraction = (ne.lng().to_deg() - sw.lng().to_deg()) / 360.0;
        let lat_fraction = (mercator_y(ne.lat()) - mercator_y(sw.lat())) / (2.0 * PI);
        let zoom_x = (VIEWPORT_WIDTH_PX / TILE_SIZE_PX / lng_fraction).log2();
        let zoom_y = (VIEWPORT_HEIGHT_PX / TILE_SIZE_PX / lat_fraction).log2();
        let zoom = zoom_x.min(zoom_y).floor();
        if !zoom.is_finite() {
            return self.cfg.max_zoom;
        }
        zoom.clamp(f64::from(self.cfg.min_zoom), f64::from(self.cfg.max_zoom)) as u8
    }

    fn cluster_radius_meters(&self, lat: LatCoord) -> f64 {
        let meters_per_px = METERS_PER_PIXEL_AT_ZOOM_0 * lat.to_deg().to_radians().cos()
            / 2_f64.powi(i32::from(self.zoom));
        CLUSTER_RADIUS_PX * meters_per_px
    }
}

fn mercator_y(lat: LatCoord) -> f64 {
    // the projection is undefined at the poles
    let lat = lat.to_deg().clamp(-85.051_128, 85.051_128).to_radians();
    (PI / 4.0 + lat / 2.0).tan().ln()
}

impl MapGateway for ConsoleMap {
    fn add_marker(&mut self, id: &Id, pos: MapPoint) {
        self.markers.push((id.clone(), pos));
    }

    fn clear_markers(&mut self) {
        self.open_popup = None;
        self.markers.clear();
    }

    fn markers_bounds(&self) -> Option<MapBbox> {
        MapBbox::enclosing(self.markers.iter().map(|(_, pos)| *pos))
    }

    fn fit_bounds(&mut self, bbox: &MapBbox) {
        self.center = bbox.center();
        self.zoom = self.zoom_to_fit(bbox);
        log::debug!("Show {bbox} at zoom level {}", self.zoom);
    }

    fn pan_to(&mut self, center: MapPoint) {
        self.center = center;
    }

    fn show_default_view(&mut self) {
        self.center = self.cfg.center;
        self.zoom = self.cfg.zoom;
        log::debug!("Show {} at zoom level {}", self.center, self.zoom);
    }

    fn is_in_collapsed_cluster(&self, id: &Id) -> bool {
        if self.zoom >= self.cfg.max_zoom {
            return false;
        }
        let Some(pos) = self.marker_pos(id) else {
            return false;
        };
        let radius = self.cluster_radius_meters(pos.lat());
        self.markers
            .iter()
            .any(|(other, other_pos)| other != id && pos.distance(*other_pos) < radius)
    }

    fn zoom_to_show_and_open_popup(&mut self, id: &Id) {
        let Some(pos) = self.marker_pos(id) else {
            log::warn!("No marker {id}");
            return;
        };
        self.center = pos;
        while self.is_in_collapsed_cluster(id) {
            self.zoom += 1;
        }
        log::debug!("Zoomed in to level {} to reveal marker {id}", self.zoom);
        self.open_popup(id);
    }

    fn open_popup(&mut self, id: &Id) {
        self.open_popup = Some(id.clone());
    }

    fn close_popup(&mut self, id: &Id) {
        if self.open_popup.as_ref() == Some(id) {
            self.open_popup = None;
        }
    }

    fn close_all_popups(&mut self) {
        self.open_popup = None;
    }

    fn show_search_area(&mut self, shape: &DrawnShape) {
        log::info!("Search area: {}", shape.kind());
        self.search_area = Some(shape.clone());
    }

    fn clear_search_area(&mut self) {
        self.search_area = None;
    }

    fn show_user_location(&mut self, pos: MapPoint) {
        log::info!("Your location: {pos}");
        self.user_location = Some(pos);
    }
}
