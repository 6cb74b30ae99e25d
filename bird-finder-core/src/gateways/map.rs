use crate::entities::{DrawnShape, Id, MapBbox, MapPoint};

/// Access to the interactive map with its marker cluster layer.
///
/// Markers are tagged with the id of the record they represent.
pub trait MapGateway {
    fn add_marker(&mut self, id: &Id, pos: MapPoint);
    fn clear_markers(&mut self);
    /// The envelope of all markers or `None` if there are no markers.
    fn markers_bounds(&self) -> Option<MapBbox>;

    fn fit_bounds(&mut self, bbox: &MapBbox);
    fn pan_to(&mut self, center: MapPoint);
    fn show_default_view(&mut self);

    /// `true` if the marker is currently hidden inside a collapsed cluster.
    fn is_in_collapsed_cluster(&self, id: &Id) -> bool;
    /// Zoom in until the marker is no longer clustered, then open its popup.
    fn zoom_to_show_and_open_popup(&mut self, id: &Id);
    fn open_popup(&mut self, id: &Id);
    fn close_popup(&mut self, id: &Id);
    fn close_all_popups(&mut self);

    fn show_search_area(&mut self, shape: &DrawnShape);
    fn clear_search_area(&mut self);
    fn show_user_location(&mut self, pos: MapPoint);
}
