use std::f64::consts::FRAC_PI_2;

use crate::entities::*;

/// The canonical bounding box of a drawn shape.
///
/// Returns `None` only for a polygon without any vertices.
pub fn derive_bbox(shape: &DrawnShape) -> Option<MapBbox> {
    match shape {
        DrawnShape::Circle {
            center,
            radius_meters,
        } => Some(circumscribe_circle(*center, *radius_meters)),
        DrawnShape::Polygon { vertices } => MapBbox::enclosing(vertices.iter().copied()),
        DrawnShape::Rectangle { corners } => MapBbox::enclosing(corners.iter().copied()),
    }
}

/// The smallest box that contains all points on the sphere
/// within `radius_meters` around `center`.
pub fn circumscribe_circle(center: MapPoint, radius_meters: f64) -> MapBbox {
    let angular_radius = radius_meters.max(0.0) / EARTH_RADIUS_METERS;
    let lat = center.lat().to_deg().to_radians();
    let lng = center.lng().to_deg();
    let south = lat - angular_radius;
    let north = lat + angular_radius;
    let (south, north, west, east) = if -FRAC_PI_2 < south && north < FRAC_PI_2 {
        let delta_lng = (angular_radius.sin() / lat.cos()).asin().to_degrees();
        (south, north, lng - delta_lng, lng + delta_lng)
    } else {
        // one of the poles is covered by the circle
        (
            south.max(-FRAC_PI_2),
            north.min(FRAC_PI_2),
            LngCoord::min().to_deg(),
            LngCoord::max().to_deg(),
        )
    };
    let bbox = MapBbox::new(
        MapPoint::new(
            LatCoord::from_deg(south.to_degrees()).clamp(),
            LngCoord::from_deg(west).clamp(),
        ),
        MapPoint::new(
            LatCoord::from_deg(north.to_degrees()).clamp(),
            LngCoord::from_deg(east).clamp(),
        ),
    );
    debug_assert!(bbox.is_valid());
    bbox
}
