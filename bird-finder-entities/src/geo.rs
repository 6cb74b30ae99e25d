use std::fmt;

use thiserror::Error;

/// Mean radius of the earth in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordRangeError {
    #[error("latitude {0} is out of range")]
    Latitude(f64),
    #[error("longitude {0} is out of range")]
    Longitude(f64),
}

/// Latitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct LatCoord(f64);

impl LatCoord {
    pub const fn min() -> Self {
        Self(-90.0)
    }

    pub const fn max() -> Self {
        Self(90.0)
    }

    pub const fn from_deg(deg: f64) -> Self {
        Self(deg)
    }

    pub fn try_from_deg(deg: f64) -> Result<Self, CoordRangeError> {
        let coord = Self(deg);
        if coord.is_valid() {
            Ok(coord)
        } else {
            Err(CoordRangeError::Latitude(deg))
        }
    }

    pub const fn to_deg(self) -> f64 {
        self.0
    }

    pub fn is_valid(self) -> bool {
        self.0.is_finite() && Self::min().0 <= self.0 && self.0 <= Self::max().0
    }

    #[must_use]
    pub fn clamp(self) -> Self {
        Self(self.0.clamp(Self::min().0, Self::max().0))
    }
}

/// Longitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct LngCoord(f64);

impl LngCoord {
    pub const fn min() -> Self {
        Self(-180.0)
    }

    pub const fn max() -> Self {
        Self(180.0)
    }

    pub const fn from_deg(deg: f64) -> Self {
        Self(deg)
    }

    pub fn try_from_deg(deg: f64) -> Result<Self, CoordRangeError> {
        let coord = Self(deg);
        if coord.is_valid() {
            Ok(coord)
        } else {
            Err(CoordRangeError::Longitude(deg))
        }
    }

    pub const fn to_deg(self) -> f64 {
        self.0
    }

    pub fn is_valid(self) -> bool {
        self.0.is_finite() && Self::min().0 <= self.0 && self.0 <= Self::max().0
    }

    #[must_use]
    pub fn clamp(self) -> Self {
        Self(self.0.clamp(Self::min().0, Self::max().0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MapPoint {
    lat: LatCoord,
    lng: LngCoord,
}

impl MapPoint {
    pub const fn new(lat: LatCoord, lng: LngCoord) -> Self {
        Self { lat, lng }
    }

    pub const fn from_lat_lng_deg(lat: f64, lng: f64) -> Self {
        Self::new(LatCoord::from_deg(lat), LngCoord::from_deg(lng))
    }

    pub fn try_from_lat_lng_deg(lat: f64, lng: f64) -> Result<Self, CoordRangeError> {
        Ok(Self::new(
            LatCoord::try_from_deg(lat)?,
            LngCoord::try_from_deg(lng)?,
        ))
    }

    pub const fn lat(self) -> LatCoord {
        self.lat
    }

    pub const fn lng(self) -> LngCoord {
        self.lng
    }

    pub fn is_valid(self) -> bool {
        self.lat.is_valid() && self.lng.is_valid()
    }

    /// Great-circle distance in meters (haversine formula).
    pub fn distance(self, other: Self) -> f64 {
        let lat1 = self.lat.to_deg().to_radians();
        let lat2 = other.lat.to_deg().to_radians();
        let dlat = (other.lat.to_deg() - self.lat.to_deg()).to_radians();
        let dlng = (other.lng.to_deg() - self.lng.to_deg()).to_radians();

        let a = (dlat / 2.0).sin() * (dlat / 2.0).sin()
            + lat1.cos() * lat2.cos() * (dlng / 2.0).sin() * (dlng / 2.0).sin();
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_METERS * c
    }
}

impl fmt::Display for MapPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.lat.to_deg(), self.lng.to_deg())
    }
}

/// Axis-aligned bounding box.
///
/// Longitude wrap-around at the antimeridian is not handled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapBbox {
    sw: MapPoint,
    ne: MapPoint,
}

impl MapBbox {
    pub const fn new(sw: MapPoint, ne: MapPoint) -> Self {
        Self { sw, ne }
    }

    /// A degenerated box that contains a single point.
    pub const fn around_point(pos: MapPoint) -> Self {
        Self::new(pos, pos)
    }

    /// The smallest box that contains all points or `None`
    /// if there are no points at all.
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = MapPoint>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let bbox = points.fold(Self::around_point(first), |bbox, p| bbox.extend_to(p));
        Some(bbox)
    }

    #[must_use]
    pub fn extend_to(self, pos: MapPoint) -> Self {
        let Self { sw, ne } = self;
        let sw = MapPoint::from_lat_lng_deg(
            sw.lat().to_deg().min(pos.lat().to_deg()),
            sw.lng().to_deg().min(pos.lng().to_deg()),
        );
        let ne = MapPoint::from_lat_lng_deg(
            ne.lat().to_deg().max(pos.lat().to_deg()),
            ne.lng().to_deg().max(pos.lng().to_deg()),
        );
        Self { sw, ne }
    }

    pub const fn southwest(&self) -> MapPoint {
        self.sw
    }

    pub const fn northeast(&self) -> MapPoint {
        self.ne
    }

    pub fn center(&self) -> MapPoint {
        MapPoint::from_lat_lng_deg(
            (self.sw.lat().to_deg() + self.ne.lat().to_deg()) / 2.0,
            (self.sw.lng().to_deg() + self.ne.lng().to_deg()) / 2.0,
        )
    }

    pub fn is_valid(&self) -> bool {
        self.sw.is_valid() && self.ne.is_valid() && self.sw.lat() <= self.ne.lat()
    }

    pub fn contains_point(&self, pos: MapPoint) -> bool {
        let lat = pos.lat().to_deg();
        let lng = pos.lng().to_deg();
        self.sw.lat().to_deg() <= lat
            && lat <= self.ne.lat().to_deg()
            && self.sw.lng().to_deg() <= lng
            && lng <= self.ne.lng().to_deg()
    }
}

impl fmt::Display for MapBbox {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.sw, self.ne)
    }
}
