use crate::geo::MapPoint;

/// A region of interest drawn by the user.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawnShape {
    Circle {
        center: MapPoint,
        radius_meters: f64,
    },
    Polygon {
        vertices: Vec<MapPoint>,
    },
    Rectangle {
        corners: [MapPoint; 2],
    },
}

impl DrawnShape {
    /// A circle around a located position with a buffer given in kilometers.
    pub fn buffer_around(center: MapPoint, buffer_km: f64) -> Self {
        Self::Circle {
            center,
            radius_meters: buffer_km * 1000.0,
        }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Circle { .. } => "circle",
            Self::Polygon { .. } => "polygon",
            Self::Rectangle { .. } => "rectangle",
        }
    }
}
