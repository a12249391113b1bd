use serde::{Deserialize, Serialize};

/// WGS-84 position in degrees.
#[derive(Deserialize, Serialize, Debug, Copy, Clone, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<&Coordinate> for geo_types::Point<f64> {
    fn from(coordinate: &Coordinate) -> Self {
        geo_types::Point::new(coordinate.lon, coordinate.lat)
    }
}

/// Navigation target: the final location plus the via-points to pass through first, in order.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Destination {
    location: Coordinate,
    via: Vec<Coordinate>,
}

impl Destination {
    pub fn new(location: Coordinate, via: Vec<Coordinate>) -> Self {
        Self { location, via }
    }

    pub fn location(&self) -> Coordinate {
        self.location
    }

    pub fn via(&self) -> &[Coordinate] {
        &self.via
    }

    /// Waypoints of a route starting at `origin`: origin, via-points, then the destination.
    pub fn waypoints_from(&self, origin: Coordinate) -> Vec<Coordinate> {
        let mut waypoints = Vec::with_capacity(self.via.len() + 2);
        waypoints.push(origin);
        waypoints.extend_from_slice(&self.via);
        waypoints.push(self.location);
        waypoints
    }
}
