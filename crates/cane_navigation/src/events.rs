use serde::Deserialize;

use crate::{
    coordinate::{Coordinate, Destination},
    error::NavigationError,
};

/// Destination update payload. Guardians may send either a bare coordinate or a location with
/// via-points.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum DestinationEvent {
    WithVia {
        location: Coordinate,
        #[serde(default)]
        via: Vec<Coordinate>,
    },
    Location(Coordinate),
}

impl From<DestinationEvent> for Destination {
    fn from(event: DestinationEvent) -> Self {
        match event {
            DestinationEvent::WithVia { location, via } => Destination::new(location, via),
            DestinationEvent::Location(location) => Destination::new(location, vec![]),
        }
    }
}

pub fn parse_destination_event(payload: &[u8]) -> Result<Destination, NavigationError> {
    let event: DestinationEvent = serde_json::from_slice(payload)?;
    Ok(event.into())
}

pub fn parse_location_event(payload: &[u8]) -> Result<Coordinate, NavigationError> {
    Ok(serde_json::from_slice(payload)?)
}
