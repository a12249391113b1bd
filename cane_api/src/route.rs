use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use cane_navigation::{coordinate::Coordinate, device_instruction::DeviceInstruction};
use serde::Deserialize;
use tracing::warn;

use crate::{error::ApiError, state::AppState};

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct RouteQuery {
    from_lat: Option<f64>,
    from_lon: Option<f64>,
    to_lat: Option<f64>,
    to_lon: Option<f64>,

    /// `lat,lon` pairs separated by `;`
    via: Option<String>,
}

struct Itinerary {
    from: Coordinate,
    via: Vec<Coordinate>,
    to: Coordinate,
}

impl TryFrom<RouteQuery> for Itinerary {
    type Error = ApiError;

    fn try_from(query: RouteQuery) -> Result<Self, Self::Error> {
        let (Some(from_lat), Some(from_lon), Some(to_lat), Some(to_lon)) =
            (query.from_lat, query.from_lon, query.to_lat, query.to_lon)
        else {
            let missing: Vec<&str> = [
                ("fromLat", query.from_lat),
                ("fromLon", query.from_lon),
                ("toLat", query.to_lat),
                ("toLon", query.to_lon),
            ]
            .into_iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| name)
            .collect();

            return Err(ApiError::BadRequest(format!(
                "Missing required coordinates: {}",
                missing.join(", ")
            )));
        };

        let via = match &query.via {
            Some(via) => parse_via(via)?,
            None => vec![],
        };

        Ok(Itinerary {
            from: Coordinate::new(from_lat, from_lon),
            via,
            to: Coordinate::new(to_lat, to_lon),
        })
    }
}

fn parse_via(via: &str) -> Result<Vec<Coordinate>, ApiError> {
    via.split(';')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (lat, lon) = pair
                .split_once(',')
                .ok_or_else(|| ApiError::BadRequest(format!("Invalid via point '{pair}'")))?;

            match (lat.trim().parse(), lon.trim().parse()) {
                (Ok(lat), Ok(lon)) => Ok(Coordinate::new(lat, lon)),
                _ => Err(ApiError::BadRequest(format!("Invalid via point '{pair}'"))),
            }
        })
        .collect()
}

/// Instructions for an explicit itinerary, independent of the live destination.
pub async fn route_handler(
    State(state): State<Arc<AppState>>,
    query: Result<Query<RouteQuery>, QueryRejection>,
) -> Result<Json<Vec<DeviceInstruction>>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let itinerary = Itinerary::try_from(query)?;

    let instructions = state
        .navigation
        .query(itinerary.from, &itinerary.via, itinerary.to)
        .await
        .inspect_err(|err| warn!("Route query failed: {}", err))?;

    Ok(Json(instructions))
}
