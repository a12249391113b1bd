use std::future::Future;

use cane_graphhopper::{graphhopper_api::GraphHopperRouteClient, route_response::TurnInstruction};

use crate::{coordinate::Coordinate, error::NavigationError};

/// Source of turn-by-turn geometry for an ordered list of waypoints.
///
/// An empty answer means the provider found no usable path. Provider failures of any kind
/// (timeouts, transport errors, error statuses) are reported as
/// [`NavigationError::RoutingUnavailable`] and left to the caller to log. Calls are never retried.
pub trait RouteProvider: Send + Sync {
    fn fetch_route(
        &self,
        waypoints: &[Coordinate],
    ) -> impl Future<Output = Result<Vec<TurnInstruction>, NavigationError>> + Send;
}

impl RouteProvider for GraphHopperRouteClient {
    async fn fetch_route(
        &self,
        waypoints: &[Coordinate],
    ) -> Result<Vec<TurnInstruction>, NavigationError> {
        GraphHopperRouteClient::fetch_route(self, waypoints)
            .await
            .map_err(|error| NavigationError::RoutingUnavailable(error.to_string()))
    }
}
