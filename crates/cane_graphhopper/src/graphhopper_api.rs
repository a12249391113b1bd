use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::route_response::{GraphHopperRouteResponse, TurnInstruction};

#[derive(Debug, Error)]
pub enum GraphHopperError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Routing request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("A route needs at least two points, got {0}")]
    NotEnoughPoints(usize),
}

#[derive(Debug, Clone)]
pub struct GraphHopperRouteClientParams {
    pub route_url: String,
    pub timeout: Duration,
    /// GraphHopper profile name, `foot` for pedestrian routing
    pub profile: String,
    pub locale: String,
}

pub const GRAPHHOPPER_ROUTE_URL: &str = "http://graphhopper:8989/route";
pub const DEFAULT_ROUTE_TIMEOUT: Duration = Duration::from_secs(5);
pub const FOOT_PROFILE: &str = "foot";

impl Default for GraphHopperRouteClientParams {
    fn default() -> Self {
        Self {
            route_url: GRAPHHOPPER_ROUTE_URL.to_string(),
            timeout: DEFAULT_ROUTE_TIMEOUT,
            profile: String::from(FOOT_PROFILE),
            locale: String::from("en"),
        }
    }
}

pub struct GraphHopperRouteClient {
    params: GraphHopperRouteClientParams,
    client: reqwest::Client,
}

impl GraphHopperRouteClient {
    pub fn new(params: GraphHopperRouteClientParams) -> Result<Self, GraphHopperError> {
        let client = reqwest::Client::builder().timeout(params.timeout).build()?;

        Ok(Self { params, client })
    }

    /// Requests a route passing through `points` in order and returns the instructions of the
    /// best path. An empty vector means GraphHopper answered but found no usable path.
    pub async fn fetch_route<P>(
        &self,
        points: &[P],
    ) -> Result<Vec<TurnInstruction>, GraphHopperError>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        if points.len() < 2 {
            return Err(GraphHopperError::NotEnoughPoints(points.len()));
        }

        let mut query: Vec<(&str, String)> = points
            .iter()
            .map(|p| {
                let point: geo_types::Point = p.into();
                ("point", format!("{},{}", point.y(), point.x()))
            })
            .collect();

        query.push(("profile", self.params.profile.clone()));
        query.push(("locale", self.params.locale.clone()));
        query.push(("calc_points", String::from("true")));
        query.push(("points_encoded", String::from("false")));

        debug!("GraphHopperApi: Requesting route through {} points", points.len());

        let response = self
            .client
            .get(&self.params.route_url)
            .query(&query)
            .send()
            .await
            .map_err(|error| self.request_error(error))?;

        let route = self.handle_response(response).await?;

        Ok(route.into_first_instructions())
    }

    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> Result<GraphHopperRouteResponse, GraphHopperError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| self.request_error(error))?;

        if status.is_success() {
            Ok(serde_json::from_str(&body)?)
        } else {
            Err(GraphHopperError::Api {
                status: status.as_u16(),
                message: body,
            })
        }
    }

    fn request_error(&self, error: reqwest::Error) -> GraphHopperError {
        if error.is_timeout() {
            GraphHopperError::Timeout(self.params.timeout)
        } else {
            GraphHopperError::Request(error)
        }
    }
}
