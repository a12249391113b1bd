pub mod graphhopper_api;
pub mod route_response;
