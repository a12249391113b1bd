use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cane_navigation::error::NavigationError;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    InternalServerError(String),
}

impl From<NavigationError> for ApiError {
    fn from(error: NavigationError) -> Self {
        match error {
            NavigationError::MalformedEvent(_) => ApiError::BadRequest(error.to_string()),
            NavigationError::RoutingUnavailable(_) | NavigationError::PublishFailed(_) => {
                ApiError::InternalServerError(error.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InternalServerError(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
            }
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
        }
    }
}
