use thiserror::Error;

#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("Malformed event: {0}")]
    MalformedEvent(#[from] serde_json::Error),

    #[error("Routing unavailable: {0}")]
    RoutingUnavailable(String),

    #[error("Failed to publish instruction: {0}")]
    PublishFailed(String),
}
