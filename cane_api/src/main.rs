mod config;
mod error;
mod mqtt;
mod route;
mod routes;
mod state;
mod ws;

#[cfg(test)]
mod test_utils;

use std::sync::Arc;

use axum::serve;
use cane_graphhopper::graphhopper_api::GraphHopperRouteClient;
use mimalloc::MiMalloc;
use tracing::info;

use crate::config::Config;
use crate::mqtt::MqttStepPublisher;
use crate::routes::app_routes;
use crate::state::AppState;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::from_filename("./.env.local").ok();
    let config = Config::from_env()?;
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    let route_client = GraphHopperRouteClient::new(config.graphhopper.clone())?;
    let (mqtt_client, eventloop) = mqtt::connect(&config.mqtt);
    let publisher =
        MqttStepPublisher::new(mqtt_client.clone(), config.mqtt.topics.instructions.clone());

    let state = Arc::new(AppState::new(route_client, publisher));

    info!(
        "Connecting to MQTT broker {}:{}",
        config.mqtt.host, config.mqtt.port
    );
    tokio::spawn(mqtt::run_ingress(
        mqtt_client,
        eventloop,
        Arc::clone(&state),
        config.mqtt.topics.clone(),
    ));

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    info!("Listening on {}", config.http_addr);

    serve(listener, app_routes(state)).await?;

    Ok(())
}
