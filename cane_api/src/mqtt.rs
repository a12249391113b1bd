use std::{sync::Arc, time::Duration};

use cane_navigation::{
    device_instruction::DeviceInstruction, dispatcher::StepPublisher, error::NavigationError,
};
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, Publish, QoS};
use tracing::{debug, error, info, warn};

use crate::{
    config::{MqttConfig, MqttTopics},
    state::AppState,
};

const KEEP_ALIVE: Duration = Duration::from_secs(30);
const RECONNECT_DELAY: Duration = Duration::from_secs(1);
const REQUEST_CHANNEL_CAPACITY: usize = 64;

pub fn connect(config: &MqttConfig) -> (AsyncClient, EventLoop) {
    let mut options = MqttOptions::new(&config.client_id, &config.host, config.port);
    options.set_keep_alive(KEEP_ALIVE);
    if let Some(credentials) = &config.credentials {
        options.set_credentials(&credentials.username, &credentials.password);
    }

    AsyncClient::new(options, REQUEST_CHANNEL_CAPACITY)
}

/// Publishes the next step to the cane.
#[derive(Clone)]
pub struct MqttStepPublisher {
    client: AsyncClient,
    topic: String,
}

impl MqttStepPublisher {
    pub fn new(client: AsyncClient, topic: String) -> Self {
        Self { client, topic }
    }
}

impl StepPublisher for MqttStepPublisher {
    async fn publish_step(&self, instruction: &DeviceInstruction) -> Result<(), NavigationError> {
        let payload = serde_json::to_vec(instruction)
            .map_err(|err| NavigationError::PublishFailed(err.to_string()))?;

        self.client
            .publish(&self.topic, QoS::AtLeastOnce, false, payload)
            .await
            .map_err(|err| NavigationError::PublishFailed(err.to_string()))
    }
}

/// Drives the MQTT connection and feeds inbound events to the navigation service. Never
/// returns; connection errors are logged and the broker is polled again after a short delay.
pub async fn run_ingress(
    client: AsyncClient,
    mut eventloop: EventLoop,
    state: Arc<AppState>,
    topics: MqttTopics,
) {
    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                info!("Connected to MQTT broker");
                // Subscriptions are not persisted by the broker for clean sessions.
                for topic in [&topics.location, &topics.destination] {
                    if let Err(err) = client.try_subscribe(topic, QoS::AtLeastOnce) {
                        error!("Failed to subscribe to {}: {}", topic, err);
                    }
                }
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                route_message(&state, &topics, publish);
            }
            Ok(_) => {}
            Err(err) => {
                error!("MQTT connection error: {}", err);
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }
}

/// Destination updates are applied in arrival order. Every location update is handled on its own
/// task so a slow routing call does not hold back the event loop.
fn route_message(state: &Arc<AppState>, topics: &MqttTopics, publish: Publish) {
    if publish.topic == topics.destination {
        if let Err(err) = state.navigation.handle_destination_event(&publish.payload) {
            warn!("Dropping destination event: {}", err);
        }
    } else if publish.topic == topics.location {
        let state = Arc::clone(state);
        tokio::spawn(async move {
            match state.navigation.handle_location_event(&publish.payload).await {
                Ok(outcome) => debug!("Location handled: {:?}", outcome),
                Err(err) => warn!("Skipping location update: {}", err),
            }
        });
    } else {
        debug!("Ignoring message on {}", publish.topic);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use cane_navigation::{
        coordinate::{Coordinate, Destination},
        dispatcher::BroadcastMessage,
    };
    use futures_util::StreamExt;
    use tracing::Level;

    use crate::test_utils::{
        CapturedLogs, app_state, serve_app, serve_graphhopper, serve_silent, wait_until,
    };

    use super::*;

    fn topics() -> MqttTopics {
        MqttTopics {
            location: String::from("cane/location"),
            destination: String::from("guardian/destination"),
            instructions: String::from("cane/instructions"),
        }
    }

    fn publish(topic: &str, payload: &str) -> Publish {
        Publish::new(topic, QoS::AtLeastOnce, payload)
    }

    #[tokio::test]
    async fn test_destination_message() {
        let (state, _eventloop) = app_state(String::from("http://127.0.0.1:1/route"));

        route_message(
            &state,
            &topics(),
            publish(
                "guardian/destination",
                r#"{ "location": { "lat": 1, "lon": 2 }, "via": [{ "lat": 1.1, "lon": 2.1 }] }"#,
            ),
        );

        let destination = state.navigation.pipeline().state().current().unwrap();
        assert_eq!(
            *destination,
            Destination::new(Coordinate::new(1.0, 2.0), vec![Coordinate::new(1.1, 2.1)])
        );
    }

    #[tokio::test]
    async fn test_malformed_and_unknown_messages() {
        let (state, _eventloop) = app_state(String::from("http://127.0.0.1:1/route"));

        route_message(&state, &topics(), publish("guardian/destination", "{ nope"));
        route_message(
            &state,
            &topics(),
            publish("somewhere/else", r#"{ "lat": 1, "lon": 2 }"#),
        );

        assert!(!state.navigation.pipeline().state().has_destination());
    }

    #[tokio::test]
    async fn test_location_message_reaches_websocket() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (state, _eventloop) = app_state(serve_graphhopper(Arc::clone(&calls)).await);
        let addr = serve_app(Arc::clone(&state)).await;

        let (mut socket, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws"))
            .await
            .unwrap();
        wait_until(|| state.broadcast_hub.listener_count() == 1).await;

        route_message(
            &state,
            &topics(),
            publish("guardian/destination", r#"{ "lat": 14.657, "lon": 121.045 }"#),
        );
        route_message(
            &state,
            &topics(),
            publish("cane/location", r#"{ "lat": 14.656, "lon": 121.041 }"#),
        );

        let frame = tokio::time::timeout(Duration::from_secs(5), socket.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        let text = frame.to_text().unwrap();

        let raw: serde_json::Value = serde_json::from_str(text).unwrap();
        assert_eq!(raw["type"], "navigation");
        assert_eq!(raw["rawLocation"], serde_json::json!({ "lat": 14.656, "lon": 121.041 }));

        let message: BroadcastMessage = serde_json::from_str(text).unwrap();
        let BroadcastMessage::Navigation { instructions, .. } = message;
        assert_eq!(instructions.len(), 2);
        assert_eq!(instructions[0].text, "Turn left");
        assert_eq!(instructions[0].steps, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        socket.close(None).await.unwrap();
        wait_until(|| state.broadcast_hub.listener_count() == 0).await;
    }

    #[tokio::test]
    async fn test_location_routing_failure_is_logged_once() {
        let logs = CapturedLogs::default();
        let _guard = logs.capture(Level::WARN);
        let (state, _eventloop) = app_state(serve_silent().await);

        route_message(
            &state,
            &topics(),
            publish("guardian/destination", r#"{ "lat": 1, "lon": 2 }"#),
        );
        route_message(
            &state,
            &topics(),
            publish("cane/location", r#"{ "lat": 1.5, "lon": 2.5 }"#),
        );

        wait_until(|| logs.contents().contains("Skipping location update")).await;
        assert_eq!(logs.contents().matches("timed out").count(), 1);
    }
}
