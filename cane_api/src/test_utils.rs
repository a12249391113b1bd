use std::{
    io,
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{Json, Router, routing::get};
use cane_graphhopper::graphhopper_api::{GraphHopperRouteClient, GraphHopperRouteClientParams};
use rumqttc::{AsyncClient, EventLoop, MqttOptions};
use tracing::{Level, subscriber::DefaultGuard};

use crate::{mqtt::MqttStepPublisher, routes::app_routes, state::AppState};

/// Fake GraphHopper answering every request with a left turn followed by 3m straight on.
pub async fn serve_graphhopper(calls: Arc<AtomicUsize>) -> String {
    let router = Router::new().route(
        "/route",
        get(move || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Json(serde_json::json!({
                    "paths": [{
                        "instructions": [
                            { "sign": -2, "text": "Turn left", "distance": 1.5, "time": 500 },
                            { "sign": 0, "text": "Continue", "distance": 3.0, "time": 1000 }
                        ]
                    }]
                }))
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{addr}/route")
}

/// Accepts connections and never answers.
pub async fn serve_silent() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut sockets = vec![];
        while let Ok((socket, _)) = listener.accept().await {
            sockets.push(socket);
        }
    });

    format!("http://{addr}/route")
}

/// State wired to a GraphHopper at `route_url` and an MQTT client that never connects. Hold on to
/// the returned event loop so step publishes are queued instead of failing.
pub fn app_state(route_url: String) -> (Arc<AppState>, EventLoop) {
    let (client, eventloop) = AsyncClient::new(MqttOptions::new("test", "localhost", 1883), 10);
    let route_client = GraphHopperRouteClient::new(GraphHopperRouteClientParams {
        route_url,
        timeout: Duration::from_millis(300),
        ..Default::default()
    })
    .unwrap();

    let state = Arc::new(AppState::new(
        route_client,
        MqttStepPublisher::new(client, String::from("cane/instructions")),
    ));

    (state, eventloop)
}

/// Serves the full router on an ephemeral port.
pub async fn serve_app(state: Arc<AppState>) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app_routes(state)).await.unwrap();
    });

    addr
}

pub async fn wait_until(condition: impl Fn() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

/// Log lines written while the guard returned by [`CapturedLogs::capture`] is alive. Scoped to the
/// current thread, which covers everything spawned on a current-thread test runtime.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn capture(&self, level: Level) -> DefaultGuard {
        let logs = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_ansi(false)
            .with_writer(move || logs.clone())
            .finish();

        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
