use std::time::Duration;

use anyhow::{Context, anyhow};
use cane_graphhopper::graphhopper_api::GraphHopperRouteClientParams;
use tracing::Level;

const DEFAULT_MQTT_BROKER: &str = "mqtt://mosquitto:1883";
const DEFAULT_MQTT_PORT: u16 = 1883;
const DEFAULT_GH_URL: &str = "http://graphhopper:8989/route";
const DEFAULT_GH_TIMEOUT_MS: u64 = 5000;
const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MqttTopics {
    pub location: String,
    pub destination: String,
    pub instructions: String,
}

#[derive(Debug, Clone)]
pub struct MqttConfig {
    pub host: String,
    pub port: u16,
    pub credentials: Option<MqttCredentials>,
    pub client_id: String,
    pub topics: MqttTopics,
}

#[derive(Clone, PartialEq, Eq)]
pub struct MqttCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for MqttCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MqttCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub mqtt: MqttConfig,
    pub graphhopper: GraphHopperRouteClientParams,
    pub http_addr: String,
    pub log_level: Level,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let broker = parse_broker_url(&var("MQTT_BROKER", DEFAULT_MQTT_BROKER))?;

        let timeout_ms: u64 = match lookup("GH_TIMEOUT_MS") {
            Some(value) => value.parse().with_context(|| {
                format!("GH_TIMEOUT_MS must be a number of milliseconds, got {value}")
            })?,
            None => DEFAULT_GH_TIMEOUT_MS,
        };

        let log_level = var("LOG_LEVEL", "info");
        let log_level: Level = log_level
            .parse()
            .map_err(|_| anyhow!("Invalid LOG_LEVEL {log_level}"))?;

        Ok(Config {
            mqtt: MqttConfig {
                host: broker.host,
                port: broker.port,
                credentials: broker.credentials,
                client_id: var("MQTT_CLIENT_ID", "cane-navigation"),
                topics: MqttTopics {
                    location: var("TOPIC_LOCATION", "cane/location"),
                    destination: var("TOPIC_DESTINATION", "guardian/destination"),
                    instructions: var("TOPIC_INSTRUCTIONS", "cane/instructions"),
                },
            },
            graphhopper: GraphHopperRouteClientParams {
                route_url: var("GH_URL", DEFAULT_GH_URL),
                timeout: Duration::from_millis(timeout_ms),
                ..Default::default()
            },
            http_addr: var("HTTP_ADDR", DEFAULT_HTTP_ADDR),
            log_level,
        })
    }
}

#[derive(Debug, PartialEq, Eq)]
struct BrokerAddress {
    host: String,
    port: u16,
    credentials: Option<MqttCredentials>,
}

/// Parses `mqtt://[user[:password]@]host[:port]`. IPv6 hosts are written in brackets,
/// `mqtt://[::1]:1883`. Error messages never echo the credentials.
fn parse_broker_url(url: &str) -> anyhow::Result<BrokerAddress> {
    let address = url
        .strip_prefix("mqtt://")
        .or_else(|| url.strip_prefix("tcp://"))
        .unwrap_or(url)
        .trim_end_matches('/');

    let (credentials, address) = match address.rsplit_once('@') {
        Some((userinfo, address)) => {
            let (username, password) = userinfo.split_once(':').unwrap_or((userinfo, ""));
            if username.is_empty() {
                return Err(anyhow!("Missing username in MQTT_BROKER credentials"));
            }

            let credentials = MqttCredentials {
                username: username.to_string(),
                password: password.to_string(),
            };
            (Some(credentials), address)
        }
        None => (None, address),
    };

    let (host, port) = match address.strip_prefix('[') {
        Some(bracketed) => {
            let (host, rest) = bracketed
                .split_once(']')
                .ok_or_else(|| anyhow!("Unclosed IPv6 address in MQTT_BROKER {address}"))?;
            let port = match rest {
                "" => None,
                rest => Some(rest.strip_prefix(':').ok_or_else(|| {
                    anyhow!("Unexpected characters after IPv6 address in MQTT_BROKER {address}")
                })?),
            };
            (host, port)
        }
        None => match address.rsplit_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (address, None),
        },
    };

    let port = match port {
        Some(port) => port
            .parse()
            .with_context(|| format!("Invalid port in MQTT_BROKER {address}"))?,
        None => DEFAULT_MQTT_PORT,
    };

    if host.is_empty() {
        return Err(anyhow!("Missing host in MQTT_BROKER {address}"));
    }

    Ok(BrokerAddress {
        host: host.to_string(),
        port,
        credentials,
    })
}
