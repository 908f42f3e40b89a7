//! MQTT transport adapter (rumqttc, blocking client).
//!
//! Outbound: implements [`TransportPort`] on top of [`rumqttc::Client`].
//! Publishes are QoS 1, never retained, and never block the control loop;
//! a full request queue surfaces as [`TransportError::QueueFull`].
//!
//! Inbound: [`spawn_inbound`] drives the [`Connection`] on its own thread.
//! It re-subscribes to the telemetry topic on every ConnAck (the broker may
//! have dropped the session) and copies matching payloads into the
//! [`InboundQueue`].  Connection errors are logged and retried after a
//! short back-off; rumqttc reconnects on the next poll.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, info, warn};
use rumqttc::{Client, ClientError, Connection, Event, MqttOptions, Packet, QoS};

use crate::app::ports::{TransportError, TransportPort};
use crate::channels::{InboundQueue, ShutdownToken};
use crate::config::BrokerConfig;

/// Outstanding requests the client may buffer.
const REQUEST_CAPACITY: usize = 16;

/// Pause after a connection error before polling again.
const RECONNECT_BACKOFF: Duration = Duration::from_secs(1);

/// Publishing half of the broker connection.
#[derive(Clone)]
pub struct MqttTransport {
    client: Client,
}

impl MqttTransport {
    /// Build the client.  Nothing touches the network until the returned
    /// [`Connection`] is polled.
    pub fn connect(broker: &BrokerConfig) -> (Self, Connection) {
        // rumqttc panics on a persistent session without a client id.
        let clean_session = broker.clean_session || broker.client_id.is_empty();
        if clean_session != broker.clean_session {
            warn!("MQTT: empty client id, falling back to a clean session");
        }

        let mut options = MqttOptions::new(&broker.client_id, &broker.host, broker.port);
        options
            .set_keep_alive(Duration::from_secs(broker.keep_alive_secs))
            .set_clean_session(clean_session);

        let (client, connection) = Client::new(options, REQUEST_CAPACITY);
        info!(
            "MQTT: client '{}' -> {}:{}",
            broker.client_id, broker.host, broker.port
        );
        (Self { client }, connection)
    }

    /// Handle for the inbound thread (subscriptions share the request queue).
    pub fn client(&self) -> Client {
        self.client.clone()
    }

    /// Ask the broker to close the session.  Ends the inbound thread.
    pub fn disconnect(&self) {
        if let Err(e) = self.client.try_disconnect() {
            warn!("MQTT: disconnect request failed: {}", e);
        }
    }
}

impl TransportPort for MqttTransport {
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError> {
        self.client
            .try_publish(topic, QoS::AtLeastOnce, false, payload.to_vec())
            .map_err(|e| match e {
                ClientError::TryRequest(_) => TransportError::QueueFull,
                ClientError::Request(_) => TransportError::NotConnected,
            })
    }
}

/// Start the receive thread.
///
/// The thread runs until shutdown is requested or the connection's event
/// stream ends, then requests shutdown itself so the control loop follows.
pub fn spawn_inbound(
    mut connection: Connection,
    client: Client,
    sensors_topic: String,
    inbound: &'static InboundQueue,
    shutdown: &'static ShutdownToken,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("mqtt-rx".into())
        .spawn(move || {
            for notification in connection.iter() {
                if shutdown.is_requested() {
                    break;
                }
                match notification {
                    Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                        info!("MQTT: connected ({:?})", ack.code);
                        if let Err(e) = client.try_subscribe(sensors_topic.as_str(), QoS::AtMostOnce) {
                            warn!("MQTT: subscribe to {} failed: {}", sensors_topic, e);
                        } else {
                            info!("MQTT: subscribed to {}", sensors_topic);
                        }
                    }
                    Ok(Event::Incoming(Packet::Publish(publish))) => {
                        if publish.topic != sensors_topic {
                            debug!("MQTT: ignoring message on {}", publish.topic);
                            continue;
                        }
                        if let Err(e) = inbound.push(&publish.payload) {
                            warn!("MQTT: frame dropped: {}", e);
                        }
                    }
                    Ok(Event::Incoming(Packet::Disconnect)) => {
                        info!("MQTT: broker closed the session");
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!("MQTT: connection error: {}, retrying in {:?}", e, RECONNECT_BACKOFF);
                        thread::sleep(RECONNECT_BACKOFF);
                    }
                }
            }
            info!("MQTT: receive thread exiting");
            shutdown.request();
        })
}
