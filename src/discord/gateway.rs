//! Discord Gateway Client
//!
//! Maintains the long-lived gateway websocket: hello/identify handshake,
//! heartbeating with ACK tracking, and dispatch of ready/message events to
//! the main loop. Reconnects with jittered exponential backoff; each
//! reconnect re-identifies (no session resume).

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, Interval};
use tokio_tungstenite::{connect_async, tungstenite::Message as TungsteniteMessage};
use tracing::{debug, error, info, warn};

use super::types::{
    GatewayEvent, GatewayFrame, HelloData, MessageCreate, ReadyData, BOT_INTENTS, OP_DISPATCH,
    OP_HEARTBEAT, OP_HEARTBEAT_ACK, OP_HELLO, OP_INVALID_SESSION, OP_RECONNECT,
};

const GATEWAY_BASE_BACKOFF_SECS: u64 = 1;
const GATEWAY_MAX_BACKOFF_SECS: u64 = 60;
const GATEWAY_BACKOFF_JITTER_RATIO: f64 = 0.20;

fn backoff_with_jitter_secs(attempt: u32) -> u64 {
    let capped_attempt = attempt.min(16);
    let base = GATEWAY_BASE_BACKOFF_SECS.saturating_mul(1u64 << capped_attempt);
    let bounded = base.min(GATEWAY_MAX_BACKOFF_SECS).max(1);

    let micros = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_micros() as f64;
    let unit = (micros % 1_000.0) / 1_000.0;
    let jitter = 1.0 + ((unit * 2.0) - 1.0) * GATEWAY_BACKOFF_JITTER_RATIO;
    ((bounded as f64) * jitter)
        .round()
        .clamp(1.0, GATEWAY_MAX_BACKOFF_SECS as f64) as u64
}

/// Why a single gateway session ended
enum SessionEnd {
    /// Server asked for a reconnect, the socket dropped, or an ACK went missing
    Reconnect,
    /// Shutdown was requested
    Shutdown,
}

/// Gateway websocket client
pub struct GatewayClient {
    url: String,
    token: String,
    event_tx: mpsc::Sender<GatewayEvent>,
    shutdown_rx: mpsc::Receiver<()>,
}

impl GatewayClient {
    pub fn new(
        url: &str,
        token: &str,
        event_tx: mpsc::Sender<GatewayEvent>,
        shutdown_rx: mpsc::Receiver<()>,
    ) -> Self {
        Self {
            url: url.to_string(),
            token: token.to_string(),
            event_tx,
            shutdown_rx,
        }
    }

    /// Run the connection with automatic reconnect. Returns only when
    /// shutdown is requested.
    pub async fn run(mut self) {
        let mut attempt: u32 = 0;

        loop {
            match self.run_session().await {
                Ok(SessionEnd::Shutdown) => {
                    info!("Gateway client shut down");
                    return;
                }
                Ok(SessionEnd::Reconnect) => {
                    attempt = 0;
                }
                Err(e) => {
                    error!("Gateway session failed: {e:#}");
                    attempt = attempt.saturating_add(1);
                }
            }

            let _ = self.event_tx.send(GatewayEvent::Disconnected).await;

            let delay = backoff_with_jitter_secs(attempt);
            info!("Reconnecting to gateway in {delay}s");
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(delay)) => {}
                _ = self.shutdown_rx.recv() => {
                    info!("Gateway client shut down");
                    return;
                }
            }
        }
    }

    /// One connect-identify-stream session.
    async fn run_session(&mut self) -> Result<SessionEnd> {
        info!("Connecting to Discord gateway: {}", self.url);

        let (ws_stream, _) = connect_async(&self.url)
            .await
            .context("Failed to connect to Discord gateway")?;

        let (mut write, mut read) = ws_stream.split();

        // Armed once the server's hello arrives
        let mut heartbeat: Option<Interval> = None;
        let mut last_seq: Option<u64> = None;
        let mut awaiting_ack = false;

        loop {
            tokio::select! {
                msg = read.next() => {
                    match msg {
                        Some(Ok(TungsteniteMessage::Text(text))) => {
                            let frame: GatewayFrame = match serde_json::from_str(&text) {
                                Ok(frame) => frame,
                                Err(e) => {
                                    warn!("Unparseable gateway frame: {e}");
                                    continue;
                                }
                            };

                            if let Some(seq) = frame.s {
                                last_seq = Some(seq);
                            }

                            match frame.op {
                                OP_HELLO => {
                                    let hello: HelloData = serde_json::from_value(frame.d)
                                        .context("Malformed hello payload")?;
                                    let period = Duration::from_millis(hello.heartbeat_interval);
                                    heartbeat = Some(interval_at(Instant::now() + period, period));

                                    let identify = serde_json::json!({
                                        "op": 2,
                                        "d": {
                                            "token": self.token,
                                            "intents": BOT_INTENTS,
                                            "properties": {
                                                "os": std::env::consts::OS,
                                                "browser": "fruitbot",
                                                "device": "fruitbot",
                                            },
                                        },
                                    });
                                    write
                                        .send(TungsteniteMessage::Text(identify.to_string()))
                                        .await
                                        .context("Failed to send identify")?;

                                    let _ = self.event_tx.send(GatewayEvent::Connected).await;
                                }
                                OP_DISPATCH => {
                                    self.handle_dispatch(frame.t.as_deref(), frame.d).await;
                                }
                                OP_HEARTBEAT => {
                                    // Server-requested heartbeat, answer immediately
                                    let beat = heartbeat_frame(last_seq);
                                    let _ = write.send(TungsteniteMessage::Text(beat)).await;
                                }
                                OP_HEARTBEAT_ACK => {
                                    awaiting_ack = false;
                                }
                                OP_RECONNECT => {
                                    info!("Gateway requested reconnect");
                                    return Ok(SessionEnd::Reconnect);
                                }
                                OP_INVALID_SESSION => {
                                    warn!("Gateway invalidated the session");
                                    return Ok(SessionEnd::Reconnect);
                                }
                                other => {
                                    debug!("Unhandled gateway opcode: {other}");
                                }
                            }
                        }
                        Some(Ok(TungsteniteMessage::Ping(data))) => {
                            let _ = write.send(TungsteniteMessage::Pong(data)).await;
                        }
                        Some(Ok(TungsteniteMessage::Close(frame))) => {
                            info!("Gateway closed the connection: {frame:?}");
                            return Ok(SessionEnd::Reconnect);
                        }
                        Some(Err(e)) => {
                            error!("Gateway websocket error: {e}");
                            return Ok(SessionEnd::Reconnect);
                        }
                        None => {
                            info!("Gateway stream ended");
                            return Ok(SessionEnd::Reconnect);
                        }
                        _ => {}
                    }
                }

                _ = next_tick(&mut heartbeat) => {
                    if awaiting_ack {
                        warn!("Heartbeat ACK missing, forcing reconnect");
                        return Ok(SessionEnd::Reconnect);
                    }
                    write
                        .send(TungsteniteMessage::Text(heartbeat_frame(last_seq)))
                        .await
                        .context("Failed to send heartbeat")?;
                    awaiting_ack = true;
                }

                _ = self.shutdown_rx.recv() => {
                    info!("Shutting down gateway client");
                    let _ = write.send(TungsteniteMessage::Close(None)).await;
                    return Ok(SessionEnd::Shutdown);
                }
            }
        }
    }

    /// Route a dispatch event to the main loop.
    async fn handle_dispatch(&self, event: Option<&str>, data: serde_json::Value) {
        match event {
            Some("READY") => match serde_json::from_value::<ReadyData>(data) {
                Ok(ready) => {
                    info!("Logged in as {}", ready.user.username);
                    let _ = self.event_tx.send(GatewayEvent::Ready(ready)).await;
                }
                Err(e) => warn!("Malformed READY payload: {e}"),
            },
            Some("MESSAGE_CREATE") => match serde_json::from_value::<MessageCreate>(data) {
                Ok(message) => {
                    let _ = self.event_tx.send(GatewayEvent::Message(message)).await;
                }
                Err(e) => warn!("Malformed MESSAGE_CREATE payload: {e}"),
            },
            Some(other) => {
                debug!("Ignoring dispatch event: {other}");
            }
            None => {
                debug!("Dispatch frame without an event name");
            }
        }
    }
}

fn heartbeat_frame(last_seq: Option<u64>) -> String {
    serde_json::json!({ "op": 1, "d": last_seq }).to_string()
}

/// Tick the heartbeat once armed; pend forever until the hello arrives.
async fn next_tick(heartbeat: &mut Option<Interval>) {
    match heartbeat.as_mut() {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
