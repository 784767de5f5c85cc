//! Live update channel state machine.
//!
//! One connection at a time. No automatic reconnect: a transport error or
//! close drops the channel to Disconnected and reconnection is an explicit
//! user action. Sends while disconnected are dropped, not queued.

use rand::Rng;
use serde_json::Value;

use gridlink_protocol::{CellChange, ClientMessage, ServerMessage};

use crate::transport::{Transport, WsTransport};

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Disconnected,
    Connected,
}

/// What a received frame (or transport transition) means to the owner.
#[derive(Debug, Clone, PartialEq)]
pub enum LiveEvent {
    /// AI push message for the feed
    AiMessage(String),
    /// Full grid replacement
    GridReplace(Vec<Vec<Value>>),
    /// Server system notice
    System(String),
    /// Payload that was not JSON, or a kind outside the union — surfaced raw
    Raw(String),
    /// Transport closed or failed; the channel is now Disconnected
    Closed { reason: Option<String> },
}

/// Errors surfaced to the channel owner.
#[derive(Debug)]
pub enum ChannelError {
    Connect(String),
    Send(String),
}

impl std::fmt::Display for ChannelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelError::Connect(msg) => write!(f, "connect failed: {}", msg),
            ChannelError::Send(msg) => write!(f, "send failed: {}", msg),
        }
    }
}

impl std::error::Error for ChannelError {}

/// Client side of the live update connection.
pub struct LiveChannel {
    ws_base: String,
    state: ChannelState,
    client_id: Option<String>,
    transport: Option<Box<dyn Transport>>,
}

impl LiveChannel {
    /// `ws_base` is the websocket origin, e.g. `ws://127.0.0.1:8080`.
    pub fn new(ws_base: impl Into<String>) -> Self {
        Self {
            ws_base: ws_base.into().trim_end_matches('/').to_string(),
            state: ChannelState::Disconnected,
            client_id: None,
            transport: None,
        }
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ChannelState::Connected
    }

    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    /// Dial the live endpoint. No-op while already connected.
    /// Returns true when a new connection was established.
    pub fn connect(&mut self) -> Result<bool, ChannelError> {
        if self.is_connected() {
            return Ok(false);
        }
        let client_id = new_client_id();
        let url = format!("{}/websocket/{}", self.ws_base, client_id);
        let transport =
            WsTransport::dial(&url).map_err(|e| ChannelError::Connect(e.to_string()))?;
        self.attach(Box::new(transport), client_id);
        Ok(true)
    }

    /// Adopt an already-open transport: the tail of `connect()`, and the
    /// seam tests use to simulate an open. Any previous transport is closed
    /// first so at most one connection exists.
    pub fn attach(&mut self, transport: Box<dyn Transport>, client_id: String) {
        self.disconnect();
        self.transport = Some(transport);
        self.client_id = Some(client_id);
        self.state = ChannelState::Connected;
    }

    /// Close the transport and drop to Disconnected. Idempotent.
    pub fn disconnect(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            transport.close();
        }
        self.client_id = None;
        self.state = ChannelState::Disconnected;
    }

    /// Broadcast local edits. Silently dropped while disconnected — the
    /// page never queued offline edits and neither does this.
    /// Returns true when a message actually went out.
    pub fn send_changes(&mut self, changes: &[CellChange]) -> Result<bool, ChannelError> {
        let Some(transport) = self.transport.as_mut() else {
            log::debug!("dropping {} change(s): channel disconnected", changes.len());
            return Ok(false);
        };

        let message = ClientMessage::DataChange {
            changes: changes.to_vec(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        let json =
            serde_json::to_string(&message).map_err(|e| ChannelError::Send(e.to_string()))?;

        match transport.send_text(&json) {
            Ok(()) => Ok(true),
            Err(e) => {
                self.disconnect();
                Err(ChannelError::Send(e.to_string()))
            }
        }
    }

    /// Block for the next inbound event. None while disconnected.
    /// A close or error event leaves the channel Disconnected.
    pub fn next_event(&mut self) -> Option<LiveEvent> {
        let transport = self.transport.as_mut()?;
        match transport.recv_text() {
            Ok(Some(text)) => Some(classify_frame(&text)),
            Ok(None) => {
                self.disconnect();
                Some(LiveEvent::Closed { reason: None })
            }
            Err(e) => {
                self.disconnect();
                Some(LiveEvent::Closed {
                    reason: Some(e.to_string()),
                })
            }
        }
    }
}

impl Drop for LiveChannel {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Decode one inbound frame. Invalid JSON and kinds outside the union
/// surface the raw payload instead of failing hard.
fn classify_frame(text: &str) -> LiveEvent {
    if serde_json::from_str::<Value>(text).is_err() {
        return LiveEvent::Raw(text.to_string());
    }
    match serde_json::from_str::<ServerMessage>(text) {
        Ok(ServerMessage::AiResponse { message }) => LiveEvent::AiMessage(message),
        Ok(ServerMessage::ExcelUpdate { data }) => LiveEvent::GridReplace(data),
        Ok(ServerMessage::SystemMessage { message }) => LiveEvent::System(message),
        Err(_) => LiveEvent::Raw(text.to_string()),
    }
}

/// `client_<unix-millis>_<9 base-36 chars>` — the id shape the service has
/// always seen from the web client.
fn new_client_id() -> String {
    const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let millis = chrono::Utc::now().timestamp_millis();
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("client_{}_{}", millis, suffix)
}
