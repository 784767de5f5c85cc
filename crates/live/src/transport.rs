//! Transport seam for the live channel.
//!
//! The channel state machine only needs text frames in and out; the seam
//! keeps it independent of the websocket stack and lets tests drive it
//! with scripted frames.

use std::net::TcpStream;

use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};

/// Errors from the transport layer.
#[derive(Debug)]
pub enum TransportError {
    /// Dial or handshake failure
    Connect(String),
    /// Send/receive failure on an established transport
    Io(String),
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::Connect(msg) => write!(f, "connect failed: {}", msg),
            TransportError::Io(msg) => write!(f, "transport error: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {}

/// A bidirectional text-frame transport.
pub trait Transport: Send {
    /// Send one text frame.
    fn send_text(&mut self, text: &str) -> Result<(), TransportError>;

    /// Block for the next text frame. `Ok(None)` means the peer closed
    /// cleanly; an error means the connection is unusable.
    fn recv_text(&mut self) -> Result<Option<String>, TransportError>;

    /// Close the transport. Idempotent; errors are ignored because the
    /// peer may already be gone.
    fn close(&mut self);
}

/// Websocket transport (tungstenite, blocking).
pub struct WsTransport {
    socket: WebSocket<MaybeTlsStream<TcpStream>>,
    closed: bool,
}

impl WsTransport {
    /// Dial a `ws://` endpoint and complete the handshake.
    pub fn dial(url: &str) -> Result<Self, TransportError> {
        let (socket, _response) =
            tungstenite::connect(url).map_err(|e| TransportError::Connect(e.to_string()))?;
        Ok(Self {
            socket,
            closed: false,
        })
    }
}

impl Transport for WsTransport {
    fn send_text(&mut self, text: &str) -> Result<(), TransportError> {
        self.socket
            .send(Message::text(text))
            .map_err(|e| TransportError::Io(e.to_string()))
    }

    fn recv_text(&mut self) -> Result<Option<String>, TransportError> {
        loop {
            match self.socket.read() {
                Ok(Message::Text(text)) => return Ok(Some(text.into())),
                Ok(Message::Close(_)) => return Ok(None),
                // tungstenite queues the pong reply itself on read
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => continue,
                Ok(Message::Binary(bytes)) => {
                    log::debug!("ignoring {}-byte binary frame", bytes.len());
                    continue;
                }
                Ok(Message::Frame(_)) => continue,
                Err(tungstenite::Error::ConnectionClosed)
                | Err(tungstenite::Error::AlreadyClosed) => return Ok(None),
                Err(e) => return Err(TransportError::Io(e.to_string())),
            }
        }
    }

    fn close(&mut self) {
        if !self.closed {
            let _ = self.socket.close(None);
            let _ = self.socket.flush();
            self.closed = true;
        }
    }
}
