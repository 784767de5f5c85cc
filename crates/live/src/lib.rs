//! Live update channel over the service's websocket endpoint.
//!
//! One connection per process, manual reconnect only. The channel owns its
//! `Connected`/`Disconnected` state; everything else consumes `LiveEvent`s.

pub mod channel;
pub mod transport;

pub use channel::{ChannelError, ChannelState, LiveChannel, LiveEvent};
pub use transport::{Transport, TransportError, WsTransport};
