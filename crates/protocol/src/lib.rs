//! Gridlink Live Update Protocol — v1 Frozen Wire Format
//!
//! Canonical message types for the websocket leg of the sheet service.
//! Frames are JSON text over `/websocket/{clientId}`; the tag field is
//! `"type"` on both directions.
//!
//! The wire format is **frozen**: the deployed service already speaks it.
//! Fix the types, never the golden strings in the tests below.
//!
//! Kinds outside this union do occur on the wire (the service emits
//! `connected` and `error` notices, among others). Receivers surface those
//! frames raw instead of failing, so new server-side kinds degrade safely.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Server → Client
// =============================================================================

/// Messages pushed by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// AI reply routed over the live channel
    AiResponse { message: String },
    /// Full replacement of the grid contents
    ExcelUpdate { data: Vec<Vec<Value>> },
    /// Free-text server notice
    SystemMessage { message: String },
}

// =============================================================================
// Client → Server
// =============================================================================

/// Messages sent by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Local cell edits, one message per edit batch.
    /// `timestamp` is RFC 3339 UTC at send time.
    DataChange {
        changes: Vec<CellChange>,
        timestamp: String,
    },
}

/// A single cell edit. `before` is None when the cell did not exist;
/// both sides serialize as null when absent so the frame shape is stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellChange {
    pub row: usize,
    pub col: usize,
    #[serde(default)]
    pub before: Option<Value>,
    #[serde(default)]
    pub after: Option<Value>,
}
