//! HTTP client for the AI sheet service.
//!
//! Blocking reqwest client (no async runtime required). Covers the full
//! page flow: workspace lookup → upload → preview → AI commands → formatting.

pub mod client;
pub mod identity;
pub mod models;

pub use client::{ApiClient, ApiError, DEFAULT_SHEET};
pub use identity::{load_or_create_identity, Identity};
pub use models::{
    AiReply, ExcelInstruction, FormatOptions, InstructionCell, ServiceStatus, SheetFile,
    StoredFile, Workspace,
};
