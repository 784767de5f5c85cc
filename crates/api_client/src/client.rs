//! Sheet service HTTP client.
//!
//! Every mutating endpoint takes the spreadsheet as a multipart upload —
//! the service is stateless about file contents, so the current file's
//! bytes ride along on preview, AI and format calls alike.
//!
//! Responses use the uniform `{success, data|error}` envelope. The envelope
//! is authoritative: a `success:false` body on a 4xx status is an
//! application-level failure carrying the server's error string verbatim,
//! not a transport error.

use std::time::Duration;

use reqwest::blocking::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use gridlink_core::CellRange;

use crate::models::{
    AiReply, ExcelInstruction, FormatOptions, ServiceStatus, SheetFile, StoredFile, Workspace,
};

/// Sheet service API client (blocking).
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::blocking::Client,
    api_base: String,
}

/// Error type for service operations.
#[derive(Debug)]
pub enum ApiError {
    /// Network error
    Network(String),
    /// HTTP error with status code and body
    Http(u16, String),
    /// JSON parsing error
    Parse(String),
    /// `success:false` envelope; carries the server's error string verbatim
    Service(String),
    /// Local file I/O error
    Io(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "Network error: {}", msg),
            ApiError::Http(code, msg) => write!(f, "HTTP {}: {}", code, msg),
            ApiError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ApiError::Service(msg) => write!(f, "{}", msg),
            ApiError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// The uniform response wrapper.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    data: Option<T>,
    #[serde(default)]
    error: Option<String>,
}

impl<T> Envelope<T> {
    fn into_result(self) -> Result<T, ApiError> {
        if self.success {
            self.data
                .ok_or_else(|| ApiError::Parse("missing data in successful envelope".into()))
        } else {
            Err(ApiError::Service(self.error.unwrap_or_else(|| {
                "unspecified server error".into()
            })))
        }
    }

    /// Success/error only, for endpoints whose envelope carries no data.
    fn ack(self) -> Result<(), ApiError> {
        if self.success {
            Ok(())
        } else {
            Err(ApiError::Service(self.error.unwrap_or_else(|| {
                "unspecified server error".into()
            })))
        }
    }
}

/// AI endpoint response — its own shape, not the uniform envelope.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AiEnvelope {
    success: bool,
    #[serde(default)]
    ai_response: Option<String>,
    #[serde(default)]
    excel_instruction: Option<ExcelInstruction>,
    #[serde(default)]
    error: Option<String>,
}

/// bulk-cell-format response — data rides in `formatData`, not `data`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BulkFormatEnvelope {
    success: bool,
    #[serde(default)]
    format_data: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Sheet name the page always targeted; the upstream UI has no sheet picker.
pub const DEFAULT_SHEET: &str = "Sheet1";

impl ApiClient {
    pub fn new(api_base: impl Into<String>) -> Self {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("gridlink/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// GET /api/status — whether the service has an AI key configured.
    pub fn status(&self) -> Result<ServiceStatus, ApiError> {
        let url = format!("{}/api/status", self.api_base);
        let response = self
            .http
            .get(&url)
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let body = response.text().unwrap_or_default();
            return Err(ApiError::Http(status, body));
        }
        response
            .json::<ServiceStatus>()
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// GET /api/files/workspaces/user/{userId}
    pub fn list_workspaces(&self, user_id: &str) -> Result<Vec<Workspace>, ApiError> {
        let url = format!("{}/api/files/workspaces/user/{}", self.api_base, user_id);
        self.get_envelope(&url)
    }

    /// POST /api/files/workspace/create
    pub fn create_workspace(
        &self,
        name: &str,
        user_id: &str,
        description: &str,
    ) -> Result<Workspace, ApiError> {
        let url = format!("{}/api/files/workspace/create", self.api_base);
        let body = serde_json::json!({
            "name": name,
            "userId": user_id,
            "description": description,
        });
        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode_envelope(response)
    }

    /// POST /api/files/workspace/{id}/upload?userId=...
    pub fn upload_file(
        &self,
        workspace_id: i64,
        user_id: &str,
        file: &SheetFile,
    ) -> Result<StoredFile, ApiError> {
        let url = format!(
            "{}/api/files/workspace/{}/upload",
            self.api_base, workspace_id
        );
        let form = Form::new().part("file", Self::file_part(file));
        let response = self
            .http
            .post(&url)
            .query(&[("userId", user_id)])
            .multipart(form)
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode_envelope(response)
    }

    /// GET /api/files/workspace/{id}/files
    pub fn list_files(&self, workspace_id: i64) -> Result<Vec<StoredFile>, ApiError> {
        let url = format!(
            "{}/api/files/workspace/{}/files",
            self.api_base, workspace_id
        );
        self.get_envelope(&url)
    }

    /// POST /api/excel/preview — grid rows for display.
    pub fn preview(&self, file: &SheetFile) -> Result<Vec<Vec<Value>>, ApiError> {
        let url = format!("{}/api/excel/preview", self.api_base);
        let form = Form::new().part("file", Self::file_part(file));
        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode_envelope(response)
    }

    /// POST /api/ai/excel-with-ai — natural-language command over the file.
    pub fn ai_command(&self, file: &SheetFile, command: &str) -> Result<AiReply, ApiError> {
        let url = format!("{}/api/ai/excel-with-ai", self.api_base);
        let form = Form::new()
            .part("file", Self::file_part(file))
            .text("command", command.to_string());
        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let envelope: AiEnvelope = Self::decode_body(response)?;
        if !envelope.success {
            return Err(ApiError::Service(envelope.error.unwrap_or_else(|| {
                "unspecified server error".into()
            })));
        }
        Ok(AiReply {
            response: envelope.ai_response.unwrap_or_default(),
            instruction: envelope.excel_instruction,
        })
    }

    /// POST /api/excel/format-range — apply formats to a cell range.
    pub fn format_range(
        &self,
        file: &SheetFile,
        sheet_name: &str,
        range: &CellRange,
        options: &FormatOptions,
    ) -> Result<(), ApiError> {
        let url = format!("{}/api/excel/format-range", self.api_base);
        let mut form = Form::new()
            .part("file", Self::file_part(file))
            .text("sheetName", sheet_name.to_string())
            .text("startRow", range.start_row.to_string())
            .text("startCol", range.start_col.to_string())
            .text("endRow", range.end_row.to_string())
            .text("endCol", range.end_col.to_string());
        for (key, value) in options.form_fields() {
            form = form.text(key, value);
        }
        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Self::decode_body::<Envelope<Value>>(response)?.ack()
    }

    /// POST /api/excel/bulk-cell-format — format info for a range.
    pub fn bulk_cell_format(
        &self,
        file: &SheetFile,
        range: &CellRange,
    ) -> Result<Value, ApiError> {
        let url = format!("{}/api/excel/bulk-cell-format", self.api_base);
        let range_json =
            serde_json::to_string(range).map_err(|e| ApiError::Parse(e.to_string()))?;
        let form = Form::new()
            .part("file", Self::file_part(file))
            .text("range", range_json);
        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let envelope: BulkFormatEnvelope = Self::decode_body(response)?;
        if !envelope.success {
            return Err(ApiError::Service(envelope.error.unwrap_or_else(|| {
                "unspecified server error".into()
            })));
        }
        Ok(envelope.format_data.unwrap_or(Value::Null))
    }

    // ── Internal helpers ────────────────────────────────────────────

    fn file_part(file: &SheetFile) -> Part {
        Part::bytes(file.bytes.clone()).file_name(file.name.clone())
    }

    fn get_envelope<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let response = self
            .http
            .get(url)
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::decode_envelope(response)
    }

    fn decode_envelope<T: DeserializeOwned>(
        response: reqwest::blocking::Response,
    ) -> Result<T, ApiError> {
        Self::decode_body::<Envelope<T>>(response)?.into_result()
    }

    /// Decode a body that carries its own success flag. The service reports
    /// application failures as `success:false` with a 4xx status; the body
    /// wins over the status so the server's error string survives intact.
    fn decode_body<T: DeserializeOwned>(
        response: reqwest::blocking::Response,
    ) -> Result<T, ApiError> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        match serde_json::from_str::<T>(&body) {
            Ok(decoded) => Ok(decoded),
            Err(_) if !(200..300).contains(&status) => Err(ApiError::Http(status, body)),
            Err(e) => Err(ApiError::Parse(e.to_string())),
        }
    }
}
