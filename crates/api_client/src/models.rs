//! REST models for the sheet service.
//!
//! Field names mirror the service's JSON exactly (camelCase). Unknown
//! fields are ignored so the client tolerates server-side additions.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::ApiError;

/// A server-side grouping of uploaded files belonging to a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent_workspace_id: Option<i64>,
}

/// A file stored in a workspace.
///
/// The upload response reports `uploadTime`; listings carry the entity's
/// `createdAt`. Both are kept and callers fall back from one to the other.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub id: i64,
    pub file_name: String,
    #[serde(default)]
    pub upload_time: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub file_size: Option<i64>,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub uploaded_by: Option<String>,
}

impl StoredFile {
    /// Best-effort timestamp for display.
    pub fn stored_at(&self) -> Option<&str> {
        self.upload_time.as_deref().or(self.created_at.as_deref())
    }
}

/// The in-memory spreadsheet the client holds on to.
///
/// The service has no fetch-by-id, so previews, AI commands and format
/// calls all re-send the bytes of the current file.
#[derive(Debug, Clone)]
pub struct SheetFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SheetFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ApiError> {
        let bytes = std::fs::read(path).map_err(|e| ApiError::Io(e.to_string()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.xlsx".to_string());
        Ok(Self { name, bytes })
    }
}

/// GET /api/status
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub has_api_key: bool,
}

/// Reply from the AI endpoint. Not the uniform envelope: the response text
/// and the optional structured instruction are top-level fields.
#[derive(Debug, Clone)]
pub struct AiReply {
    pub response: String,
    pub instruction: Option<ExcelInstruction>,
}

/// Structured cell edits attached to an AI reply.
#[derive(Debug, Clone, Deserialize)]
pub struct ExcelInstruction {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub cells: Vec<InstructionCell>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstructionCell {
    pub row: usize,
    pub col: usize,
    pub value: Value,
}

/// Optional format fields for the format-range call. Only set fields are
/// transmitted; the key spelling is part of the client contract.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormatOptions {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub background_color: Option<String>,
    pub font_color: Option<String>,
    pub font_size: Option<u32>,
    /// Thin border on all four sides
    pub border: Option<bool>,
}

impl FormatOptions {
    /// Multipart text fields in the service's expected spelling.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        if let Some(bold) = self.bold {
            fields.push(("fontBold", bold.to_string()));
        }
        if let Some(italic) = self.italic {
            fields.push(("fontItalic", italic.to_string()));
        }
        if let Some(underline) = self.underline {
            fields.push(("fontUnderline", underline.to_string()));
        }
        if let Some(color) = &self.background_color {
            fields.push(("backgroundColor", color.clone()));
        }
        if let Some(color) = &self.font_color {
            fields.push(("fontColor", color.clone()));
        }
        if let Some(size) = self.font_size {
            fields.push(("fontSize", size.to_string()));
        }
        if self.border == Some(true) {
            fields.push(("borderLeft", "THIN".to_string()));
            fields.push(("borderRight", "THIN".to_string()));
            fields.push(("borderTop", "THIN".to_string()));
            fields.push(("borderBottom", "THIN".to_string()));
        }
        fields
    }

    pub fn is_empty(&self) -> bool {
        self.form_fields().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_decodes_service_shape() {
        let json = r#"{
            "id": 7,
            "name": "My workspace",
            "userId": "user_1700000000000_k3j9x1mzq",
            "description": "Default workspace",
            "parentWorkspaceId": null,
            "createdAt": "2024-05-01T12:00:00"
        }"#;
        let ws: Workspace = serde_json::from_str(json).unwrap();
        assert_eq!(ws.id, 7);
        assert_eq!(ws.name, "My workspace");
        assert_eq!(ws.user_id.as_deref(), Some("user_1700000000000_k3j9x1mzq"));
        assert!(ws.parent_workspace_id.is_none());
    }

    #[test]
    fn test_stored_file_timestamp_fallback() {
        let listed: StoredFile = serde_json::from_str(
            r#"{"id":1,"fileName":"q3.xlsx","createdAt":"2024-05-01T12:00:00"}"#,
        )
        .unwrap();
        assert_eq!(listed.stored_at(), Some("2024-05-01T12:00:00"));

        let uploaded: StoredFile = serde_json::from_str(
            r#"{"id":2,"fileName":"q4.xlsx","uploadTime":"2024-06-01T08:30:00"}"#,
        )
        .unwrap();
        assert_eq!(uploaded.stored_at(), Some("2024-06-01T08:30:00"));
    }

    #[test]
    fn test_format_fields_spelling() {
        let options = FormatOptions {
            bold: Some(true),
            background_color: Some("#ff0000".into()),
            font_size: Some(14),
            border: Some(true),
            ..FormatOptions::default()
        };
        let fields = options.form_fields();

        assert!(fields.contains(&("fontBold", "true".to_string())));
        assert!(fields.contains(&("backgroundColor", "#ff0000".to_string())));
        assert!(fields.contains(&("fontSize", "14".to_string())));
        // borders expand to all four thin sides
        for side in ["borderLeft", "borderRight", "borderTop", "borderBottom"] {
            assert!(fields.iter().any(|(k, v)| *k == side && v == "THIN"));
        }
    }

    #[test]
    fn test_format_fields_empty_by_default() {
        assert!(FormatOptions::default().is_empty());
    }
}
