//! Persisted session state.
//!
//! The web page kept the current workspace and file in page-scoped globals
//! that lived as long as the tab. A CLI process is shorter-lived, so the
//! equivalent state is written to the config dir between invocations.
//! File bytes are not stored; they are re-read from the recorded path.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Session {
    pub version: u32,
    pub workspace_id: Option<i64>,
    pub workspace_name: Option<String>,
    pub current_file_path: Option<PathBuf>,
    pub current_file_id: Option<i64>,
}

impl Session {
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gridlink")
            .join("session.json")
    }

    pub fn load() -> Option<Self> {
        let path = Self::path();
        fs::read_to_string(&path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
    }

    pub fn save(&self) -> Result<(), String> {
        let path = Self::path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(&path, json).map_err(|e| e.to_string())
    }
}
