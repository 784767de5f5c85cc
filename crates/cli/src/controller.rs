//! Session controller.
//!
//! Owns everything the web page kept in module-scoped globals: the API
//! client, the live channel, the grid mirror, the notification feed and the
//! current workspace/file. One instance per process, no singletons.
//!
//! Front ends produce `Command`s; `dispatch` maps them onto controller
//! methods. Failures of every kind — network, `success:false` envelopes,
//! parse errors — land in the feed as notifications and are never fatal.

use std::path::{Path, PathBuf};

use serde_json::Value;

use gridlink_api_client::client::DEFAULT_SHEET;
use gridlink_api_client::{
    ApiClient, ApiError, ExcelInstruction, FormatOptions, SheetFile, Workspace,
};
use gridlink_core::{parse_cell, parse_range, GridData, Notification, NotificationFeed};
use gridlink_live::{LiveChannel, LiveEvent};
use gridlink_protocol::CellChange;

use crate::session::Session;

/// Name given to the workspace created on first contact.
const DEFAULT_WORKSPACE_NAME: &str = "My workspace";

/// A user action, independent of the UI that produced it.
#[derive(Debug, Clone)]
pub enum Command {
    CheckStatus,
    ListWorkspaces,
    ListFiles,
    Upload { path: PathBuf },
    RefreshPreview,
    SelectFile { id: i64, name: String },
    AiCommand { text: String },
    EditCell { cell: String, value: String },
    ApplyFormat { range: String, options: FormatOptions },
    FormatInfo { range: String },
    ConnectLive,
    DisconnectLive,
}

pub struct SessionController {
    api: ApiClient,
    channel: LiveChannel,
    grid: GridData,
    feed: NotificationFeed,
    user_id: String,
    workspace: Option<Workspace>,
    current_file: Option<SheetFile>,
    current_file_path: Option<PathBuf>,
    current_file_id: Option<i64>,
}

impl SessionController {
    pub fn new(api: ApiClient, channel: LiveChannel, user_id: String) -> Self {
        Self {
            api,
            channel,
            grid: GridData::new(),
            feed: NotificationFeed::new(),
            user_id,
            workspace: None,
            current_file: None,
            current_file_path: None,
            current_file_id: None,
        }
    }

    /// Re-adopt state from a previous invocation. The file bytes are
    /// re-read from the recorded path; a vanished file just leaves the
    /// session without a current file.
    pub fn restore(&mut self, session: &Session) {
        if let (Some(id), Some(name)) = (session.workspace_id, &session.workspace_name) {
            self.workspace = Some(Workspace {
                id,
                name: name.clone(),
                user_id: None,
                description: None,
                parent_workspace_id: None,
            });
        }
        self.current_file_id = session.current_file_id;
        if let Some(path) = &session.current_file_path {
            match SheetFile::from_path(path) {
                Ok(file) => {
                    self.current_file = Some(file);
                    self.current_file_path = Some(path.clone());
                }
                Err(e) => log::debug!("session file {} not restored: {}", path.display(), e),
            }
        }
    }

    pub fn snapshot(&self) -> Session {
        Session {
            version: 1,
            workspace_id: self.workspace.as_ref().map(|w| w.id),
            workspace_name: self.workspace.as_ref().map(|w| w.name.clone()),
            current_file_path: self.current_file_path.clone(),
            current_file_id: self.current_file_id,
        }
    }

    pub fn grid(&self) -> &GridData {
        &self.grid
    }

    pub fn is_live(&self) -> bool {
        self.channel.is_connected()
    }

    /// Feed entries appended since the last call.
    pub fn unseen_notifications(&mut self) -> &[Notification] {
        self.feed.unseen()
    }

    /// The command dispatch table: every UI action routes through here.
    pub fn dispatch(&mut self, command: Command) {
        match command {
            Command::CheckStatus => self.check_api_status(),
            Command::ListWorkspaces => self.list_workspaces(),
            Command::ListFiles => self.list_files(),
            Command::Upload { path } => self.upload_and_preview(&path),
            Command::RefreshPreview => self.refresh_preview(),
            Command::SelectFile { id, name } => self.select_file(id, &name),
            Command::AiCommand { text } => self.send_ai_command(&text),
            Command::EditCell { cell, value } => self.edit_cell(&cell, &value),
            Command::ApplyFormat { range, options } => self.apply_format(&range, &options),
            Command::FormatInfo { range } => self.bulk_format_info(&range),
            Command::ConnectLive => self.connect_live(),
            Command::DisconnectLive => self.disconnect_live(),
        }
    }

    // ── Service status ──────────────────────────────────────────────

    pub fn check_api_status(&mut self) {
        match self.api.status() {
            Ok(status) if status.has_api_key => self.feed.system("API online"),
            Ok(_) => self.feed.system("API offline"),
            Err(e) => {
                log::debug!("status check: {}", e);
                self.feed.system("API status unknown");
            }
        }
    }

    // ── Workspace and file management ───────────────────────────────

    /// Current workspace id, adopting the user's first workspace or
    /// creating the default one on first contact.
    fn ensure_workspace(&mut self) -> Option<i64> {
        if let Some(workspace) = &self.workspace {
            return Some(workspace.id);
        }
        let adopted = match self.api.list_workspaces(&self.user_id) {
            Ok(mut list) if !list.is_empty() => list.remove(0),
            Ok(_) => {
                match self
                    .api
                    .create_workspace(DEFAULT_WORKSPACE_NAME, &self.user_id, "Default workspace")
                {
                    Ok(workspace) => workspace,
                    Err(e) => {
                        self.notify_api_error("Workspace creation", e);
                        return None;
                    }
                }
            }
            Err(e) => {
                self.notify_api_error("Workspace lookup", e);
                return None;
            }
        };
        let id = adopted.id;
        self.workspace = Some(adopted);
        Some(id)
    }

    pub fn list_workspaces(&mut self) {
        match self.api.list_workspaces(&self.user_id) {
            Ok(list) if list.is_empty() => self.feed.system("No workspaces yet"),
            Ok(list) => {
                for workspace in list {
                    self.feed
                        .system(format!("[{}] {}", workspace.id, workspace.name));
                }
            }
            Err(e) => self.notify_api_error("Workspace list", e),
        }
    }

    pub fn list_files(&mut self) {
        let Some(workspace_id) = self.ensure_workspace() else {
            return;
        };
        match self.api.list_files(workspace_id) {
            Ok(files) if files.is_empty() => self.feed.system("No files yet"),
            Ok(files) => {
                for file in files {
                    let stored_at = file.stored_at().unwrap_or("");
                    self.feed
                        .system(format!("[{}] {} {}", file.id, file.file_name, stored_at));
                }
            }
            Err(e) => self.notify_api_error("File list", e),
        }
    }

    pub fn select_file(&mut self, id: i64, name: &str) {
        // The service has no fetch-by-id, so selection only records the id
        // — previews still need the local bytes.
        self.current_file_id = Some(id);
        self.feed.system(format!("Selected file: {}", name));
    }

    // ── Upload and preview ──────────────────────────────────────────

    pub fn upload_and_preview(&mut self, path: &Path) {
        let Some(workspace_id) = self.ensure_workspace() else {
            return;
        };
        let file = match SheetFile::from_path(path) {
            Ok(file) => file,
            Err(e) => {
                self.feed.system(format!("Cannot read {}: {}", path.display(), e));
                return;
            }
        };

        self.feed.system(format!("Uploading {}", file.name));
        match self.api.upload_file(workspace_id, &self.user_id, &file) {
            Ok(stored) => {
                self.feed.system(format!("Uploaded {}", stored.file_name));
                self.current_file_id = Some(stored.id);
                self.current_file = Some(file);
                self.current_file_path = Some(path.to_path_buf());
                self.load_preview();
                self.list_files();
            }
            Err(e) => self.notify_api_error("Upload", e),
        }
    }

    pub fn refresh_preview(&mut self) {
        if self.current_file.is_some() {
            self.load_preview();
        } else {
            self.feed.system("Upload a file first");
        }
    }

    fn load_preview(&mut self) {
        let result = {
            let Some(file) = self.current_file.as_ref() else {
                return;
            };
            self.api.preview(file)
        };
        match result {
            Ok(rows) => {
                let count = rows.len();
                self.grid.replace_all(rows);
                self.feed.system(format!("Loaded {} row(s)", count));
            }
            Err(e) => self.notify_api_error("Preview", e),
        }
    }

    // ── AI commands ─────────────────────────────────────────────────

    pub fn send_ai_command(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            self.feed.system("Enter a command first");
            return;
        }
        let Some(file) = self.current_file.clone() else {
            self.feed.system("Upload a file first");
            return;
        };

        self.feed.user("you", text);
        match self.api.ai_command(&file, text) {
            Ok(reply) => {
                self.feed.ai(reply.response);
                if let Some(instruction) = reply.instruction {
                    self.apply_instruction(instruction);
                }
            }
            Err(e) => self.notify_api_error("AI request", e),
        }
    }

    fn apply_instruction(&mut self, instruction: ExcelInstruction) {
        if instruction.kind != "update_cells" {
            log::debug!("ignoring AI instruction of kind {:?}", instruction.kind);
            return;
        }
        for cell in instruction.cells {
            self.edit_cell_value(cell.row, cell.col, cell.value);
        }
        self.feed.system("Grid updated from AI instruction");
    }

    // ── Local edits ─────────────────────────────────────────────────

    /// The local-edit path: mutate the grid and, while the channel is
    /// connected, broadcast exactly one change. Full-grid replacement
    /// (preview, live update) never broadcasts.
    pub fn edit_cell_value(&mut self, row: usize, col: usize, value: Value) {
        let before = self.grid.set_cell(row, col, value.clone());
        let change = CellChange {
            row,
            col,
            before,
            after: Some(value),
        };
        if let Err(e) = self.channel.send_changes(std::slice::from_ref(&change)) {
            self.feed.system(format!("Live channel error: {}", e));
        }
    }

    pub fn edit_cell(&mut self, cell: &str, raw_value: &str) {
        match parse_cell(cell) {
            Ok(cell_ref) => {
                let value = parse_value(raw_value);
                self.edit_cell_value(cell_ref.row, cell_ref.col, value);
                self.feed.system(format!("Set {}", cell_ref));
            }
            Err(e) => self.feed.system(format!("Invalid cell reference: {}", e)),
        }
    }

    // ── Formatting ──────────────────────────────────────────────────

    pub fn apply_format(&mut self, range_str: &str, options: &FormatOptions) {
        let Some(file) = self.current_file.clone() else {
            self.feed.system("Upload a file first");
            return;
        };
        let range = match parse_range(range_str) {
            Ok(range) => range,
            Err(e) => {
                self.feed.system(format!("Invalid range: {}", e));
                return;
            }
        };

        match self.api.format_range(&file, DEFAULT_SHEET, &range, options) {
            Ok(()) => {
                self.feed
                    .system(format!("Applied format to {}", range_str));
                self.load_preview();
            }
            Err(e) => self.notify_api_error("Format", e),
        }
    }

    pub fn bulk_format_info(&mut self, range_str: &str) {
        let Some(file) = self.current_file.clone() else {
            self.feed.system("Upload a file first");
            return;
        };
        let range = match parse_range(range_str) {
            Ok(range) => range,
            Err(e) => {
                self.feed.system(format!("Invalid range: {}", e));
                return;
            }
        };

        match self.api.bulk_cell_format(&file, &range) {
            Ok(format_data) => {
                self.feed
                    .system(format!("Format info for {}: {}", range_str, format_data));
            }
            Err(e) => self.notify_api_error("Format info", e),
        }
    }

    // ── Live channel ────────────────────────────────────────────────

    pub fn connect_live(&mut self) {
        match self.channel.connect() {
            Ok(true) => self.feed.system("Live channel connected"),
            Ok(false) => {}
            Err(e) => self.feed.system(format!("Live channel connect failed: {}", e)),
        }
    }

    pub fn disconnect_live(&mut self) {
        if self.channel.is_connected() {
            self.channel.disconnect();
            self.feed.system("Live channel disconnected");
        }
    }

    /// Block for one live event and fold it into grid + feed.
    /// Returns false once the channel is disconnected.
    pub fn pump_live(&mut self) -> bool {
        let Some(event) = self.channel.next_event() else {
            return false;
        };
        match event {
            LiveEvent::AiMessage(message) => self.feed.ai(message),
            LiveEvent::GridReplace(rows) => self.grid.replace_all(rows),
            LiveEvent::System(message) => self.feed.system(message),
            LiveEvent::Raw(payload) => self.feed.system(format!("Live message: {}", payload)),
            LiveEvent::Closed { reason } => {
                match reason {
                    Some(reason) => self
                        .feed
                        .system(format!("Live channel error: {}", reason)),
                    None => self.feed.system("Live channel closed"),
                }
                return false;
            }
        }
        true
    }

    // ── Helpers ─────────────────────────────────────────────────────

    fn notify_api_error(&mut self, context: &str, error: ApiError) {
        log::debug!("{}: {}", context, error);
        self.feed.system(format!("{} failed: {}", context, error));
    }

    #[cfg(test)]
    fn attach_live(&mut self, transport: Box<dyn gridlink_live::Transport>) {
        self.channel
            .attach(transport, "client_1_abcdefghi".to_string());
    }

    #[cfg(test)]
    fn set_current_file(&mut self, file: SheetFile) {
        self.current_file = Some(file);
    }
}

/// Interpret CLI input as JSON where possible ("123" edits a number,
/// "abc" a string), matching what the grid widget would have produced.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
