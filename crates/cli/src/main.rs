//! gridlink — command-line front end for the AI sheet service.
//!
//! Subcommands map one-to-one onto controller `Command`s; everything the
//! controller has to say comes back through the notification feed and is
//! printed as it appears. Session state (current workspace/file) persists
//! across invocations in the config dir.

mod controller;
mod session;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use gridlink_api_client::{load_or_create_identity, ApiClient, FormatOptions};
use gridlink_core::NotificationKind;
use gridlink_live::LiveChannel;

use crate::controller::{Command, SessionController};
use crate::session::Session;

#[derive(Parser)]
#[command(name = "gridlink", version, about = "Client for the AI spreadsheet service")]
struct Cli {
    /// REST endpoint base
    #[arg(
        long,
        global = true,
        env = "GRIDLINK_API_BASE",
        default_value = "http://127.0.0.1:8080"
    )]
    api_base: String,

    /// Websocket endpoint base
    #[arg(
        long,
        global = true,
        env = "GRIDLINK_WS_BASE",
        default_value = "ws://127.0.0.1:8080"
    )]
    ws_base: String,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Check whether the service is up and has an AI key
    Status,
    /// List workspaces for the local identity
    Workspaces,
    /// List files in the current workspace
    Files,
    /// Upload a spreadsheet and load its preview
    Upload { path: PathBuf },
    /// Re-fetch the preview for the current file
    Preview,
    /// Record a stored file as current
    Select { id: i64, name: String },
    /// Send a natural-language command against the current file
    Ai { text: String },
    /// Edit one cell locally ("B5" "250"); broadcasts while watching
    Edit { cell: String, value: String },
    /// Apply formatting to a range ("A1:B5")
    Format {
        range: String,
        #[arg(long)]
        bold: bool,
        #[arg(long)]
        italic: bool,
        #[arg(long)]
        underline: bool,
        /// Thin border on all four sides
        #[arg(long)]
        border: bool,
        /// Background color, e.g. "#ffff00"
        #[arg(long)]
        bg: Option<String>,
        /// Font color, e.g. "#cc0000"
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        font_size: Option<u32>,
    },
    /// Fetch format info for a range
    FormatInfo { range: String },
    /// Connect the live channel and stream updates until the server closes
    Watch,
    /// Parse range notation and print the zero-based coordinates
    Range {
        range: String,
        /// Print as a single JSON object
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    // `range` is pure parsing; it needs no identity, session or service.
    if let CliCommand::Range { range, json } = &cli.command {
        process::exit(run_range(range, *json));
    }

    let identity = match load_or_create_identity() {
        Ok(identity) => identity,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    let api = ApiClient::new(&cli.api_base);
    let channel = LiveChannel::new(&cli.ws_base);
    let mut controller = SessionController::new(api, channel, identity.user_id);
    if let Some(session) = Session::load() {
        controller.restore(&session);
    }

    match cli.command {
        CliCommand::Watch => run_watch(&mut controller),
        other => {
            controller.dispatch(to_command(other));
            print_feed(&mut controller);
        }
    }

    if let Err(e) = controller.snapshot().save() {
        log::warn!("failed to save session: {}", e);
    }
}

fn to_command(cli_command: CliCommand) -> Command {
    match cli_command {
        CliCommand::Status => Command::CheckStatus,
        CliCommand::Workspaces => Command::ListWorkspaces,
        CliCommand::Files => Command::ListFiles,
        CliCommand::Upload { path } => Command::Upload { path },
        CliCommand::Preview => Command::RefreshPreview,
        CliCommand::Select { id, name } => Command::SelectFile { id, name },
        CliCommand::Ai { text } => Command::AiCommand { text },
        CliCommand::Edit { cell, value } => Command::EditCell { cell, value },
        CliCommand::Format {
            range,
            bold,
            italic,
            underline,
            border,
            bg,
            color,
            font_size,
        } => Command::ApplyFormat {
            range,
            options: FormatOptions {
                bold: bold.then_some(true),
                italic: italic.then_some(true),
                underline: underline.then_some(true),
                border: border.then_some(true),
                background_color: bg,
                font_color: color,
                font_size,
            },
        },
        CliCommand::FormatInfo { range } => Command::FormatInfo { range },
        CliCommand::Watch | CliCommand::Range { .. } => unreachable!("handled in main"),
    }
}

fn run_watch(controller: &mut SessionController) {
    controller.dispatch(Command::ConnectLive);
    print_feed(controller);
    if !controller.is_live() {
        return;
    }
    while controller.pump_live() {
        print_feed(controller);
    }
    print_feed(controller);
}

fn run_range(input: &str, json: bool) -> i32 {
    match gridlink_core::parse_range(input) {
        Ok(range) => {
            if json {
                // single JSON value on stdout, nothing else
                match serde_json::to_string(&range) {
                    Ok(line) => println!("{}", line),
                    Err(e) => {
                        eprintln!("error: {}", e);
                        return 1;
                    }
                }
            } else {
                println!(
                    "rows {}..{}  cols {}..{}",
                    range.start_row, range.end_row, range.start_col, range.end_col
                );
            }
            0
        }
        Err(e) => {
            eprintln!("error: {}", e);
            1
        }
    }
}

fn print_feed(controller: &mut SessionController) {
    for note in controller.unseen_notifications() {
        match (note.kind, note.sender.as_deref()) {
            (NotificationKind::User, Some(sender)) => println!("{}: {}", sender, note.body),
            (NotificationKind::User, None) => println!("you: {}", note.body),
            (NotificationKind::Ai, _) => println!("ai: {}", note.body),
            (NotificationKind::System, _) => println!("· {}", note.body),
        }
    }
}
