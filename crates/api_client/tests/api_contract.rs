//! Integration tests for the REST client against a mock service.
//!
//! These pin the request shapes (paths, query params) and the envelope
//! handling: `success:false` bodies must surface the server's error string
//! verbatim regardless of HTTP status.

use httpmock::prelude::*;
use serde_json::json;

use gridlink_api_client::{ApiClient, ApiError, FormatOptions, SheetFile};
use gridlink_core::parse_range;

fn sample_file() -> SheetFile {
    SheetFile::new("q3.xlsx", b"PK\x03\x04fake-xlsx-bytes".to_vec())
}

#[test]
fn status_reports_api_key() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/status");
        then.status(200).json_body(json!({"hasApiKey": true}));
    });

    let client = ApiClient::new(server.base_url());
    let status = client.status().unwrap();

    assert!(status.has_api_key);
    mock.assert();
}

#[test]
fn list_workspaces_unwraps_envelope() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/files/workspaces/user/user_1700000000000_k3j9x1mzq");
        then.status(200).json_body(json!({
            "success": true,
            "data": [
                {"id": 7, "name": "My workspace", "userId": "user_1700000000000_k3j9x1mzq"}
            ],
            "count": 1
        }));
    });

    let client = ApiClient::new(server.base_url());
    let workspaces = client
        .list_workspaces("user_1700000000000_k3j9x1mzq")
        .unwrap();

    assert_eq!(workspaces.len(), 1);
    assert_eq!(workspaces[0].id, 7);
    assert_eq!(workspaces[0].name, "My workspace");
    mock.assert();
}

#[test]
fn service_error_string_survives_http_400() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/files/workspace/create");
        then.status(400).json_body(json!({
            "success": false,
            "error": "Workspace name is required"
        }));
    });

    let client = ApiClient::new(server.base_url());
    let err = client.create_workspace("", "user_x", "").unwrap_err();

    match err {
        ApiError::Service(msg) => assert_eq!(msg, "Workspace name is required"),
        other => panic!("expected Service error, got {}", other),
    }
}

#[test]
fn non_envelope_error_body_maps_to_http() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/files/workspace/9/files");
        then.status(502).body("bad gateway");
    });

    let client = ApiClient::new(server.base_url());
    let err = client.list_files(9).unwrap_err();

    match err {
        ApiError::Http(502, body) => assert_eq!(body, "bad gateway"),
        other => panic!("expected Http error, got {}", other),
    }
}

#[test]
fn upload_sends_user_id_query() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/files/workspace/7/upload")
            .query_param("userId", "user_x");
        then.status(200).json_body(json!({
            "success": true,
            "data": {"id": 31, "fileName": "q3.xlsx", "uploadTime": "2024-06-01T08:30:00"}
        }));
    });

    let client = ApiClient::new(server.base_url());
    let stored = client.upload_file(7, "user_x", &sample_file()).unwrap();

    assert_eq!(stored.id, 31);
    assert_eq!(stored.file_name, "q3.xlsx");
    assert_eq!(stored.stored_at(), Some("2024-06-01T08:30:00"));
    mock.assert();
}

#[test]
fn preview_returns_grid_rows() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/excel/preview");
        then.status(200).json_body(json!({
            "success": true,
            "data": [["name", "amount"], ["alice", 100], ["bob", 200]]
        }));
    });

    let client = ApiClient::new(server.base_url());
    let rows = client.preview(&sample_file()).unwrap();

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0][0], json!("name"));
    assert_eq!(rows[2][1], json!(200));
}

#[test]
fn ai_command_with_instruction() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/ai/excel-with-ai");
        then.status(200).json_body(json!({
            "success": true,
            "aiResponse": "Updated the totals column.",
            "excelInstruction": {
                "type": "update_cells",
                "cells": [
                    {"row": 1, "col": 2, "value": 300},
                    {"row": 2, "col": 2, "value": "=SUM(C2:C2)"}
                ]
            }
        }));
    });

    let client = ApiClient::new(server.base_url());
    let reply = client.ai_command(&sample_file(), "sum the totals").unwrap();

    assert_eq!(reply.response, "Updated the totals column.");
    let instruction = reply.instruction.unwrap();
    assert_eq!(instruction.kind, "update_cells");
    assert_eq!(instruction.cells.len(), 2);
    assert_eq!(instruction.cells[0].value, json!(300));
}

#[test]
fn ai_command_without_instruction() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/ai/excel-with-ai");
        then.status(200).json_body(json!({
            "success": true,
            "aiResponse": "The data trends upward."
        }));
    });

    let client = ApiClient::new(server.base_url());
    let reply = client.ai_command(&sample_file(), "analyze this").unwrap();

    assert_eq!(reply.response, "The data trends upward.");
    assert!(reply.instruction.is_none());
}

#[test]
fn ai_command_failure_surfaces_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/ai/excel-with-ai");
        then.status(500)
            .json_body(json!({"success": false, "error": "AI service unavailable"}));
    });

    let client = ApiClient::new(server.base_url());
    let err = client.ai_command(&sample_file(), "do anything").unwrap_err();

    match err {
        ApiError::Service(msg) => assert_eq!(msg, "AI service unavailable"),
        other => panic!("expected Service error, got {}", other),
    }
}

#[test]
fn format_range_acks_without_data() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/excel/format-range");
        then.status(200).json_body(json!({
            "success": true,
            "message": "Cell range formatted successfully"
        }));
    });

    let client = ApiClient::new(server.base_url());
    let range = parse_range("A1:B5").unwrap();
    let options = FormatOptions {
        bold: Some(true),
        ..FormatOptions::default()
    };

    client
        .format_range(&sample_file(), "Sheet1", &range, &options)
        .unwrap();
    mock.assert();
}

#[test]
fn bulk_cell_format_reads_format_data_key() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/excel/bulk-cell-format");
        then.status(200).json_body(json!({
            "success": true,
            "formatData": {"A1": {"bold": true}}
        }));
    });

    let client = ApiClient::new(server.base_url());
    let range = parse_range("A1:A1").unwrap();
    let data = client.bulk_cell_format(&sample_file(), &range).unwrap();

    assert_eq!(data, json!({"A1": {"bold": true}}));
}

#[test]
fn network_failure_maps_to_network_error() {
    // Nothing listens on this port.
    let client = ApiClient::new("http://127.0.0.1:9");
    let err = client.status().unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}
