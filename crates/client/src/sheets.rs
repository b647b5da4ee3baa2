//! Sheet service HTTP client.
//!
//! Blocking reqwest client (no Tokio runtime required). Covers the four
//! worksheet capabilities — size, grow, ranged read, batched update —
//! plus account verification for login.
//!
//! Cell coordinates on the wire are 1-based, matching A1 notation.

use std::time::Duration;

use serde::Deserialize;

use gridpush_core::{Cell, Worksheet, WorksheetError};

use crate::auth::{load_auth, Credentials};

/// Sheet service API client (blocking).
#[derive(Clone)]
pub struct SheetsClient {
    http: reqwest::blocking::Client,
    api_base: String,
    token: String,
}

/// Error type for sheet service operations.
#[derive(Debug)]
pub enum SheetError {
    /// No auth credentials configured
    NotAuthenticated,
    /// Network error
    Network(String),
    /// HTTP error with status code
    Http(u16, String),
    /// JSON parsing error
    Parse(String),
    /// Token rejected (401/403)
    Auth(u16, String),
    /// Sheet id unknown to the service (404)
    NotFound(String),
    /// Server returned a validation error (400/422 with message)
    Validation(String),
}

impl SheetError {
    /// The retry split: only network trouble, rate limiting, and server
    /// errors are worth repeating. Everything else would fail the same
    /// way again.
    pub fn is_transient(&self) -> bool {
        match self {
            SheetError::Network(_) => true,
            SheetError::Http(status, _) => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl std::fmt::Display for SheetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetError::NotAuthenticated => {
                write!(f, "Not authenticated — run `gpush login` first")
            }
            SheetError::Network(msg) => write!(f, "Network error: {}", msg),
            SheetError::Http(code, msg) => write!(f, "HTTP {}: {}", code, msg),
            SheetError::Parse(msg) => write!(f, "Parse error: {}", msg),
            SheetError::Auth(code, msg) => write!(f, "Auth failed ({}): {}", code, msg),
            SheetError::NotFound(msg) => write!(f, "Sheet not found: {}", msg),
            SheetError::Validation(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for SheetError {}

impl From<SheetError> for WorksheetError {
    fn from(e: SheetError) -> Self {
        if e.is_transient() {
            WorksheetError::Transient(e.to_string())
        } else {
            WorksheetError::Permanent(e.to_string())
        }
    }
}

/// Sheet metadata from `GET /v1/sheets/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct SheetMeta {
    pub id: String,
    pub title: String,
    /// Total rows, blank tail included.
    pub row_count: u64,
    pub col_count: u64,
}

/// Account info from `GET /v1/me`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfo {
    pub handle: String,
    pub email: String,
    pub plan: String,
}

#[derive(Deserialize)]
struct CellsEnvelope {
    cells: Vec<Cell>,
}

#[derive(Deserialize)]
struct RowCountEnvelope {
    row_count: u64,
}

#[derive(Deserialize)]
struct UpdatedEnvelope {
    updated: u64,
}

impl SheetsClient {
    /// Create a new client using saved auth credentials.
    pub fn from_saved_auth() -> Result<Self, SheetError> {
        let creds = load_auth().ok_or(SheetError::NotAuthenticated)?;
        Ok(Self::new(creds))
    }

    /// Create a new client with explicit credentials.
    pub fn new(creds: Credentials) -> Self {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("gpush/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            api_base: creds.api_base,
            token: creds.token,
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Verify the current token and get account info.
    pub fn whoami(&self) -> Result<AccountInfo, SheetError> {
        let url = format!("{}/v1/me", self.api_base);
        let resp = self.get(&url)?;
        resp.json::<AccountInfo>()
            .map_err(|e| SheetError::Parse(e.to_string()))
    }

    /// Fetch sheet metadata, including the current row count.
    pub fn sheet_meta(&self, sheet_id: &str) -> Result<SheetMeta, SheetError> {
        let url = format!("{}/v1/sheets/{}", self.api_base, sheet_id);
        let resp = self.get(&url)?;
        resp.json::<SheetMeta>()
            .map_err(|e| SheetError::Parse(e.to_string()))
    }

    /// Append `count` blank rows at the bottom. Returns the new total.
    pub fn append_rows(&self, sheet_id: &str, count: u64) -> Result<u64, SheetError> {
        let url = format!("{}/v1/sheets/{}/rows", self.api_base, sheet_id);
        let resp = self.post_json(&url, &serde_json::json!({ "count": count }))?;
        let envelope: RowCountEnvelope =
            resp.json().map_err(|e| SheetError::Parse(e.to_string()))?;
        Ok(envelope.row_count)
    }

    /// Fetch the cell batch for an A1 range, row-major.
    pub fn cells_in_range(&self, sheet_id: &str, a1: &str) -> Result<Vec<Cell>, SheetError> {
        let url = format!("{}/v1/sheets/{}/cells", self.api_base, sheet_id);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("range", a1)])
            .send()
            .map_err(|e| SheetError::Network(e.to_string()))?;
        let resp = classify(response)?;
        let envelope: CellsEnvelope = resp.json().map_err(|e| SheetError::Parse(e.to_string()))?;
        Ok(envelope.cells)
    }

    /// Push a batch of modified cells back. Returns how many the service
    /// applied.
    pub fn update_cells(&self, sheet_id: &str, cells: &[Cell]) -> Result<u64, SheetError> {
        let url = format!("{}/v1/sheets/{}/cells", self.api_base, sheet_id);
        let resp = self.put_json(&url, &serde_json::json!({ "cells": cells }))?;
        let envelope: UpdatedEnvelope =
            resp.json().map_err(|e| SheetError::Parse(e.to_string()))?;
        Ok(envelope.updated)
    }

    // ── Internal helpers ────────────────────────────────────────────

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response, SheetError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| SheetError::Network(e.to_string()))?;
        classify(response)
    }

    fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::blocking::Response, SheetError> {
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .map_err(|e| SheetError::Network(e.to_string()))?;
        classify(response)
    }

    fn put_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::blocking::Response, SheetError> {
        let response = self
            .http
            .put(url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .map_err(|e| SheetError::Network(e.to_string()))?;
        classify(response)
    }
}

/// Map an HTTP response to the error taxonomy.
fn classify(response: reqwest::blocking::Response) -> Result<reqwest::blocking::Response, SheetError> {
    let status = response.status().as_u16();
    if response.status().is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    match status {
        401 | 403 => Err(SheetError::Auth(status, body)),
        404 => Err(SheetError::NotFound(body)),
        400 | 422 => Err(SheetError::Validation(body)),
        _ => Err(SheetError::Http(status, body)),
    }
}

/// One sheet on the service, seen through the worksheet trait.
///
/// Caches nothing: the row count is re-read on every call, so a sheet
/// grown by another writer between calls is picked up.
pub struct RemoteWorksheet {
    client: SheetsClient,
    sheet_id: String,
}

impl RemoteWorksheet {
    pub fn new(client: SheetsClient, sheet_id: impl Into<String>) -> Self {
        Self {
            client,
            sheet_id: sheet_id.into(),
        }
    }

    pub fn sheet_id(&self) -> &str {
        &self.sheet_id
    }
}

impl Worksheet for RemoteWorksheet {
    fn row_count(&mut self) -> Result<u64, WorksheetError> {
        let meta = self.client.sheet_meta(&self.sheet_id)?;
        Ok(meta.row_count)
    }

    fn add_rows(&mut self, n: u64) -> Result<(), WorksheetError> {
        self.client.append_rows(&self.sheet_id, n)?;
        Ok(())
    }

    fn fetch_range(&mut self, a1: &str) -> Result<Vec<Cell>, WorksheetError> {
        Ok(self.client.cells_in_range(&self.sheet_id, a1)?)
    }

    fn update_cells(&mut self, cells: &[Cell]) -> Result<(), WorksheetError> {
        self.client.update_cells(&self.sheet_id, cells)?;
        Ok(())
    }
}
