//! Sheet service API client — shared between scripts and the CLI.
//!
//! This crate is the single source of truth for the service wire
//! contract: auth, sheet metadata, row growth, ranged cell reads,
//! batched cell updates. [`RemoteWorksheet`] adapts one sheet to the
//! worksheet trait the grid writer consumes.
//!
//! Blocking HTTP only. No retries — the writer owns the retry policy;
//! this crate just classifies failures as transient or permanent.

mod auth;
mod sheets;

pub use auth::{auth_file_path, delete_auth, load_auth, save_auth, Credentials, DEFAULT_API_BASE};
pub use sheets::{AccountInfo, RemoteWorksheet, SheetError, SheetMeta, SheetsClient};
