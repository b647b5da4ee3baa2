//! `gpush push` — read a CSV block and write it into a sheet.
//!
//! The flow: parse the block, resolve credentials, read the sheet's
//! metadata, then hand the block to the grid writer. The metadata read
//! doubles as a pre-flight check, so bad tokens and missing sheets fail
//! with their own exit codes before anything is written.

use std::time::Duration;

use gridpush_client::{
    load_auth, Credentials, RemoteWorksheet, SheetError, SheetsClient, DEFAULT_API_BASE,
};
use gridpush_core::console::{self, Trace};
use gridpush_core::{GridRange, GridWriter, RetryPolicy, RowBlock, RowCursor, WriteError};

use crate::exit_codes::{
    EXIT_PUSH_AUTH, EXIT_PUSH_NOT_AUTH, EXIT_PUSH_NOT_FOUND, EXIT_PUSH_REMOTE,
    EXIT_PUSH_VALIDATION,
};
use crate::input;
use crate::CliError;

#[allow(clippy::too_many_arguments)]
pub fn cmd_push(
    file: String,
    sheet_id: String,
    start_row: Option<u64>,
    delimiter: char,
    api_key: Option<String>,
    api_base: Option<String>,
    attempts: u32,
    retry_delay: u64,
    dry_run: bool,
    show_block: bool,
    verbose: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let mut trace = Trace::new(verbose);
    trace.enter(&format!("push {}", sheet_id), '=');

    let block = input::read_block(&file, delimiter)?;
    let source = if file == "-" { "stdin" } else { file.as_str() };
    trace.line(&format!(
        "{} rows x {} cols from {}",
        block.rows(),
        block.cols(),
        source
    ));

    if show_block {
        console::dump("block", &block);
    }

    let creds = resolve_credentials(api_key, api_base)?;
    let client = SheetsClient::new(creds);

    let meta = client.sheet_meta(&sheet_id).map_err(sheet_error)?;
    trace.line(&format!(
        "sheet \"{}\" has {} rows",
        meta.title, meta.row_count
    ));

    let plan = plan_write(meta.row_count, start_row.unwrap_or(meta.row_count), &block);
    trace.line(&format!(
        "target {} ({} rows to append)",
        plan.range, plan.rows_to_add
    ));

    if dry_run {
        println!(
            "would write {} cells into {}",
            block.rows() * block.cols(),
            plan.range
        );
        println!(
            "would append {} rows (sheet has {})",
            plan.rows_to_add, meta.row_count
        );
        trace.leave("dry run done");
        return Ok(());
    }

    let policy = RetryPolicy::new(attempts, Duration::from_secs(retry_delay));
    let mut writer = GridWriter::with_policy(policy);
    if quiet {
        writer = writer.quiet();
    }

    let mut worksheet = RemoteWorksheet::new(client, &sheet_id);
    let mut cursor = RowCursor::new(meta.row_count);

    let receipt = writer
        .write(&mut worksheet, &mut cursor, &block, start_row)
        .map_err(write_error)?;

    trace.line(&format!(
        "wrote {} cells, {} rows appended",
        receipt.cells_updated, receipt.rows_appended
    ));
    trace.leave("push done");

    if !quiet {
        eprintln!(
            "Pushed {} cells into {} ({} rows appended)",
            receipt.cells_updated, receipt.range, receipt.rows_appended
        );
    }
    Ok(())
}

/// What a write will do, computed from sheet metadata ahead of time.
struct PushPlan {
    range: String,
    rows_to_add: u64,
}

fn plan_write(row_count: u64, start: u64, block: &RowBlock) -> PushPlan {
    let needed = start + block.rows();
    PushPlan {
        range: GridRange::new(start, block.rows(), block.cols()).a1(),
        rows_to_add: needed.saturating_sub(row_count),
    }
}

/// Resolve credentials: flags (with their env fallbacks, via clap) win
/// over the saved login; the stock API base is the last resort.
fn resolve_credentials(
    api_key: Option<String>,
    api_base: Option<String>,
) -> Result<Credentials, CliError> {
    let saved = load_auth();

    let token = api_key
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .or_else(|| saved.as_ref().map(|s| s.token.clone()));
    let Some(token) = token else {
        return Err(CliError {
            code: EXIT_PUSH_NOT_AUTH,
            message: "No API token provided".into(),
            hint: Some("run `gpush login`, pass --api-key, or set GRIDPUSH_API_KEY".into()),
        });
    };

    let api_base = api_base
        .or_else(|| saved.map(|s| s.api_base))
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

    Ok(Credentials::new(token, api_base))
}

fn sheet_error(e: SheetError) -> CliError {
    match e {
        SheetError::NotAuthenticated => CliError {
            code: EXIT_PUSH_NOT_AUTH,
            message: e.to_string(),
            hint: Some("run `gpush login` or set GRIDPUSH_API_KEY".into()),
        },
        SheetError::Auth(..) => CliError {
            code: EXIT_PUSH_AUTH,
            message: e.to_string(),
            hint: Some("re-run `gpush login` to refresh the token".into()),
        },
        SheetError::NotFound(_) => CliError {
            code: EXIT_PUSH_NOT_FOUND,
            message: e.to_string(),
            hint: None,
        },
        SheetError::Validation(_) => CliError {
            code: EXIT_PUSH_VALIDATION,
            message: e.to_string(),
            hint: None,
        },
        SheetError::Network(_) | SheetError::Http(..) | SheetError::Parse(_) => CliError {
            code: EXIT_PUSH_REMOTE,
            message: e.to_string(),
            hint: None,
        },
    }
}

fn write_error(e: WriteError) -> CliError {
    match &e {
        WriteError::Rejected(_) => CliError {
            code: EXIT_PUSH_VALIDATION,
            message: e.to_string(),
            hint: None,
        },
        WriteError::Resize(_) | WriteError::RetriesExhausted { .. } => CliError {
            code: EXIT_PUSH_REMOTE,
            message: e.to_string(),
            hint: None,
        },
    }
}
