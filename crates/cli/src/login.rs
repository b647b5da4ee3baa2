//! Credential commands.
//!
//! `gpush login`   — store and verify an API token
//! `gpush logout`  — forget the saved token

use std::io::{self, Write};

use gridpush_client::{delete_auth, save_auth, Credentials, SheetError, SheetsClient};

use crate::exit_codes::{EXIT_PUSH_AUTH, EXIT_PUSH_REMOTE};
use crate::CliError;

pub fn cmd_login(token: Option<String>, api_base: String) -> Result<(), CliError> {
    // Resolve token: --token flag > GRIDPUSH_API_KEY env > interactive prompt
    let token = if let Some(t) = token {
        t
    } else if let Ok(t) = std::env::var("GRIDPUSH_API_KEY") {
        t
    } else if atty::is(atty::Stream::Stdin) {
        eprint!("gridpush API token: ");
        io::stderr().flush().ok();
        let mut buf = String::new();
        io::stdin()
            .read_line(&mut buf)
            .map_err(|e| CliError::error(e.to_string()))?;
        let trimmed = buf.trim().to_string();
        if trimmed.is_empty() {
            return Err(
                CliError::args("No token provided").with_hint("pass --token or set GRIDPUSH_API_KEY")
            );
        }
        trimmed
    } else {
        return Err(CliError::args("No token provided and stdin is not a TTY")
            .with_hint("pass --token or set GRIDPUSH_API_KEY"));
    };

    // Verify the token works before saving it
    let client = SheetsClient::new(Credentials::new(token.clone(), api_base.clone()));
    let account = client.whoami().map_err(|e| match e {
        SheetError::Auth(..) => CliError {
            code: EXIT_PUSH_AUTH,
            message: "Invalid API token".into(),
            hint: Some("generate a new token in your account settings".into()),
        },
        SheetError::Network(msg) => CliError {
            code: EXIT_PUSH_REMOTE,
            message: format!("Cannot reach the sheet service: {}", msg),
            hint: None,
        },
        other => CliError {
            code: EXIT_PUSH_REMOTE,
            message: other.to_string(),
            hint: None,
        },
    })?;

    // Save with account info
    let creds = Credentials {
        token,
        api_base,
        account: Some(account.handle.clone()),
    };
    save_auth(&creds).map_err(CliError::error)?;

    eprintln!("Authenticated as {} ({})", account.handle, account.email);
    Ok(())
}

pub fn cmd_logout() -> Result<(), CliError> {
    delete_auth().map_err(CliError::error)?;
    eprintln!("Logged out");
    Ok(())
}
