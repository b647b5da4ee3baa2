// gridpush CLI - push tabular data into hosted sheets

mod exit_codes;
mod input;
mod login;
mod push;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

// Re-export exit codes from registry (single source of truth)
use exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "gpush")]
#[command(about = "Push tabular data into hosted sheets")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store and verify a sheet service API token
    Login {
        /// API token (omit to be prompted on a TTY)
        #[arg(long)]
        token: Option<String>,

        /// Service base URL
        #[arg(
            long,
            env = "GRIDPUSH_API_BASE",
            default_value = gridpush_client::DEFAULT_API_BASE
        )]
        api_base: String,
    },

    /// Forget the saved token
    Logout,

    /// Push a CSV file into a sheet
    #[command(after_help = "\
Examples:
  gpush push report.csv --sheet sh_42
  cat report.csv | gpush push - --sheet sh_42 --start-row 10
  gpush push report.tsv --sheet sh_42 --delimiter '\\t' --dry-run
  gpush push report.csv --sheet sh_42 --attempts 3 --retry-delay 1 -v")]
    Push {
        /// Input file (- for stdin)
        file: String,

        /// Target sheet id
        #[arg(long)]
        sheet: String,

        /// Rows already consumed in the sheet; omit to append below the
        /// sheet's current bottom
        #[arg(long, value_name = "N")]
        start_row: Option<u64>,

        /// CSV delimiter
        #[arg(long, default_value = ",")]
        delimiter: char,

        /// API token (overrides saved credentials)
        #[arg(long, env = "GRIDPUSH_API_KEY")]
        api_key: Option<String>,

        /// Service base URL (overrides saved credentials)
        #[arg(long, env = "GRIDPUSH_API_BASE")]
        api_base: Option<String>,

        /// Remote attempts per operation
        #[arg(long, default_value_t = 5)]
        attempts: u32,

        /// Seconds between attempts
        #[arg(long, default_value_t = 5, value_name = "SECS")]
        retry_delay: u64,

        /// Print the write plan without writing
        #[arg(long)]
        dry_run: bool,

        /// Dump the parsed block before pushing
        #[arg(long)]
        show_block: bool,

        /// Trace the push step by step
        #[arg(long, short = 'v')]
        verbose: bool,

        /// Suppress progress output and the give-up banner
        #[arg(long, short = 'q', conflicts_with = "verbose")]
        quiet: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Login { token, api_base } => login::cmd_login(token, api_base),
        Commands::Logout => login::cmd_logout(),
        Commands::Push {
            file,
            sheet,
            start_row,
            delimiter,
            api_key,
            api_base,
            attempts,
            retry_delay,
            dry_run,
            show_block,
            verbose,
            quiet,
        } => push::cmd_push(
            file, sheet, start_row, delimiter, api_key, api_base, attempts, retry_delay,
            dry_run, show_block, verbose, quiet,
        ),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError {
            code,
            message,
            hint,
        }) => {
            eprintln!("error: {}", message);
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_USAGE,
            message: msg.into(),
            hint: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_ERROR,
            message: msg.into(),
            hint: None,
        }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
