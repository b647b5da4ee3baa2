//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — nightly scripts branch
//! on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 50-59   | push             | Sheet service codes                      |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Push (50-59) — sheet service codes
// =============================================================================

/// No API token provided (no flag, env var, or saved login).
pub const EXIT_PUSH_NOT_AUTH: u8 = 50;

/// Token rejected by the service (401/403).
pub const EXIT_PUSH_AUTH: u8 = 51;

/// Request rejected by the service (400/422), including a permanent
/// rejection mid-write.
pub const EXIT_PUSH_VALIDATION: u8 = 52;

/// Sheet id unknown to the service (404).
pub const EXIT_PUSH_NOT_FOUND: u8 = 53;

/// Remote failure that outlived the retry policy (network, 5xx, 429).
pub const EXIT_PUSH_REMOTE: u8 = 54;
