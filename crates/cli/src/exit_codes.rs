//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 3-9     | reconciliation   | Classification pass outcomes             |
//! | 10-19   | store            | Record store codes                       |
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
// Reconciliation (3-9)
// =============================================================================

/// The pass found discrepancies: area mismatches, missing records, or
/// orphaned record entries. Like `diff(1)`, non-zero means "look here."
pub const EXIT_RECON_DISCREPANCIES: u8 = 3;

/// An input file could not be read or parsed (map GeoJSON, records CSV).
pub const EXIT_RECON_PARSE: u8 = 4;

/// A records CSV parsed but failed validation (duplicate plot ids,
/// bad id format, implausible values).
pub const EXIT_CSV_INVALID: u8 = 5;

// =============================================================================
// Store (10-19)
// =============================================================================

/// A record for this plot id already exists.
pub const EXIT_STORE_DUPLICATE: u8 = 10;

/// No record for this plot id.
pub const EXIT_STORE_NOT_FOUND: u8 = 11;

/// Underlying database error.
pub const EXIT_STORE_ERROR: u8 = 12;
