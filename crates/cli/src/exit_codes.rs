//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! | Code | Meaning                                   |
//! |------|-------------------------------------------|
//! | 0    | Success, datasets reconciled              |
//! | 1    | Mismatches found                          |
//! | 2    | CLI usage error (bad args)                |
//! | 3    | I/O error reading input / writing output  |
//! | 4    | Parse error reading input files           |
//! | 5    | Schema error (absent or duplicate column) |
//! | 6    | Configuration error (bad recipe)          |

/// Success - datasets reconciled, no mismatches.
pub const EXIT_SUCCESS: u8 = 0;

/// Mismatches found.
/// Like `diff(1)`, exit 1 means "datasets differ."
pub const EXIT_MISMATCHES: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// I/O error - cannot read an input or write the report.
pub const EXIT_IO: u8 = 3;

/// Parse error reading input files.
pub const EXIT_PARSE: u8 = 4;

/// Schema error - a named column is absent, or input columns are malformed.
pub const EXIT_SCHEMA: u8 = 5;

/// Configuration error - invalid comparison recipe.
pub const EXIT_CONFIG: u8 = 6;
