//! # kmeta-cli — Command-Line Interface
//!
//! Provides the `kmeta` binary:
//!
//! ```bash
//! kmeta check dataset-metadata.json kernels/
//! kmeta check --format json .
//! kmeta schema kernel
//! kmeta serve
//! ```
//!
//! ## Exit Codes
//!
//! - `0`: nothing to report.
//! - `1`: at least one diagnostic was printed.
//! - `2`: operational error (unreadable path, broken pipe, ...).

pub mod check;
pub mod logging;
pub mod schema;
pub mod serve;

/// Exit code when every checked file is clean.
pub const EXIT_CLEAN: u8 = 0;
/// Exit code when diagnostics were reported.
pub const EXIT_DIAGNOSTICS: u8 = 1;
/// Exit code for operational failures.
pub const EXIT_ERROR: u8 = 2;
/// Exit code when a language-server client exits without `shutdown`.
pub const EXIT_NO_SHUTDOWN: u8 = 1;
