//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success (including silent no-ops like an empty URL)  |
//! | 1    | General error (unspecified)                          |
//! | 2    | Usage error (bad arguments; clap exits with it)      |
//! | 3    | Store or export I/O failed                           |
//! | 4    | Confirmation declined; nothing changed               |
//! | 5    | Command does not apply (index out of range, 3x3 floor) |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// The chart store could not be read or written, or export output failed.
pub const EXIT_IO: u8 = 3;

/// The user answered "no" to a delete/reset confirmation.
pub const EXIT_DECLINED: u8 = 4;

/// The command was refused before touching any state.
pub const EXIT_REJECTED: u8 = 5;
