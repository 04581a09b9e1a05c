//! CLI exit codes. Scripts rely on these.
//!
//! | Code | Meaning                                         |
//! |------|-------------------------------------------------|
//! | 0    | Success                                         |
//! | 1    | Runtime error (bad JSON, export failure)        |
//! | 2    | Usage error (bad args, missing file, bad key)   |

pub const EXIT_SUCCESS: u8 = 0;

pub const EXIT_ERROR: u8 = 1;

/// Also what clap exits with on argument errors.
pub const EXIT_USAGE: u8 = 2;
