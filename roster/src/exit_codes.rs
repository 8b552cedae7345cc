//! Stable exit codes for roster CLI commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Command failed due to invalid input, config, storage, or other errors.
pub const INVALID: i32 = 1;
/// `roster show` or `roster update` targeted an unknown technician id.
pub const NOT_FOUND: i32 = 2;
/// `roster import` rejected the document; the roster is unchanged.
pub const IMPORT_REJECTED: i32 = 3;
