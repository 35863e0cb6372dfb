//! Process exit codes, following BSD sysexits.h

/// Bad flags or arguments
pub const USAGE: i32 = 64;

/// Snapshot unparsable, or its relations violate the forest rules
pub const DATAERR: i32 = 65;

/// Snapshot file missing or unreadable
pub const NOINPUT: i32 = 66;

/// Output could not be produced
pub const SOFTWARE: i32 = 70;

/// Settings file or KINFOREST_* value invalid
pub const CONFIG: i32 = 78;
