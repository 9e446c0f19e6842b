//! Stable exit codes for the `batch-regen` binary.

/// Every qualifying directory was regenerated (or the platform was skipped).
pub const OK: i32 = 0;
/// Invalid config, bad arguments, or any failure outside the two classes below.
pub const INVALID: i32 = 1;
/// A generated file could not be deleted.
pub const FILESYSTEM: i32 = 2;
/// The build tool failed to start, timed out, or exited non-zero.
pub const BUILD_TOOL: i32 = 3;
