//! Regenerates `cbmc-batch.yaml` files across a source tree.
//!
//! Every directory that already holds both a `Makefile` and a generated
//! `cbmc-batch.yaml` has the generated file deleted and rebuilt by running
//! `make cbmc-batch.yaml` in that directory. The crate is split the same way
//! throughout:
//!
//! - **[`core`]**: Pure logic (platform gate, match predicate). No I/O.
//! - **[`io`]**: Side-effecting adapters (config, directory walk, child processes,
//!   the build tool seam).
//!
//! [`regen`] ties the two together and is what the CLI calls.

pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod regen;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
