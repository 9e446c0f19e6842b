//! Error taxonomy for a regeneration run.
//!
//! Every variant is terminal: the run stops at the first error and nothing
//! after it in traversal order is touched.

use std::path::PathBuf;

use crate::exit_codes;

#[derive(Debug, thiserror::Error)]
pub enum RegenError {
    /// The generated file could not be removed before rebuilding.
    #[error("failed to delete {}: {source}", path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The build tool ran and exited non-zero.
    #[error(
        "`{command}` failed in {} (exit code {}){}",
        dir.display(),
        exit_code.map_or_else(|| "none".to_string(), |c| c.to_string()),
        captured_streams(stdout, stderr)
    )]
    BuildTool {
        dir: PathBuf,
        command: String,
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// The build tool could not be started at all.
    #[error("failed to spawn `{command}` in {}: {source}", dir.display())]
    Spawn {
        dir: PathBuf,
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` in {} timed out after {timeout_secs}s", dir.display())]
    TimedOut {
        dir: PathBuf,
        command: String,
        timeout_secs: u64,
    },

    /// Collecting child output failed after a successful spawn.
    #[error("build tool process error")]
    Process {
        #[source]
        source: anyhow::Error,
    },
}

impl RegenError {
    /// Stable process exit code for this failure class.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileSystem { .. } => exit_codes::FILESYSTEM,
            Self::BuildTool { .. }
            | Self::Spawn { .. }
            | Self::TimedOut { .. }
            | Self::Process { .. } => exit_codes::BUILD_TOOL,
        }
    }
}

fn captured_streams(stdout: &str, stderr: &str) -> String {
    let mut buf = String::new();
    if !stderr.trim().is_empty() {
        buf.push_str("\n=== stderr ===\n");
        buf.push_str(stderr.trim_end());
    }
    if !stdout.trim().is_empty() {
        buf.push_str("\n=== stdout ===\n");
        buf.push_str(stdout.trim_end());
    }
    buf
}
