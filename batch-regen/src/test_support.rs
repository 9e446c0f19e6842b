//! Test-only helpers: proof-tree fixtures and a recording build tool.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::core::predicate::{DEFAULT_BUILD_FILE, DEFAULT_GENERATED_FILE};
use crate::error::RegenError;
use crate::io::build_tool::{BuildRequest, BuildTool};

pub const STALE_CONTENTS: &str = "stale\n";
pub const FRESH_CONTENTS: &str = "regenerated\n";

/// Temporary directory tree laid out like a `cbmc/proofs` checkout.
pub struct TestTree {
    dir: TempDir,
}

impl TestTree {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create tempdir")?;
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Directory with both a `Makefile` and a stale generated file.
    pub fn proof_dir(&self, rel: &str) -> Result<PathBuf> {
        self.makefile_only(rel)?;
        self.write(&format!("{rel}/{DEFAULT_GENERATED_FILE}"), STALE_CONTENTS)?;
        Ok(self.root().join(rel))
    }

    pub fn makefile_only(&self, rel: &str) -> Result<PathBuf> {
        self.write(
            &format!("{rel}/{DEFAULT_BUILD_FILE}"),
            "cbmc-batch.yaml:\n\t@echo generated > $@\n",
        )?;
        Ok(self.root().join(rel))
    }

    pub fn generated_only(&self, rel: &str) -> Result<PathBuf> {
        self.write(&format!("{rel}/{DEFAULT_GENERATED_FILE}"), STALE_CONTENTS)?;
        Ok(self.root().join(rel))
    }

    pub fn write(&self, rel: &str, contents: &str) -> Result<()> {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))
    }

    pub fn read(&self, rel: &str) -> Result<String> {
        let path = self.root().join(rel);
        fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.root().join(rel).exists()
    }

    /// Paths relative to the tree root with `/` separators.
    ///
    /// The root is canonicalized on both sides so symlinked temp dirs compare equal.
    pub fn relative(&self, paths: &[PathBuf]) -> Vec<String> {
        let root = fs::canonicalize(self.root()).unwrap_or_else(|_| self.root().to_path_buf());
        paths
            .iter()
            .map(|p| {
                let p = fs::canonicalize(p).unwrap_or_else(|_| p.clone());
                p.strip_prefix(&root)
                    .unwrap_or(&p)
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }
}

/// One recorded [`BuildTool::regenerate`] call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub request: BuildRequest,
    /// Whether the target file existed when the tool was invoked.
    pub generated_existed: bool,
}

/// Build tool that records requests and writes [`FRESH_CONTENTS`] instead of running make.
#[derive(Default)]
pub struct RecordingBuildTool {
    calls: RefCell<Vec<RecordedCall>>,
    fail_in: Option<PathBuf>,
}

impl RecordingBuildTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with exit code 2 when invoked in a directory ending with `rel`.
    pub fn failing_in(mut self, rel: impl Into<PathBuf>) -> Self {
        self.fail_in = Some(rel.into());
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }
}

impl BuildTool for RecordingBuildTool {
    fn regenerate(&self, request: &BuildRequest) -> Result<(), RegenError> {
        let target = request.workdir.join(&request.target);
        self.calls.borrow_mut().push(RecordedCall {
            request: request.clone(),
            generated_existed: target.exists(),
        });

        if let Some(rel) = &self.fail_in
            && request.workdir.ends_with(rel)
        {
            return Err(RegenError::BuildTool {
                dir: request.workdir.clone(),
                command: format!("make {}", request.target),
                exit_code: Some(2),
                stdout: String::new(),
                stderr: format!("make: *** [{}] Error 2\n", request.target),
            });
        }

        fs::write(&target, FRESH_CONTENTS).map_err(|source| RegenError::FileSystem {
            path: target.clone(),
            source,
        })
    }
}
