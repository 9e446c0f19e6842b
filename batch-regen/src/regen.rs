//! Orchestration for a `batch-regen` run.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::core::platform::{Platform, is_skipped};
use crate::core::predicate::MarkerFiles;
use crate::error::RegenError;
use crate::io::build_tool::{BuildRequest, BuildTool};
use crate::io::config::RegenConfig;
use crate::io::walk::QualifyingDirs;

/// Inputs resolved once before traversal.
#[derive(Debug, Clone)]
pub struct RegenOptions {
    pub markers: MarkerFiles,
    /// Platform the run is evaluated for. `Platform::current()` outside tests.
    pub host: Platform,
    /// Platforms on which the run does nothing.
    pub skip_on: Vec<Platform>,
}

impl Default for RegenOptions {
    fn default() -> Self {
        Self::from_config(&RegenConfig::default())
    }
}

impl RegenOptions {
    pub fn from_config(cfg: &RegenConfig) -> Self {
        Self {
            markers: cfg.markers(),
            host: Platform::current(),
            skip_on: cfg.skip_platforms(),
        }
    }

    /// True when the host is in the skip list and a run must not touch the tree.
    pub fn gated(&self) -> bool {
        is_skipped(&self.host, &self.skip_on)
    }
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegenOutcome {
    /// Host platform is in the skip list; nothing was touched.
    Skipped { platform: Platform },
    /// Directories that were regenerated, in traversal order.
    Completed { processed: Vec<PathBuf> },
}

/// Delete and rebuild the generated file in every qualifying directory under `root`.
///
/// Directories are handled one at a time in traversal order. The first error
/// stops the run; directories after it are never visited.
pub fn regenerate_all<T: BuildTool>(
    root: &Path,
    options: &RegenOptions,
    tool: &T,
) -> Result<RegenOutcome, RegenError> {
    if options.gated() {
        info!(platform = %options.host, "skipping regeneration on this platform");
        return Ok(RegenOutcome::Skipped {
            platform: options.host.clone(),
        });
    }

    let root = absolute(root)?;
    debug!(root = %root.display(), "walking tree");

    let generated = &options.markers.generated_file;
    let mut processed = Vec::new();
    for dir in QualifyingDirs::new(&root, options.markers.clone()) {
        info!(file = %generated, dir = %dir.display(), "building");

        let path = dir.join(generated);
        fs::remove_file(&path).map_err(|source| RegenError::FileSystem {
            path: path.clone(),
            source,
        })?;

        tool.regenerate(&BuildRequest {
            workdir: dir.clone(),
            target: generated.clone(),
        })?;
        processed.push(dir);
    }

    debug!(processed = processed.len(), "regeneration complete");
    Ok(RegenOutcome::Completed { processed })
}

/// Result of a dry run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanOutcome {
    /// Host platform is in the skip list; the tree was not walked.
    Skipped { platform: Platform },
    /// Directories a real run would regenerate, in traversal order.
    Matched { dirs: Vec<PathBuf> },
}

/// Qualifying directories under `root`, without touching anything.
pub fn plan(root: &Path, options: &RegenOptions) -> Result<PlanOutcome, RegenError> {
    if options.gated() {
        info!(platform = %options.host, "skipping regeneration on this platform");
        return Ok(PlanOutcome::Skipped {
            platform: options.host.clone(),
        });
    }
    let root = absolute(root)?;
    Ok(PlanOutcome::Matched {
        dirs: QualifyingDirs::new(&root, options.markers.clone()).collect(),
    })
}

fn absolute(root: &Path) -> Result<PathBuf, RegenError> {
    std::path::absolute(root).map_err(|source| RegenError::FileSystem {
        path: root.to_path_buf(),
        source,
    })
}
