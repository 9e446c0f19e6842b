//! Regenerator configuration stored in `batch-regen.toml`.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::platform::Platform;
use crate::core::predicate::{DEFAULT_BUILD_FILE, DEFAULT_GENERATED_FILE, MarkerFiles};

/// File name looked up in the traversal root when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "batch-regen.toml";

/// Regenerator configuration (TOML).
///
/// Every field is optional. With no file at all the tool runs
/// `make cbmc-batch.yaml` wherever a `Makefile` sits next to a
/// `cbmc-batch.yaml`, and does nothing on Windows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RegenConfig {
    /// Program and leading arguments. The generated file name is appended.
    pub build_tool: Vec<String>,

    pub build_file: String,

    pub generated_file: String,

    /// Host platforms on which the whole run is a no-op.
    pub skip_on_platform: Vec<String>,

    /// Kill the build tool after this many seconds. Unset means wait forever.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Keep at most this many bytes of each captured output stream.
    pub output_limit_bytes: usize,
}

impl Default for RegenConfig {
    fn default() -> Self {
        Self {
            build_tool: vec!["make".to_string()],
            build_file: DEFAULT_BUILD_FILE.to_string(),
            generated_file: DEFAULT_GENERATED_FILE.to_string(),
            skip_on_platform: vec!["windows".to_string()],
            timeout_secs: None,
            output_limit_bytes: 1_000_000,
        }
    }
}

impl RegenConfig {
    pub fn validate(&self) -> Result<()> {
        if self.build_tool.is_empty() || self.build_tool[0].trim().is_empty() {
            return Err(anyhow!("build_tool must be a non-empty array"));
        }
        validate_file_name("build_file", &self.build_file)?;
        validate_file_name("generated_file", &self.generated_file)?;
        if self.build_file == self.generated_file {
            return Err(anyhow!("build_file and generated_file must differ"));
        }
        if self.timeout_secs == Some(0) {
            return Err(anyhow!("timeout_secs must be > 0"));
        }
        if self.output_limit_bytes == 0 {
            return Err(anyhow!("output_limit_bytes must be > 0"));
        }
        Ok(())
    }

    pub fn markers(&self) -> MarkerFiles {
        MarkerFiles {
            build_file: self.build_file.clone(),
            generated_file: self.generated_file.clone(),
        }
    }

    /// Skip list resolved to platforms, evaluated once at startup.
    pub fn skip_platforms(&self) -> Vec<Platform> {
        self.skip_on_platform
            .iter()
            .filter_map(|name| name.parse().ok())
            .collect()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

fn validate_file_name(field: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(anyhow!("{field} must not be empty"));
    }
    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(anyhow!("{field} must be a plain file name, got '{name}'"));
    }
    Ok(())
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `RegenConfig::default()`.
pub fn load_config(path: &Path) -> Result<RegenConfig> {
    if !path.exists() {
        let cfg = RegenConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: RegenConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
