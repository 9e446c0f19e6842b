//! Build tool abstraction for regenerating a single file.
//!
//! The [`BuildTool`] trait decouples the traversal from the actual `make`
//! invocation. Tests use recording tools that never spawn processes.

use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use anyhow::anyhow;
use tracing::{debug, instrument};

use crate::error::RegenError;
use crate::io::config::RegenConfig;
use crate::io::process::{collect_output, spawn_captured};

/// One regeneration: run the tool for `target` inside `workdir`.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    /// Absolute path of the qualifying directory.
    pub workdir: PathBuf,
    /// Build target (the generated file name).
    pub target: String,
}

pub trait BuildTool {
    /// Rebuild `request.target`. Any non-zero exit is an error.
    fn regenerate(&self, request: &BuildRequest) -> Result<(), RegenError>;
}

/// Runs an external make-like program, `make cbmc-batch.yaml` by default.
#[derive(Debug, Clone)]
pub struct CommandBuildTool {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
    output_limit_bytes: usize,
}

impl CommandBuildTool {
    pub fn new(
        command: &[String],
        timeout: Option<Duration>,
        output_limit_bytes: usize,
    ) -> anyhow::Result<Self> {
        let (program, args) = command
            .split_first()
            .filter(|(program, _)| !program.trim().is_empty())
            .ok_or_else(|| anyhow!("build tool command must name a program"))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            timeout,
            output_limit_bytes,
        })
    }

    pub fn from_config(cfg: &RegenConfig) -> anyhow::Result<Self> {
        Self::new(&cfg.build_tool, cfg.timeout(), cfg.output_limit_bytes)
    }

    fn display_command(&self, target: &str) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 2);
        parts.push(self.program.as_str());
        parts.extend(self.args.iter().map(String::as_str));
        parts.push(target);
        parts.join(" ")
    }
}

impl BuildTool for CommandBuildTool {
    #[instrument(skip_all, fields(dir = %request.workdir.display(), target = %request.target))]
    fn regenerate(&self, request: &BuildRequest) -> Result<(), RegenError> {
        let command = self.display_command(&request.target);
        debug!(command = %command, "invoking build tool");

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(&request.target)
            .current_dir(&request.workdir);

        // A timeout has to reach make's recipe shells, so they share a group.
        let child =
            spawn_captured(&mut cmd, self.timeout.is_some()).map_err(|source| RegenError::Spawn {
                dir: request.workdir.clone(),
                command: command.clone(),
                source,
            })?;
        let output = collect_output(child, self.timeout, self.output_limit_bytes)
            .map_err(|source| RegenError::Process { source })?;

        if output.timed_out {
            return Err(RegenError::TimedOut {
                dir: request.workdir.clone(),
                command,
                timeout_secs: self.timeout.map_or(0, |t| t.as_secs()),
            });
        }
        if !output.status.success() {
            return Err(RegenError::BuildTool {
                dir: request.workdir.clone(),
                command,
                exit_code: output.status.code(),
                stdout: output.stdout_lossy(),
                stderr: output.stderr_lossy(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn request(workdir: &std::path::Path) -> BuildRequest {
        BuildRequest {
            workdir: workdir.to_path_buf(),
            target: "cbmc-batch.yaml".to_string(),
        }
    }

    fn sh(script: &str) -> CommandBuildTool {
        let command = vec!["sh".to_string(), "-c".to_string(), script.to_string()];
        CommandBuildTool::new(&command, None, 1024).expect("tool")
    }

    #[test]
    fn default_config_runs_make_with_target() {
        let tool = CommandBuildTool::from_config(&RegenConfig::default()).expect("tool");
        assert_eq!(tool.display_command("cbmc-batch.yaml"), "make cbmc-batch.yaml");
        assert_eq!(tool.timeout, None);
    }

    #[cfg(unix)]
    #[test]
    fn target_is_last_argument_and_cwd_is_workdir() {
        let temp = tempfile::tempdir().expect("tempdir");
        // `sh -c script target` binds the target to $0.
        let tool = sh("printf 'regenerated\\n' > \"$0\"");
        tool.regenerate(&request(temp.path())).expect("regenerate");

        let written = fs::read_to_string(temp.path().join("cbmc-batch.yaml")).expect("read");
        assert_eq!(written, "regenerated\n");
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_carries_captured_output() {
        let temp = tempfile::tempdir().expect("tempdir");
        let tool = sh("echo building; echo 'no rule' >&2; exit 2");
        let err = tool.regenerate(&request(temp.path())).expect_err("should fail");

        match err {
            RegenError::BuildTool {
                exit_code,
                stdout,
                stderr,
                ..
            } => {
                assert_eq!(exit_code, Some(2));
                assert_eq!(stdout, "building\n");
                assert_eq!(stderr, "no rule\n");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn timeout_is_reported() {
        let temp = tempfile::tempdir().expect("tempdir");
        let command = vec!["sleep".to_string()];
        let tool = CommandBuildTool::new(&command, Some(Duration::from_secs(1)), 1024).expect("tool");
        let req = BuildRequest {
            workdir: temp.path().to_path_buf(),
            target: "30".to_string(),
        };
        let err = tool.regenerate(&req).expect_err("should time out");
        assert!(matches!(err, RegenError::TimedOut { timeout_secs: 1, .. }));
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let command = vec!["batch-regen-definitely-not-a-real-program".to_string()];
        let tool = CommandBuildTool::new(&command, None, 1024).expect("tool");
        let err = tool.regenerate(&request(temp.path())).expect_err("should fail");
        assert!(matches!(err, RegenError::Spawn { .. }));
    }

    #[test]
    fn empty_command_is_rejected() {
        let err = CommandBuildTool::new(&[], None, 1024).expect_err("empty command");
        assert!(err.to_string().contains("must name a program"));
        let blank = vec![" ".to_string(), "-s".to_string()];
        assert!(CommandBuildTool::new(&blank, None, 1024).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn timeout_is_honoured_when_tool_forks() {
        let temp = tempfile::tempdir().expect("tempdir");
        // Like make running a recipe: the shell forks a child that keeps the pipes open.
        let command = vec!["sh".to_string(), "-c".to_string(), "sleep 6; true".to_string()];
        let tool = CommandBuildTool::new(&command, Some(Duration::from_secs(1)), 1024).expect("tool");
        let started = std::time::Instant::now();

        let err = tool.regenerate(&request(temp.path())).expect_err("should time out");

        assert!(matches!(err, RegenError::TimedOut { .. }), "{err}");
        assert!(
            started.elapsed() < Duration::from_secs(3),
            "timeout took {:?}",
            started.elapsed()
        );
    }
}
