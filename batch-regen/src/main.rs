//! Regenerate `cbmc-batch.yaml` files for CBMC proofs.
//!
//! Walks the tree from the working directory (or `--root`). In every directory
//! that has both a `Makefile` and a `cbmc-batch.yaml`, it deletes the YAML file
//! and runs `make cbmc-batch.yaml` to rebuild it. Stops at the first failure.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use batch_regen::error::RegenError;
use batch_regen::exit_codes;
use batch_regen::io::build_tool::CommandBuildTool;
use batch_regen::io::config::{CONFIG_FILE_NAME, RegenConfig, load_config};
use batch_regen::logging;
use batch_regen::regen::{PlanOutcome, RegenOptions, RegenOutcome, plan, regenerate_all};
use clap::Parser;

#[derive(Parser)]
#[command(
    name = "batch-regen",
    version,
    about = "Regenerate cbmc-batch.yaml files wherever a Makefile can build them"
)]
struct Cli {
    /// Directory to walk.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Config file. Defaults to `batch-regen.toml` in the root, if present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// List qualifying directories without deleting or building anything.
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    logging::init();
    let code = match run(Cli::parse()) {
        Ok(()) => exit_codes::OK,
        Err(err) => {
            eprintln!("{:#}", err);
            err.downcast_ref::<RegenError>()
                .map_or(exit_codes::INVALID, RegenError::exit_code)
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<()> {
    let cfg = resolve_config(&cli.root, cli.config.as_deref())?;
    let options = RegenOptions::from_config(&cfg);
    // A gated host never looks at the root.
    if !options.gated() && !cli.root.is_dir() {
        bail!("root {} is not a directory", cli.root.display());
    }

    if cli.dry_run {
        match plan(&cli.root, &options)? {
            PlanOutcome::Skipped { platform } => println!("regen: skipped platform={platform}"),
            PlanOutcome::Matched { dirs } => {
                for dir in &dirs {
                    println!("{}", dir.display());
                }
                println!("regen: matched={}", dirs.len());
            }
        }
        return Ok(());
    }

    let tool = CommandBuildTool::from_config(&cfg)?;
    match regenerate_all(&cli.root, &options, &tool)? {
        RegenOutcome::Skipped { platform } => println!("regen: skipped platform={platform}"),
        RegenOutcome::Completed { processed } => {
            println!("regen: processed={}", processed.len());
        }
    }
    Ok(())
}

fn resolve_config(root: &Path, explicit: Option<&Path>) -> Result<RegenConfig> {
    match explicit {
        Some(path) => {
            if !path.is_file() {
                bail!("config file {} not found", path.display());
            }
            load_config(path).context("load config")
        }
        None => load_config(&root.join(CONFIG_FILE_NAME)).context("load config"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_no_arguments() {
        let cli = Cli::parse_from(["batch-regen"]);
        assert_eq!(cli.root, PathBuf::from("."));
        assert!(cli.config.is_none());
        assert!(!cli.dry_run);
    }

    #[test]
    fn parse_all_flags() {
        let cli = Cli::parse_from([
            "batch-regen",
            "--root",
            "cbmc/proofs",
            "--config",
            "ci.toml",
            "--dry-run",
        ]);
        assert_eq!(cli.root, PathBuf::from("cbmc/proofs"));
        assert_eq!(cli.config, Some(PathBuf::from("ci.toml")));
        assert!(cli.dry_run);
    }

    #[test]
    fn explicit_missing_config_is_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = resolve_config(temp.path(), Some(&temp.path().join("nope.toml")))
            .expect_err("missing explicit config");
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn implicit_config_is_read_from_root() {
        let temp = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "build_tool = [\"gmake\"]\n",
        )
        .expect("write");
        let cfg = resolve_config(temp.path(), None).expect("config");
        assert_eq!(cfg.build_tool, vec!["gmake"]);
    }
}
