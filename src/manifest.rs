//! Run records written into the output directory
//!
//! Every run leaves two records next to its artifacts: the plain-text
//! `config` manifest (resolved config and platform names plus the full
//! argument list of every step, for eyeballing what a build actually ran)
//! and a machine-readable `run_info.json` summary. Both are write-only
//! from this tool's point of view; nothing ever reads them back.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;

use crate::catalog::BuildConfig;
use crate::pipeline::{PipelineStatus, StepOutcome};

/// File name of the plain-text manifest
pub const MANIFEST_FILE: &str = "config";
/// File name of the JSON run record
pub const RUN_INFO_FILE: &str = "run_info.json";

/// Append-only record of the resolved configuration and step invocations.
///
/// Opened once per run and held for its duration; dropping it closes the
/// file on every exit path, including a failed pipeline.
pub struct RunManifest {
    file: File,
}

impl RunManifest {
    /// Create the manifest in `dir` and write its header block
    pub fn create(dir: &Path, config: &BuildConfig) -> Result<Self> {
        let path = dir.join(MANIFEST_FILE);
        let mut file = File::create(&path)
            .with_context(|| format!("Failed to create manifest '{}'", path.display()))?;

        writeln!(file, "Config: {}", config.name).context("Failed to write manifest header")?;
        writeln!(file, "Platform: {}\n", config.platform.name)
            .context("Failed to write manifest header")?;

        Ok(RunManifest { file })
    }

    /// Append one step's expanded argument list as its own block
    pub fn write_step(&mut self, label: &str, args: &[String]) -> Result<()> {
        writeln!(self.file, "{} args:\n{:?}\n", label, args)
            .context("Failed to write manifest step block")?;
        Ok(())
    }
}

/// Machine-readable summary of one run
#[derive(Debug, Serialize)]
pub struct RunInfo {
    /// Selected build config name
    pub config: String,
    /// Resolved platform name
    pub platform: String,
    /// Whether every step exited cleanly
    pub success: bool,
    /// Per-step exit codes and durations, in execution order
    pub steps: Vec<StepRecord>,
    /// Local wall-clock time the record was written
    pub generated_at: String,
    /// Tool version that produced the record
    pub generator: String,
}

/// One step's entry in the run record
#[derive(Debug, Serialize)]
pub struct StepRecord {
    pub step: String,
    pub exit_code: i32,
    pub duration_secs: f64,
}

impl From<&StepOutcome> for StepRecord {
    fn from(outcome: &StepOutcome) -> Self {
        StepRecord {
            step: outcome.label.clone(),
            exit_code: outcome.exit_code,
            duration_secs: outcome.duration_secs,
        }
    }
}

impl RunInfo {
    pub fn new(config: &BuildConfig, status: &PipelineStatus) -> Self {
        RunInfo {
            config: config.name.clone(),
            platform: config.platform.name.clone(),
            success: status.success(),
            steps: status.outcomes().iter().map(StepRecord::from).collect(),
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            generator: format!("brickbuild {}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Write the record into `dir`.
    ///
    /// The record is diagnostics, not a build product; the caller reports
    /// a failure here as a warning and continues.
    pub fn write(&self, dir: &Path) -> Result<()> {
        let path = dir.join(RUN_INFO_FILE);
        let json = serde_json::to_string_pretty(self).context("Failed to serialize run record")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::catalog;

    #[test]
    fn test_manifest_header_then_step_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let config = catalog().resolve(None).unwrap();

        let mut manifest = RunManifest::create(dir.path(), config).unwrap();
        let args = vec!["cl.exe".to_string(), "-nologo".to_string()];
        manifest.write_step("Test suite", &args).unwrap();
        manifest.write_step("Benchmark suite", &args).unwrap();
        drop(manifest);

        let written = std::fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines[0], "Config: Debug");
        assert_eq!(lines[1], "Platform: win");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3], "Test suite args:");
        assert_eq!(lines[4], format!("{:?}", args));
        assert_eq!(lines[5], "");
        assert_eq!(lines[6], "Benchmark suite args:");
    }

    #[test]
    fn test_run_info_shape() {
        let config = catalog().resolve(Some("release")).unwrap();
        let mut status = PipelineStatus::default();
        status.record(StepOutcome {
            label: "Test suite".to_string(),
            exit_code: 0,
            duration_secs: 0.5,
        });
        status.record(StepOutcome {
            label: "Benchmark suite".to_string(),
            exit_code: 2,
            duration_secs: 0.25,
        });

        let info = RunInfo::new(config, &status);
        let value = serde_json::to_value(&info).unwrap();

        assert_eq!(value["config"], "Release");
        assert_eq!(value["platform"], "win");
        assert_eq!(value["success"], false);
        assert_eq!(value["steps"][0]["step"], "Test suite");
        assert_eq!(value["steps"][1]["exit_code"], 2);
        assert!(value["generator"]
            .as_str()
            .unwrap()
            .starts_with("brickbuild "));
    }

    #[test]
    fn test_run_info_write_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = catalog().resolve(None).unwrap();
        let status = PipelineStatus::default();

        RunInfo::new(config, &status).write(dir.path()).unwrap();

        let written = std::fs::read_to_string(dir.path().join(RUN_INFO_FILE)).unwrap();
        assert!(written.contains("\"success\": true"));
    }
}
