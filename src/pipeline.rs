//! Build steps and the sequential build pipeline
//!
//! A `BuildStep` is one compiler/linker invocation producing one artifact.
//! The pipeline expands every step in declared order, writes each argument
//! list to the run manifest before executing it, and folds the exit codes
//! into a single status. A failing step never stops the run; its failure
//! is recorded and the remaining steps still execute, so one broken target
//! does not hide diagnostics from the others.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::catalog::BuildConfig;
use crate::exec::subprocess::ProcessRunner;
use crate::invocation::InvocationBuilder;
use crate::manifest::RunManifest;
use crate::utils::terminal;

/// Name of the main artifact, consumed by the fixture runner
pub const ARTIFACT_NAME: &str = "do.exe";

/// Include directories shared by every step
fn common_include_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("src"), PathBuf::from("3rdparty/mbedtls/include")]
}

/// Library files linked into every step
// TODO use the Release mbedTLS lib for Develop and Release builds
fn common_libs() -> Vec<PathBuf> {
    vec![PathBuf::from("3rdparty/mbedtls/lib/Debug/mbedTLS.lib")]
}

/// One compiler/linker invocation producing one artifact
#[derive(Debug, Clone)]
pub struct BuildStep {
    /// Manifest block label ("Test suite" becomes "Test suite args:")
    pub label: String,
    /// Progress banner printed in verbose runs
    pub message: String,
    /// Entry translation unit, relative to the project root
    pub entry: PathBuf,
    /// Include directories passed as `/I` arguments
    pub include_dirs: Vec<PathBuf>,
    /// Library search directories passed as `/libpath:` arguments
    pub lib_dirs: Vec<PathBuf>,
    /// Library files linked explicitly, relative to the project root
    pub libs: Vec<PathBuf>,
    /// Artifact name passed as `-Fe<name>`; None lets the toolchain pick
    pub output_name: Option<String>,
}

impl BuildStep {
    /// The main executable, only built when fixture tests are requested
    pub fn platform_exe() -> Self {
        BuildStep {
            label: "Platform exe".to_string(),
            message: "Building platform executable...".to_string(),
            entry: PathBuf::from("main.cpp"),
            include_dirs: common_include_dirs(),
            lib_dirs: Vec::new(),
            libs: common_libs(),
            output_name: Some(ARTIFACT_NAME.to_string()),
        }
    }

    /// The unit test suite
    pub fn test_suite() -> Self {
        BuildStep {
            label: "Test suite".to_string(),
            message: "Building test suite...".to_string(),
            entry: PathBuf::from("test/test.cpp"),
            include_dirs: common_include_dirs(),
            lib_dirs: Vec::new(),
            libs: common_libs(),
            output_name: None,
        }
    }

    /// The benchmark suite, linked against the benchmark library
    pub fn benchmark_suite() -> Self {
        BuildStep {
            label: "Benchmark suite".to_string(),
            message: "Building benchmarks...".to_string(),
            entry: PathBuf::from("bench/bench.cpp"),
            include_dirs: common_include_dirs(),
            lib_dirs: vec![PathBuf::from("bench/benchmark")],
            libs: common_libs(),
            output_name: None,
        }
    }
}

/// Steps for one run, in execution order.
///
/// The platform executable is only worth building when the fixture runner
/// will consume it, so it is prepended on demand.
pub fn default_steps(with_platform_exe: bool) -> Vec<BuildStep> {
    let mut steps = Vec::new();
    if with_platform_exe {
        steps.push(BuildStep::platform_exe());
    }
    steps.push(BuildStep::test_suite());
    steps.push(BuildStep::benchmark_suite());
    steps
}

/// Result of one executed step
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub label: String,
    pub exit_code: i32,
    pub duration_secs: f64,
}

/// Aggregated result of a whole pipeline run.
///
/// Failure is tracked as a flag plus the first failing step's exit code,
/// not by OR-ing raw codes together; OR-ed codes can cancel bits out and
/// misreport a failed run as clean.
#[derive(Debug, Default)]
pub struct PipelineStatus {
    any_failed: bool,
    first_failure_code: i32,
    outcomes: Vec<StepOutcome>,
}

impl PipelineStatus {
    /// Fold one step's outcome into the aggregate
    pub fn record(&mut self, outcome: StepOutcome) {
        if outcome.exit_code != 0 && !self.any_failed {
            self.any_failed = true;
            self.first_failure_code = outcome.exit_code;
        }
        self.outcomes.push(outcome);
    }

    /// Whether every recorded step exited cleanly
    pub fn success(&self) -> bool {
        !self.any_failed
    }

    /// 0 when every step succeeded, else the first failing step's code
    pub fn exit_code(&self) -> i32 {
        if self.any_failed {
            self.first_failure_code
        } else {
            0
        }
    }

    /// Per-step outcomes in execution order
    pub fn outcomes(&self) -> &[StepOutcome] {
        &self.outcomes
    }
}

/// Runs build steps in order against one resolved (platform, config) pair
pub struct BuildPipeline<'a> {
    config: &'a BuildConfig,
    project_root: &'a Path,
    bin_dir: &'a Path,
    verbose: bool,
}

impl<'a> BuildPipeline<'a> {
    pub fn new(
        config: &'a BuildConfig,
        project_root: &'a Path,
        bin_dir: &'a Path,
        verbose: bool,
    ) -> Self {
        BuildPipeline {
            config,
            project_root,
            bin_dir,
            verbose,
        }
    }

    /// Execute every step in declared order and aggregate their results.
    ///
    /// Each step's expanded argument list goes into the manifest before
    /// the step runs, so a crashed build still leaves a readable record of
    /// what was attempted. Steps run in the output directory.
    pub fn run(
        &self,
        steps: &[BuildStep],
        runner: &dyn ProcessRunner,
        manifest: &mut RunManifest,
    ) -> Result<PipelineStatus> {
        runner.ensure_available(&self.config.platform.compiler)?;

        let builder = InvocationBuilder::new(&self.config.platform, self.config, self.project_root);
        let mut status = PipelineStatus::default();

        for step in steps {
            let args = builder.build(step)?;
            manifest.write_step(&step.label, &args)?;

            if self.verbose {
                println!("\n{}", step.message);
                terminal::print_command(&args);
            }

            let result = runner.run(&args, self.bin_dir, false)?;
            status.record(StepOutcome {
                label: step.label.clone(),
                exit_code: result.exit_code,
                duration_secs: result.duration.as_secs_f64(),
            });
        }

        Ok(status)
    }
}
