//! Top-level run control
//!
//! Drives one build run end to end: prepare the output directory, clean it
//! when asked, resolve the build config, record the manifest, run the
//! pipeline, then close out with the run record and the fixture tests.
//! The ctime bracket wraps the whole sequence and its end call fires on
//! every exit path, successful or not.

use std::path::PathBuf;

use anyhow::Result;

use crate::catalog::catalog;
use crate::clean;
use crate::error::BrickbuildError;
use crate::exec::ctime::{TimingGuard, TimingRecorder, TIMING_FILE};
use crate::exec::subprocess::ProcessRunner;
use crate::manifest::{RunInfo, RunManifest};
use crate::pipeline::{default_steps, BuildPipeline, ARTIFACT_NAME};
use crate::testrun::FixtureRunner;
use crate::utils::paths::ensure_dir;
use crate::utils::terminal;

/// Output directory, relative to the project root
const BIN_DIR: &str = "bin";

/// Options for one orchestrated run
#[derive(Debug)]
pub struct RunOptions {
    /// Selector token for the build config; None picks the default
    pub config_token: Option<String>,
    /// Empty the output directory before building
    pub clean: bool,
    /// Echo expanded invocations while building
    pub verbose: bool,
    /// Build the platform exe and run fixture tests after the pipeline
    pub run_tests: bool,
    /// Project root all relative paths resolve against
    pub project_root: PathBuf,
}

/// Drives a full run against injected process and timing collaborators
pub struct Orchestrator<'a> {
    runner: &'a dyn ProcessRunner,
    timing: &'a dyn TimingRecorder,
}

impl<'a> Orchestrator<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, timing: &'a dyn TimingRecorder) -> Self {
        Orchestrator { runner, timing }
    }

    /// Run one build.
    ///
    /// The returned code is the aggregated pipeline status and becomes the
    /// process exit code. Fixture test results deliberately do not feed
    /// into it.
    pub fn run(&self, opts: &RunOptions) -> Result<i32> {
        let _bracket = TimingGuard::begin(self.timing, TIMING_FILE);

        let catalog = catalog();
        catalog.validate()?;

        let bin_dir = opts.project_root.join(BIN_DIR);
        ensure_dir(&bin_dir).map_err(|err| {
            BrickbuildError::environment(
                format!("cannot prepare output directory '{}'", bin_dir.display()),
                err,
            )
        })?;

        if opts.clean {
            clean::clean_output_dir(&bin_dir)?;
        }

        let config = catalog.resolve(opts.config_token.as_deref())?;
        println!("-> Config '{}'", config.name);

        let mut manifest = RunManifest::create(&bin_dir, config)?;
        let steps = default_steps(opts.run_tests);
        let pipeline = BuildPipeline::new(config, &opts.project_root, &bin_dir, opts.verbose);
        let status = pipeline.run(&steps, self.runner, &mut manifest)?;
        // The manifest is complete; close it before anything else runs
        drop(manifest);

        if let Err(err) = RunInfo::new(config, &status).write(&bin_dir) {
            terminal::print_warning(&format!("{:#}", err));
        }

        if opts.run_tests && status.success() {
            let artifact = bin_dir.join(ARTIFACT_NAME);
            FixtureRunner::new(self.runner, &opts.project_root, artifact).run_all()?;
        }

        Ok(status.exit_code())
    }
}
