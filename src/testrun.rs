//! Fixture test runner
//!
//! Downstream consumer of a successful build: takes the produced `do.exe`,
//! compiles every `*.do` fixture under the project's `tests/` and
//! `examples/` folders with it, runs each resulting executable, and prints
//! a pass/fail line per fixture. Results are informational only; they
//! never feed back into the build status or the process exit code.

use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use glob::glob;

use crate::exec::subprocess::ProcessRunner;
use crate::utils::terminal;

/// Folders scanned for fixtures, relative to the project root
const FIXTURE_DIRS: &[&str] = &["tests", "examples"];
/// Fixture file pattern
const FIXTURE_PATTERN: &str = "*.do";

/// Phase a fixture failed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FixturePhase {
    Compilation,
    Execution,
}

impl fmt::Display for FixturePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixturePhase::Compilation => write!(f, "Compilation"),
            FixturePhase::Execution => write!(f, "Execution"),
        }
    }
}

/// Pass/fail tally of one fixture pass
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FixtureSummary {
    pub total: usize,
    pub passed: usize,
}

impl FixtureSummary {
    pub fn failed(&self) -> usize {
        self.total - self.passed
    }
}

/// Runs discovered fixtures against the produced artifact
pub struct FixtureRunner<'a> {
    runner: &'a dyn ProcessRunner,
    project_root: &'a Path,
    artifact: PathBuf,
}

impl<'a> FixtureRunner<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, project_root: &'a Path, artifact: PathBuf) -> Self {
        FixtureRunner {
            runner,
            project_root,
            artifact,
        }
    }

    /// Discover and run every fixture, reporting each on its own line
    pub fn run_all(&self) -> Result<FixtureSummary> {
        let mut summary = FixtureSummary::default();

        for dir in FIXTURE_DIRS {
            let folder = self.project_root.join(dir);
            if !folder.is_dir() {
                continue;
            }
            for fixture in discover_fixtures(&folder)? {
                summary.total += 1;
                if self.run_fixture(&folder, &fixture) {
                    summary.passed += 1;
                }
            }
        }

        if summary.total == 0 {
            println!("No test fixtures found.");
        } else {
            println!(
                "\n{} fixtures: {} passed, {} failed",
                summary.total,
                summary.passed,
                summary.failed()
            );
        }

        Ok(summary)
    }

    /// Compile one fixture with the artifact, then execute the result.
    ///
    /// Output of both phases is captured and only shown on failure. A
    /// spawn error counts as a failure for this fixture alone.
    fn run_fixture(&self, folder: &Path, fixture: &str) -> bool {
        print!("Testing {:<30}... ", fixture);
        let _ = io::stdout().flush();

        let mut phase = FixturePhase::Compilation;
        let compile = vec![self.artifact.display().to_string(), fixture.to_string()];
        let mut result = self.runner.run(&compile, folder, true);

        if matches!(&result, Ok(r) if r.success) {
            phase = FixturePhase::Execution;
            let exe = folder.join(fixture).with_extension("exe");
            let execute = vec![exe.display().to_string()];
            result = self.runner.run(&execute, self.project_root, true);
        }

        match result {
            Ok(r) if r.success => {
                terminal::print_status_ok();
                true
            }
            Ok(r) => {
                terminal::print_status_fail();
                println!("{} returned {}", phase, r.exit_code);
                if !r.stdout.is_empty() {
                    println!("{}", r.stdout);
                }
                if !r.stderr.is_empty() {
                    println!("{}", r.stderr);
                }
                println!();
                false
            }
            Err(err) => {
                terminal::print_status_fail();
                println!("{} failed to start ({})", phase, err);
                false
            }
        }
    }
}

/// `*.do` files directly inside `folder`, sorted for stable run order
fn discover_fixtures(folder: &Path) -> Result<Vec<String>> {
    let pattern = folder.join(FIXTURE_PATTERN);
    let mut names = Vec::new();
    for entry in glob(&pattern.to_string_lossy())? {
        let path = entry?;
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}
