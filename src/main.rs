//! brickbuild - native build orchestrator for the bricks C++ project
//!
//! Resolves a (platform, config) pair from the command line, expands it
//! into concrete compiler/linker invocations, runs the build steps in
//! order, and exits with the aggregated status.

mod catalog;
mod clean;
mod cli;
mod error;
mod exec;
mod invocation;
mod manifest;
mod orchestrator;
mod pipeline;
mod testrun;
mod utils;

use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use cli::Cli;
use error::BrickbuildError;
use exec::ctime::CtimeRecorder;
use exec::subprocess::CommandRunner;
use orchestrator::{Orchestrator, RunOptions};

/// Exit code for fatal usage and environment errors
const FATAL_EXIT_CODE: i32 = 2;

fn main() {
    let cli = Cli::parse();

    let code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            report_fatal(&err);
            FATAL_EXIT_CODE
        }
    };
    process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    let project_root =
        std::env::current_dir().context("Failed to resolve the current directory")?;

    let opts = RunOptions {
        config_token: cli.config_token().map(str::to_string),
        clean: cli.clean,
        verbose: cli.verbose,
        run_tests: cli.runtests,
        project_root,
    };

    let runner = CommandRunner;
    let timing = CtimeRecorder;
    Orchestrator::new(&runner, &timing).run(&opts)
}

fn report_fatal(err: &anyhow::Error) {
    match err.downcast_ref::<BrickbuildError>() {
        Some(err) => err.display_with_hints(),
        None => utils::terminal::print_error(&format!("{:#}", err)),
    }
}
