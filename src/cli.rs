//! CLI argument parsing using clap derive macros

use clap::{ArgGroup, Parser};

/// brickbuild - build orchestrator for the bricks project
///
/// Resolves the requested build configuration into concrete compiler
/// invocations, runs every build step, and exits with the aggregated
/// result.
#[derive(Parser, Debug)]
#[command(name = "brickbuild")]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("selector").multiple(false)))]
pub struct Cli {
    /// Create Debug build
    #[arg(short = 'd', long, group = "selector")]
    pub debug: bool,

    /// Create Develop build
    #[arg(long, group = "selector")]
    pub dev: bool,

    /// Create Release build
    #[arg(short = 'r', long, group = "selector")]
    pub release: bool,

    /// Delete contents of the bin folder before building
    #[arg(short = 'c', long)]
    pub clean: bool,

    /// Increase verbosity
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Run all tests found in subfolders
    #[arg(short = 't', long)]
    pub runtests: bool,
}

impl Cli {
    /// Selector token for config resolution; None means the default config
    pub fn config_token(&self) -> Option<&'static str> {
        if self.debug {
            Some("debug")
        } else if self.dev {
            Some("dev")
        } else if self.release {
            Some("release")
        } else {
            None
        }
    }
}
